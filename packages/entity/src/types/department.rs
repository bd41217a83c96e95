use serde::{Deserialize, Serialize};

/// Academic department a profile can belong to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    #[serde(skip)]
    pub id: String,

    pub name: String,
}

/// Sort by name, ignoring case.
pub fn sort_by_name(departments: &mut [Department]) {
    departments.sort_by(|a, b| {
        a.name.to_lowercase().cmp(&b.name.to_lowercase()).then_with(|| a.name.cmp(&b.name))
    });
}
