use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Field name to message, ordered by field name so reports are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for `field`, replacing any earlier message for it.
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// `Ok(())` when nothing was recorded, otherwise the collected errors.
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() { Ok(()) } else { Err(ValidationError::Fields(self)) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

/// Errors raised while validating user input before it reaches the store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// One or more form fields failed validation
    #[error("Invalid fields: {0}")]
    Fields(FieldErrors),

    /// A required identifier was not supplied
    #[error("Missing required value: {field}")]
    Missing { field: &'static str },
}

impl ValidationError {
    /// Errors for the named field, if any were reported.
    pub fn field(&self, name: &str) -> Option<&str> {
        match self {
            ValidationError::Fields(errors) => errors.get(name),
            ValidationError::Missing { field } if *field == name => Some("required"),
            ValidationError::Missing { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display_lists_fields_in_order() {
        let mut errors = FieldErrors::new();
        errors.insert("title", "Title is required.");
        errors.insert("end", "End time must be after start time.");

        let fields: Vec<&str> = errors.iter().map(|(field, _)| field).collect();
        assert_eq!(fields, vec!["end", "title"]);
        assert_eq!(
            errors.to_string(),
            "end: End time must be after start time.; title: Title is required."
        );
    }
}
