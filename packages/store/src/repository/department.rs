use crate::codec::{Record, decode_all};
use crate::collections::Collections;
use crate::document::DocumentStore;
use campus_entity::Department;
use campus_entity::types::department::sort_by_name;
use std::sync::Arc;
use tracing::warn;

pub struct DepartmentRepository<S: DocumentStore + ?Sized> {
    store: Arc<S>,
    collections: Arc<Collections>,
}

impl<S: DocumentStore + ?Sized> Clone for DepartmentRepository<S> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store), collections: Arc::clone(&self.collections) }
    }
}

impl<S: DocumentStore + ?Sized> DepartmentRepository<S> {
    pub fn new(store: Arc<S>, collections: Arc<Collections>) -> Self {
        Self { store, collections }
    }

    /// All departments sorted by name, ignoring case. A failed read is
    /// logged and yields an empty list.
    pub async fn list_sorted(&self) -> Vec<Department> {
        let name = self.collections.name(Department::COLLECTION);
        let departments = match self.store.list(name, &[]).await {
            Ok(documents) => decode_all(name, documents),
            Err(e) => Err(e),
        };

        match departments {
            Ok(mut departments) => {
                sort_by_name(&mut departments);
                departments
            }
            Err(e) => {
                warn!("failed to fetch departments: {}", e);
                Vec::new()
            }
        }
    }
}
