//! Typed records at the store boundary.
//!
//! Documents come back as untyped attribute maps. Everything above the store
//! works with records, converted here on ingress and egress.

use crate::collections::Collection;
use crate::document::{Document, Fields};
use crate::error::StoreError;
use campus_entity::{CommunityEvent, Community, Department, MembershipAssociation, UserProfile};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub trait Record: Serialize + DeserializeOwned {
    const COLLECTION: Collection;

    fn set_id(&mut self, id: String);
}

/// Read `document` as `T`, attaching the envelope ID.
///
/// `collection` is only used to label a decode failure.
pub fn decode<T: Record>(collection: &str, document: Document) -> Result<T, StoreError> {
    let Document { id, fields } = document;
    let mut record: T = serde_json::from_value(Value::Object(fields)).map_err(|source| {
        StoreError::Decode { collection: collection.to_string(), id: id.clone(), source }
    })?;
    record.set_id(id);
    Ok(record)
}

pub fn decode_all<T: Record>(
    collection: &str,
    documents: Vec<Document>,
) -> Result<Vec<T>, StoreError> {
    documents.into_iter().map(|document| decode(collection, document)).collect()
}

/// Attribute map for `record`. The ID is not part of the fields.
pub fn encode<T: Record>(record: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(record)? {
        Value::Object(fields) => Ok(fields),
        other => Err(StoreError::Protocol {
            reason: format!("record encoded as {} instead of an object", kind(&other)),
        }),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

macro_rules! record {
    ($ty:ty, $collection:expr) => {
        impl Record for $ty {
            const COLLECTION: Collection = $collection;

            fn set_id(&mut self, id: String) {
                self.id = id;
            }
        }
    };
}

record!(Community, Collection::Communities);
record!(MembershipAssociation, Collection::CommunityMembers);
record!(CommunityEvent, Collection::Events);
record!(UserProfile, Collection::Users);
record!(Department, Collection::Departments);
