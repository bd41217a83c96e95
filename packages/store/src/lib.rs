#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
// Allow unwrap/expect in test code for convenience
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod codec;
pub mod collections;
pub mod document;
pub mod error;
pub mod memory;
pub mod repository;
pub mod rest;

pub use codec::{Record, decode, encode};
pub use collections::{Collection, Collections};
pub use document::{Document, DocumentId, DocumentStore, Fields, Filter};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use repository::*;
pub use rest::{RestConfig, RestStore};

pub type Result<T> = std::result::Result<T, StoreError>;
