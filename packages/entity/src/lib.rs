#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod error;
pub mod types;
pub mod utils;

pub use error::{FieldErrors, ValidationError};
pub use types::*;
