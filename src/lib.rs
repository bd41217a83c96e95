//! Campus community client.
//!
//! A thin client over a hosted document store. Membership changes go through
//! a single [`Reconciler`] that applies them speculatively to a local cache,
//! then either refetches authoritative state or restores the pre-mutation
//! snapshot when the remote call settles.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod policy;
pub mod reconciler;
pub mod service;

pub use cache::{CachedCommunityList, QueryKey};
pub use config::{BackendConfig, ClientConfig, LogConfig};
pub use error::{ClientError, ConfigError, Result};
pub use policy::{MembershipPolicy, PolicyViolation};
pub use reconciler::{Mutation, MutationReport, MutationState, Reconciler};
pub use service::CommunityService;

pub use campus_entity as entity;
pub use campus_store as store;
