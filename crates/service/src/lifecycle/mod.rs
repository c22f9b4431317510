//! Service lifecycle module: the state machine over a ride request's
//! status and the authorization rules for who may move it.

pub mod domain;
pub mod errors;
pub mod repo;
pub mod repository;
pub mod service;

pub use service::{LifecyclePolicy, ServiceLifecycle};
