//! Infrastructure error plumbing

pub mod classify;
pub mod conversions;

pub use classify::{classify_auth_failure, join_messages, remote_message};
pub use conversions::InfraError;
