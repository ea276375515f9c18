//! Authentication against the remote API

pub mod session;
pub mod token_manager;

pub use session::TokenSession;
pub use token_manager::{AuthTokenManager, TokenGrant};
