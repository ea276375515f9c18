//! External service integrations

pub mod testmgmt;
