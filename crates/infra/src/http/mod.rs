//! HTTP transport shared by every remote adapter

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
