//! Remote test-management API adapters
//!
//! REST bulk import and job polling, plus the GraphQL endpoint used for
//! relationship queries and mutations.

pub mod endpoints;
pub mod graphql;
pub mod import;
pub mod links;
pub mod poller;
pub mod queries;

pub use endpoints::RemoteEndpoints;
pub use graphql::GraphQlGateway;
pub use import::BulkImportSubmitter;
pub use links::GraphQlLinkGateway;
pub use poller::JobStatusPoller;
