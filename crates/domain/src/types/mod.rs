//! Domain types and models

pub mod auth;
pub mod import;
pub mod links;

pub use auth::{CachedToken, Credentials};
pub use import::{CreatedIssue, ImportJob, JobStatus, SubmittedImport, TestCaseRecord, TestStep};
pub use links::{
    CategoryDiff, CategoryResult, FolderDiff, FolderResult, LinkCategory, LinkDiff, LinkOutcome,
    LinkSelection, LinkTarget, ProjectScope, ReconciliationResult,
};
