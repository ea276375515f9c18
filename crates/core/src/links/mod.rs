//! Test case relationship (link) management

pub mod diff;
pub mod ports;
pub mod reconciler;

pub use diff::{compute_diff, normalize_folder_path};
pub use ports::*;
pub use reconciler::LinkReconciler;
