//! Link diff computation
//!
//! Pure and synchronous. Given the snapshot a test case was loaded with and
//! the snapshot after editing, produce the add/remove sets per category and
//! the folder before/after pair. Whether the folder actually moves is left
//! to the reconciler.

use std::collections::HashSet;

use casesync_domain::constants::ROOT_FOLDER;
use casesync_domain::{CategoryDiff, FolderDiff, LinkCategory, LinkDiff, LinkSelection};

/// Compute the minimal diff that turns `original` into `current`.
///
/// For each category `to_add = current − original` and
/// `to_remove = original − current`. Duplicates collapse and blank ids are
/// ignored; the order of first appearance is kept so results are stable.
pub fn compute_diff(original: &LinkSelection, current: &LinkSelection) -> LinkDiff {
    let mut diff = LinkDiff {
        folder: FolderDiff {
            original: normalize_folder_path(&original.folder_path),
            current: normalize_folder_path(&current.folder_path),
        },
        ..LinkDiff::default()
    };

    for category in LinkCategory::ALL {
        let before = original.ids(category);
        let after = current.ids(category);
        *diff.category_mut(category) = CategoryDiff {
            to_add: difference(after, before),
            to_remove: difference(before, after),
        };
    }

    diff
}

/// Canonical folder path: leading `/`, no trailing `/`, empty means root.
pub fn normalize_folder_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        ROOT_FOLDER.to_string()
    } else {
        format!("/{trimmed}")
    }
}

fn difference(left: &[String], right: &[String]) -> Vec<String> {
    let exclude: HashSet<&str> = right.iter().map(|id| id.trim()).collect();
    let mut seen = HashSet::new();

    left.iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty() && !exclude.contains(id) && seen.insert(*id))
        .map(str::to_string)
        .collect()
}
