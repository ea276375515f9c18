//! Link reconciliation service
//!
//! Applies a [`LinkDiff`] through a [`LinkGateway`]. Every add/remove in the
//! four set-valued categories runs concurrently and independently: a failure
//! is captured on that id's outcome plus one warning, and never cancels a
//! sibling. The folder move is the only ordered branch (remove from the old
//! folder, then add to the new one) and itself runs alongside the category
//! fan-out.

use std::sync::Arc;

use casesync_domain::constants::ROOT_FOLDER;
use casesync_domain::{
    CategoryDiff, CategoryResult, FolderDiff, FolderResult, LinkCategory, LinkDiff, LinkOutcome,
    ProjectScope, ReconciliationResult,
};
use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

use super::diff::normalize_folder_path;
use super::ports::LinkGateway;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkAction {
    Add,
    Remove,
}

impl LinkAction {
    fn verb(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }
}

/// Outcome of one operation plus any warning it contributes.
type Step = (LinkOutcome, Vec<String>);

/// Executes link diffs with partial-failure tolerance.
pub struct LinkReconciler {
    gateway: Arc<dyn LinkGateway>,
}

impl LinkReconciler {
    pub fn new(gateway: Arc<dyn LinkGateway>) -> Self {
        Self { gateway }
    }

    /// Apply `diff` to the test identified by `test_issue_id`.
    ///
    /// Never fails: callers inspect per-item outcomes and `warnings` to
    /// detect partial failure. Failed links are not retried here.
    #[instrument(skip(self, diff, project))]
    pub async fn reconcile(
        &self,
        test_issue_id: &str,
        diff: &LinkDiff,
        project: &ProjectScope,
    ) -> ReconciliationResult {
        let categories = join_all(LinkCategory::ALL.iter().map(|category| {
            self.reconcile_category(*category, diff.category(*category), test_issue_id)
        }));
        let folder = self.reconcile_folder(&diff.folder, project, test_issue_id);

        let (categories, (folder, folder_warnings)) = futures::join!(categories, folder);

        let mut result = ReconciliationResult::default();
        for (category, (category_result, warnings)) in LinkCategory::ALL.iter().zip(categories) {
            *result.category_mut(*category) = category_result;
            result.warnings.extend(warnings);
        }
        result.folder = folder;
        result.warnings.extend(folder_warnings);

        let failed = result.failed_count();
        if failed > 0 {
            warn!(failed, warnings = result.warnings.len(), "Reconciliation completed with failures");
        } else {
            info!(warnings = result.warnings.len(), "Reconciliation completed");
        }

        result
    }

    async fn reconcile_category(
        &self,
        category: LinkCategory,
        diff: &CategoryDiff,
        test_issue_id: &str,
    ) -> (CategoryResult, Vec<String>) {
        if diff.is_empty() {
            return (CategoryResult::default(), Vec::new());
        }
        debug!(%category, to_add = diff.to_add.len(), to_remove = diff.to_remove.len(), "Reconciling category");

        let adds = join_all(
            diff.to_add.iter().map(|id| self.apply_link(category, LinkAction::Add, id, test_issue_id)),
        );
        let removes = join_all(
            diff.to_remove
                .iter()
                .map(|id| self.apply_link(category, LinkAction::Remove, id, test_issue_id)),
        );
        let (adds, removes) = futures::join!(adds, removes);

        let mut warnings = Vec::new();
        let mut result = CategoryResult::default();
        for (outcome, step_warnings) in adds {
            result.added.push(outcome);
            warnings.extend(step_warnings);
        }
        for (outcome, step_warnings) in removes {
            result.removed.push(outcome);
            warnings.extend(step_warnings);
        }

        (result, warnings)
    }

    async fn apply_link(
        &self,
        category: LinkCategory,
        action: LinkAction,
        target_id: &str,
        test_issue_id: &str,
    ) -> Step {
        let response = match action {
            LinkAction::Add => self.gateway.add_link(category, target_id, test_issue_id).await,
            LinkAction::Remove => self.gateway.remove_link(category, target_id, test_issue_id).await,
        };

        match response {
            Ok(ack) => {
                let warnings = ack
                    .warning
                    .filter(|w| !w.trim().is_empty())
                    .map(|w| vec![format!("{category} {target_id} {}: {w}", action.verb())])
                    .unwrap_or_default();
                (LinkOutcome::succeeded(target_id, ack.detail), warnings)
            }
            Err(err) => {
                let message = err.detail();
                warn!(
                    %category,
                    target_id,
                    action = action.verb(),
                    kind = err.label(),
                    error = %message,
                    "Link operation failed"
                );
                let warning = format!("{category} {target_id} {} failed: {message}", action.verb());
                (LinkOutcome::failed(target_id, message), vec![warning])
            }
        }
    }

    async fn reconcile_folder(
        &self,
        folder: &FolderDiff,
        project: &ProjectScope,
        test_issue_id: &str,
    ) -> (Option<FolderResult>, Vec<String>) {
        let folder = FolderDiff {
            original: normalize_folder_path(&folder.original),
            current: normalize_folder_path(&folder.current),
        };
        if !folder.is_move() {
            return (None, Vec::new());
        }

        let project_id = match project {
            ProjectScope::Resolved(id) if !id.trim().is_empty() => id.as_str(),
            ProjectScope::Resolved(_) => {
                return (None, vec![folder_skipped_warning("no project id supplied")]);
            }
            ProjectScope::Unresolved(reason) => {
                warn!(reason = %reason, "Skipping folder placement: project id unresolved");
                return (None, vec![folder_skipped_warning(reason)]);
            }
        };

        let mut warnings = Vec::new();

        // Remove must settle before add; a failed removal still lets the add run.
        let removed = if folder.original == ROOT_FOLDER {
            None
        } else {
            let (outcome, step_warnings) = self
                .apply_folder(LinkAction::Remove, project_id, &folder.original, test_issue_id)
                .await;
            warnings.extend(step_warnings);
            Some(outcome)
        };

        let added = if folder.current == ROOT_FOLDER {
            None
        } else {
            let (outcome, step_warnings) = self
                .apply_folder(LinkAction::Add, project_id, &folder.current, test_issue_id)
                .await;
            warnings.extend(step_warnings);
            Some(outcome)
        };

        let result = FolderResult {
            original: folder.original,
            current: folder.current,
            removed,
            added,
        };
        (Some(result), warnings)
    }

    async fn apply_folder(
        &self,
        action: LinkAction,
        project_id: &str,
        path: &str,
        test_issue_id: &str,
    ) -> Step {
        let response = match action {
            LinkAction::Add => self.gateway.add_to_folder(project_id, path, test_issue_id).await,
            LinkAction::Remove => {
                self.gateway.remove_from_folder(project_id, path, test_issue_id).await
            }
        };

        match response {
            Ok(ack) => {
                let warnings = ack
                    .warnings
                    .into_iter()
                    .filter(|w| !w.trim().is_empty())
                    .map(|w| format!("Folder {path} {}: {w}", action.verb()))
                    .collect();
                (LinkOutcome::succeeded(path, ack.detail), warnings)
            }
            Err(err) => {
                let message = err.detail();
                warn!(
                    path,
                    action = action.verb(),
                    kind = err.label(),
                    error = %message,
                    "Folder operation failed"
                );
                let warning = format!("Folder {path} {} failed: {message}", action.verb());
                (LinkOutcome::failed(path, message), vec![warning])
            }
        }
    }
}

fn folder_skipped_warning(reason: &str) -> String {
    format!("Folder linking skipped: project id could not be resolved ({reason})")
}
