//! Relationship snapshots, diffs and reconciliation results

use serde::{Deserialize, Serialize};

use crate::constants::ROOT_FOLDER;

/// One of the four many-to-many relationship kinds a test can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LinkCategory {
    TestPlans,
    TestExecutions,
    TestSets,
    Preconditions,
}

impl LinkCategory {
    pub const ALL: [Self; 4] =
        [Self::TestPlans, Self::TestExecutions, Self::TestSets, Self::Preconditions];

    /// Human readable singular name used in warnings.
    pub fn label(self) -> &'static str {
        match self {
            Self::TestPlans => "Test Plan",
            Self::TestExecutions => "Test Execution",
            Self::TestSets => "Test Set",
            Self::Preconditions => "Precondition",
        }
    }
}

impl std::fmt::Display for LinkCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Snapshot of a test case's relationships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSelection {
    #[serde(default)]
    pub test_plan_ids: Vec<String>,
    #[serde(default)]
    pub test_execution_ids: Vec<String>,
    #[serde(default)]
    pub test_set_ids: Vec<String>,
    #[serde(default)]
    pub precondition_ids: Vec<String>,
    #[serde(default = "root_folder")]
    pub folder_path: String,
    #[serde(default)]
    pub project_id: String,
}

impl LinkSelection {
    pub fn ids(&self, category: LinkCategory) -> &[String] {
        match category {
            LinkCategory::TestPlans => &self.test_plan_ids,
            LinkCategory::TestExecutions => &self.test_execution_ids,
            LinkCategory::TestSets => &self.test_set_ids,
            LinkCategory::Preconditions => &self.precondition_ids,
        }
    }
}

impl Default for LinkSelection {
    fn default() -> Self {
        Self {
            test_plan_ids: Vec::new(),
            test_execution_ids: Vec::new(),
            test_set_ids: Vec::new(),
            precondition_ids: Vec::new(),
            folder_path: root_folder(),
            project_id: String::new(),
        }
    }
}

fn root_folder() -> String {
    ROOT_FOLDER.to_string()
}

/// Add/remove sets for one category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDiff {
    pub to_add: Vec<String>,
    pub to_remove: Vec<String>,
}

impl CategoryDiff {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Folder placement before and after the edit. Whether this is a move is
/// decided by the reconciler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderDiff {
    pub original: String,
    pub current: String,
}

impl FolderDiff {
    pub fn is_move(&self) -> bool {
        self.original != self.current
    }
}

impl Default for FolderDiff {
    fn default() -> Self {
        Self { original: root_folder(), current: root_folder() }
    }
}

/// Derived difference between two [`LinkSelection`] snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDiff {
    pub test_plans: CategoryDiff,
    pub test_executions: CategoryDiff,
    pub test_sets: CategoryDiff,
    pub preconditions: CategoryDiff,
    pub folder: FolderDiff,
}

impl LinkDiff {
    pub fn category(&self, category: LinkCategory) -> &CategoryDiff {
        match category {
            LinkCategory::TestPlans => &self.test_plans,
            LinkCategory::TestExecutions => &self.test_executions,
            LinkCategory::TestSets => &self.test_sets,
            LinkCategory::Preconditions => &self.preconditions,
        }
    }

    pub fn category_mut(&mut self, category: LinkCategory) -> &mut CategoryDiff {
        match category {
            LinkCategory::TestPlans => &mut self.test_plans,
            LinkCategory::TestExecutions => &mut self.test_executions,
            LinkCategory::TestSets => &mut self.test_sets,
            LinkCategory::Preconditions => &mut self.preconditions,
        }
    }

    /// Nothing to add, remove or move.
    pub fn is_noop(&self) -> bool {
        LinkCategory::ALL.iter().all(|c| self.category(*c).is_empty()) && !self.folder.is_move()
    }
}

/// Whether the project id needed for folder placement is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectScope {
    Resolved(String),
    /// The id-from-key lookup failed; carries the reason.
    Unresolved(String),
}

impl ProjectScope {
    /// Treats an empty id as unresolved.
    pub fn from_id(project_id: &str) -> Self {
        if project_id.trim().is_empty() {
            Self::Unresolved("no project id supplied".into())
        } else {
            Self::Resolved(project_id.to_string())
        }
    }
}

/// Outcome of a single add or remove against one target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkOutcome {
    pub id: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LinkOutcome {
    pub fn succeeded(id: impl Into<String>, detail: serde_json::Value) -> Self {
        Self { id: id.into(), success: true, detail: Some(detail), error: None }
    }

    pub fn failed(id: impl Into<String>, error: impl Into<String>) -> Self {
        Self { id: id.into(), success: false, detail: None, error: Some(error.into()) }
    }
}

/// Per-category outcomes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub added: Vec<LinkOutcome>,
    pub removed: Vec<LinkOutcome>,
}

/// Folder move outcome. `None` steps were skipped because that end is root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderResult {
    pub original: String,
    pub current: String,
    pub removed: Option<LinkOutcome>,
    pub added: Option<LinkOutcome>,
}

/// Aggregated result of one reconciliation. Always returned, even when
/// every individual operation failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationResult {
    pub test_plans: CategoryResult,
    pub test_executions: CategoryResult,
    pub test_sets: CategoryResult,
    pub preconditions: CategoryResult,
    pub folder: Option<FolderResult>,
    pub warnings: Vec<String>,
}

impl ReconciliationResult {
    pub fn category(&self, category: LinkCategory) -> &CategoryResult {
        match category {
            LinkCategory::TestPlans => &self.test_plans,
            LinkCategory::TestExecutions => &self.test_executions,
            LinkCategory::TestSets => &self.test_sets,
            LinkCategory::Preconditions => &self.preconditions,
        }
    }

    pub fn category_mut(&mut self, category: LinkCategory) -> &mut CategoryResult {
        match category {
            LinkCategory::TestPlans => &mut self.test_plans,
            LinkCategory::TestExecutions => &mut self.test_executions,
            LinkCategory::TestSets => &mut self.test_sets,
            LinkCategory::Preconditions => &mut self.preconditions,
        }
    }

    /// Number of individual operations (folder steps included) that failed.
    pub fn failed_count(&self) -> usize {
        let categories: usize = LinkCategory::ALL
            .iter()
            .map(|c| {
                let result = self.category(*c);
                result.added.iter().chain(&result.removed).filter(|o| !o.success).count()
            })
            .sum();
        let folder = self.folder.as_ref().map_or(0, |f| {
            f.removed.iter().chain(&f.added).filter(|o| !o.success).count()
        });
        categories + folder
    }

    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
    }
}

/// Candidate link target listed for a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkTarget {
    pub issue_id: String,
    pub key: String,
    pub summary: String,
}
