//! GraphQL adapter for relationship (link) mutations and lookups

use std::sync::Arc;

use async_trait::async_trait;
use casesync_core::{normalize_folder_path, FolderAck, LinkAck, LinkGateway};
use casesync_domain::{CaseSyncError, LinkCategory, LinkSelection, LinkTarget, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::graphql::GraphQlGateway;
use super::queries::{self, category_documents};

/// Page size for relationship lookups.
const LOOKUP_LIMIT: u32 = 100;

/// [`LinkGateway`] bound to one bearer token.
///
/// Built per reconciliation so that a single token serves every mutation of
/// that call.
pub struct GraphQlLinkGateway {
    graphql: Arc<GraphQlGateway>,
    token: String,
}

impl GraphQlLinkGateway {
    pub fn new(graphql: Arc<GraphQlGateway>, token: impl Into<String>) -> Self {
        Self { graphql, token: token.into() }
    }

    async fn mutate(&self, query: &str, field: &str, variables: Value) -> Result<Value> {
        let mut data: Value = self.graphql.execute(&self.token, query, variables).await?;
        match data.get_mut(field).map(Value::take) {
            Some(Value::Null) | None => {
                Err(CaseSyncError::RemoteProtocol(format!("mutation {field} returned no payload")))
            }
            Some(payload) => Ok(payload),
        }
    }

    async fn link(
        &self,
        category: LinkCategory,
        target_id: &str,
        test_issue_id: &str,
        adding: bool,
    ) -> Result<LinkAck> {
        let documents = category_documents(category);
        let (query, field) = if adding {
            (documents.add, documents.add_field)
        } else {
            (documents.remove, documents.remove_field)
        };

        let variables = match category {
            LinkCategory::Preconditions => {
                json!({ "issueId": test_issue_id, "preconditionIssueIds": [target_id] })
            }
            _ => json!({ "issueId": target_id, "testIssueIds": [test_issue_id] }),
        };

        debug!(%category, target_id, adding, "sending link mutation");
        let detail = self.mutate(query, field, variables).await?;
        let warning = detail
            .get("warning")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|warning| !warning.is_empty())
            .map(str::to_string);

        Ok(LinkAck { detail, warning })
    }

    async fn folder(
        &self,
        query: &str,
        field: &str,
        project_id: &str,
        path: &str,
        test_issue_id: &str,
    ) -> Result<FolderAck> {
        let variables = json!({
            "projectId": project_id,
            "path": path,
            "testIssueIds": [test_issue_id],
        });
        let detail = self.mutate(query, field, variables).await?;
        let warnings = detail
            .get("warnings")
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(Value::as_str)
                    .filter(|warning| !warning.trim().is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(FolderAck { detail, warnings })
    }

    /// Look up the numeric project id for a project key.
    pub async fn resolve_project_id(&self, project_key: &str) -> Result<String> {
        let key = project_key.trim();
        if key.is_empty() {
            return Err(CaseSyncError::ProjectIdUnresolved("project key is empty".into()));
        }

        let data: ProjectSettingsData = self
            .graphql
            .execute(&self.token, queries::GET_PROJECT_SETTINGS, json!({ "projectIdOrKey": key }))
            .await
            .map_err(|err| match err {
                CaseSyncError::RemoteProtocol(message) => {
                    CaseSyncError::ProjectIdUnresolved(format!("{key}: {message}"))
                }
                other => other,
            })?;

        data.get_project_settings
            .and_then(|settings| settings.project_id)
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| CaseSyncError::ProjectIdUnresolved(format!("no project id for {key}")))
    }

    /// Current remote relationships of a test as a [`LinkSelection`].
    pub async fn fetch_link_selection(&self, test_issue_id: &str) -> Result<LinkSelection> {
        let data: TestLinksData = self
            .graphql
            .execute(
                &self.token,
                queries::GET_TEST_LINKS,
                json!({ "issueId": test_issue_id, "limit": LOOKUP_LIMIT }),
            )
            .await?;

        let test = data
            .get_test
            .ok_or_else(|| CaseSyncError::NotFound(format!("test {test_issue_id}")))?;

        Ok(LinkSelection {
            test_plan_ids: issue_ids(test.test_plans),
            test_execution_ids: issue_ids(test.test_executions),
            test_set_ids: issue_ids(test.test_sets),
            precondition_ids: issue_ids(test.preconditions),
            folder_path: normalize_folder_path(
                test.folder.and_then(|folder| folder.path).as_deref().unwrap_or_default(),
            ),
            project_id: test.project_id.unwrap_or_default(),
        })
    }

    /// Entities of `category` in a project, for selection pickers.
    pub async fn list_link_targets(
        &self,
        category: LinkCategory,
        project_key: &str,
    ) -> Result<Vec<LinkTarget>> {
        let key = project_key.trim();
        if key.is_empty() {
            return Err(CaseSyncError::InvalidInput("project key is required".into()));
        }

        let documents = category_documents(category);
        let jql = format!("project = \"{}\"", key.replace('\\', "\\\\").replace('"', "\\\""));
        let mut data: Value = self
            .graphql
            .execute(&self.token, documents.list, json!({ "jql": jql, "limit": LOOKUP_LIMIT }))
            .await?;

        let page: Option<TargetPage> = match data.get_mut(documents.list_field).map(Value::take) {
            Some(Value::Null) | None => None,
            Some(page) => Some(serde_json::from_value(page).map_err(|err| {
                CaseSyncError::RemoteProtocol(format!("unexpected {} payload: {err}", documents.list_field))
            })?),
        };

        Ok(page
            .map(|page| {
                page.results
                    .into_iter()
                    .map(|entry| {
                        let jira = entry.jira.unwrap_or_default();
                        LinkTarget {
                            issue_id: entry.issue_id,
                            key: jira.key.unwrap_or_default(),
                            summary: jira.summary.unwrap_or_default(),
                        }
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[async_trait]
impl LinkGateway for GraphQlLinkGateway {
    async fn add_link(
        &self,
        category: LinkCategory,
        target_id: &str,
        test_issue_id: &str,
    ) -> Result<LinkAck> {
        self.link(category, target_id, test_issue_id, true).await
    }

    async fn remove_link(
        &self,
        category: LinkCategory,
        target_id: &str,
        test_issue_id: &str,
    ) -> Result<LinkAck> {
        self.link(category, target_id, test_issue_id, false).await
    }

    async fn add_to_folder(
        &self,
        project_id: &str,
        path: &str,
        test_issue_id: &str,
    ) -> Result<FolderAck> {
        self.folder(queries::ADD_TESTS_TO_FOLDER, "addTestsToFolder", project_id, path, test_issue_id)
            .await
    }

    async fn remove_from_folder(
        &self,
        project_id: &str,
        path: &str,
        test_issue_id: &str,
    ) -> Result<FolderAck> {
        self.folder(
            queries::REMOVE_TESTS_FROM_FOLDER,
            "removeTestsFromFolder",
            project_id,
            path,
            test_issue_id,
        )
        .await
    }
}

// =============================================================================
// GraphQL response types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectSettingsData {
    get_project_settings: Option<ProjectSettings>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectSettings {
    project_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TestLinksData {
    get_test: Option<TestLinks>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TestLinks {
    project_id: Option<String>,
    folder: Option<FolderRef>,
    test_plans: Option<IssueRefs>,
    test_executions: Option<IssueRefs>,
    test_sets: Option<IssueRefs>,
    preconditions: Option<IssueRefs>,
}

#[derive(Debug, Deserialize)]
struct FolderRef {
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IssueRefs {
    #[serde(default)]
    results: Vec<IssueRef>,
}

fn issue_ids(refs: Option<IssueRefs>) -> Vec<String> {
    refs.map(|refs| refs.results.into_iter().map(|entry| entry.issue_id).collect())
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueRef {
    issue_id: String,
}

#[derive(Debug, Deserialize)]
struct TargetPage {
    #[serde(default)]
    results: Vec<TargetEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TargetEntry {
    issue_id: String,
    jira: Option<JiraFields>,
}

#[derive(Debug, Default, Deserialize)]
struct JiraFields {
    key: Option<String>,
    summary: Option<String>,
}
