//! Integration engine facade
//!
//! Wires the token session, bulk importer, job poller and link reconciler
//! together behind the operations the HTTP layer calls. The engine keeps no
//! state between calls beyond what lives in the [`ConfigStore`].

use std::sync::Arc;

use casesync_core::{
    compute_diff, normalize_folder_path, AccessTokenProvider, ConfigStore, LinkReconciler,
};
use casesync_domain::{
    CaseSyncError, Config, Credentials, ImportJob, LinkCategory, LinkDiff, LinkSelection,
    LinkTarget, ProjectScope, ReconciliationResult, Result, SubmittedImport, TestCaseRecord,
};
use tracing::{info, instrument, warn};

use crate::auth::{AuthTokenManager, TokenSession};
use crate::integrations::testmgmt::{
    BulkImportSubmitter, GraphQlGateway, GraphQlLinkGateway, JobStatusPoller, RemoteEndpoints,
};

pub struct IntegrationEngine {
    tokens: Arc<dyn AccessTokenProvider>,
    auth: Arc<AuthTokenManager>,
    importer: BulkImportSubmitter,
    poller: JobStatusPoller,
    graphql: Arc<GraphQlGateway>,
}

impl IntegrationEngine {
    /// Build an engine whose tokens are cached in, and refreshed through, `store`.
    pub fn new(store: Arc<dyn ConfigStore>) -> Result<Self> {
        let config = store.read_config()?;
        config.validate()?;

        let endpoints = RemoteEndpoints::new(&config.remote.base_url)?;
        let auth = Arc::new(AuthTokenManager::new(&endpoints, config.token)?);
        let tokens = Arc::new(TokenSession::new(store, Arc::clone(&auth)));

        Self::assemble(&config, endpoints, auth, tokens)
    }

    /// Build an engine that takes bearer tokens from a caller-supplied provider.
    pub fn with_token_provider(
        config: &Config,
        tokens: Arc<dyn AccessTokenProvider>,
    ) -> Result<Self> {
        config.validate()?;

        let endpoints = RemoteEndpoints::new(&config.remote.base_url)?;
        let auth = Arc::new(AuthTokenManager::new(&endpoints, config.token)?);
        Self::assemble(config, endpoints, auth, tokens)
    }

    fn assemble(
        config: &Config,
        endpoints: RemoteEndpoints,
        auth: Arc<AuthTokenManager>,
        tokens: Arc<dyn AccessTokenProvider>,
    ) -> Result<Self> {
        Ok(Self {
            importer: BulkImportSubmitter::new(&endpoints)?,
            graphql: Arc::new(GraphQlGateway::new(&endpoints)?),
            poller: JobStatusPoller::new(endpoints, config.polling)?,
            tokens,
            auth,
        })
    }

    // ---------------------------------------------------------------------
    // Import
    // ---------------------------------------------------------------------

    pub async fn submit_import(&self, records: &[TestCaseRecord]) -> Result<SubmittedImport> {
        self.importer.submit(records, self.tokens.as_ref()).await
    }

    pub async fn await_import(&self, job_id: &str) -> Result<ImportJob> {
        self.poller.poll(job_id, self.tokens.as_ref()).await
    }

    /// Submit and poll the resulting job to completion.
    pub async fn submit_and_await(&self, records: &[TestCaseRecord]) -> Result<ImportJob> {
        let submitted = self.submit_import(records).await?;
        self.await_import(&submitted.job_id).await
    }

    // ---------------------------------------------------------------------
    // Links
    // ---------------------------------------------------------------------

    pub fn compute_diff(&self, original: &LinkSelection, current: &LinkSelection) -> LinkDiff {
        compute_diff(original, current)
    }

    /// Apply `diff` to the test. Fails only when no token can be obtained;
    /// individual link failures are reported inside the result.
    #[instrument(skip(self, diff))]
    pub async fn reconcile(
        &self,
        test_issue_id: &str,
        diff: &LinkDiff,
        project_id: &str,
    ) -> Result<ReconciliationResult> {
        let gateway = self.link_gateway(test_issue_id).await?;
        Ok(self.run_reconciler(gateway, test_issue_id, diff, &ProjectScope::from_id(project_id)).await)
    }

    /// Like [`reconcile`](Self::reconcile), resolving the project id from its key
    /// when the folder placement changes. A failed lookup only skips the folder.
    #[instrument(skip(self, diff))]
    pub async fn reconcile_for_project_key(
        &self,
        test_issue_id: &str,
        diff: &LinkDiff,
        project_key: &str,
    ) -> Result<ReconciliationResult> {
        let gateway = self.link_gateway(test_issue_id).await?;

        let moves_folder = normalize_folder_path(&diff.folder.original)
            != normalize_folder_path(&diff.folder.current);
        let project = if moves_folder {
            match gateway.resolve_project_id(project_key).await {
                Ok(project_id) => ProjectScope::Resolved(project_id),
                Err(err) => {
                    warn!(project_key, kind = err.label(), error = %err, "project id lookup failed");
                    ProjectScope::Unresolved(err.detail())
                }
            }
        } else {
            ProjectScope::Unresolved("folder unchanged".into())
        };

        Ok(self.run_reconciler(gateway, test_issue_id, diff, &project).await)
    }

    pub async fn resolve_project_id(&self, project_key: &str) -> Result<String> {
        let token = self.tokens.access_token().await?;
        GraphQlLinkGateway::new(Arc::clone(&self.graphql), token).resolve_project_id(project_key).await
    }

    pub async fn fetch_link_selection(&self, test_issue_id: &str) -> Result<LinkSelection> {
        self.link_gateway(test_issue_id).await?.fetch_link_selection(test_issue_id).await
    }

    pub async fn list_link_targets(
        &self,
        category: LinkCategory,
        project_key: &str,
    ) -> Result<Vec<LinkTarget>> {
        let token = self.tokens.access_token().await?;
        GraphQlLinkGateway::new(Arc::clone(&self.graphql), token)
            .list_link_targets(category, project_key)
            .await
    }

    // ---------------------------------------------------------------------
    // Credentials
    // ---------------------------------------------------------------------

    /// Check credentials against the remote without touching the stored token.
    pub async fn validate_credentials(&self, credentials: &Credentials) -> Result<()> {
        self.auth.validate_credentials(credentials).await?;
        info!(client_id = %credentials.client_id, "credentials accepted");
        Ok(())
    }

    async fn link_gateway(&self, test_issue_id: &str) -> Result<GraphQlLinkGateway> {
        if test_issue_id.trim().is_empty() {
            return Err(CaseSyncError::InvalidInput("test issue id is required".into()));
        }
        let token = self.tokens.access_token().await?;
        Ok(GraphQlLinkGateway::new(Arc::clone(&self.graphql), token))
    }

    async fn run_reconciler(
        &self,
        gateway: GraphQlLinkGateway,
        test_issue_id: &str,
        diff: &LinkDiff,
        project: &ProjectScope,
    ) -> ReconciliationResult {
        LinkReconciler::new(Arc::new(gateway)).reconcile(test_issue_id, diff, project).await
    }
}
