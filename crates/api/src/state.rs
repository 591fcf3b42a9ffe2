//! Shared application state injected into handlers.

use std::sync::Arc;

use portal_aws::clients::AwsClients;
use portal_aws::content::ContentFetcher;
use portal_aws::identity::CognitoIdentity;
use portal_aws::metadata::MetadataStore;
use portal_aws::projects::ProjectContentService;
use portal_db::repositories::ProjectRepository;
use portal_db::DbPool;

use crate::config::Settings;

/// Shared application state, cloned per request.
#[derive(Clone)]
pub struct AppState {
    /// Postgres connection pool.
    pub pool: DbPool,
    /// Immutable runtime settings.
    pub settings: Arc<Settings>,
    /// Repository over the `projects` table.
    pub projects: ProjectRepository,
    /// Metadata + S3 content aggregation service.
    pub content: ProjectContentService,
    /// Cognito identity adapter.
    pub identity: CognitoIdentity,
}

impl AppState {
    /// Wire the state from a pool, resolved settings, and the shared AWS
    /// client set.
    pub fn new(pool: DbPool, settings: Arc<Settings>, clients: &AwsClients) -> Self {
        let store = MetadataStore::new(clients.dynamodb.clone(), &settings.dynamodb_table);
        let fetcher = ContentFetcher::new(clients.s3.clone());
        let identity = CognitoIdentity::new(
            clients.cognito.clone(),
            &settings.cognito_user_pool_id,
            &settings.cognito_client_id,
            settings.cognito_secret(),
        );

        Self {
            projects: ProjectRepository::new(pool.clone()),
            content: ProjectContentService::new(store, fetcher),
            identity,
            pool,
            settings,
        }
    }
}
