use async_trait::async_trait;

use crate::domain::apps::app::{App, NewApp, NewAppToken};

#[async_trait]
pub trait AppRepository: Send + Sync {
    async fn create_with_token(&self, app: &NewApp, token: &NewAppToken) -> anyhow::Result<App>;

    async fn find_active_by_token_hash(&self, token_hash: &str) -> anyhow::Result<Option<App>>;
}
