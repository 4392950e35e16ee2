use async_trait::async_trait;

use crate::domain::apps::manifest::AppManifest;

/// Outbound calls made to the app being installed.
#[async_trait]
pub trait AppInstallerClient: Send + Sync {
    async fn fetch_manifest(&self, manifest_url: &str) -> anyhow::Result<AppManifest>;

    async fn send_token(&self, target_url: &str, auth_token: &str) -> anyhow::Result<()>;
}
