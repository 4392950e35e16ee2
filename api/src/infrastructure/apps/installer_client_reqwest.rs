use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use crate::application::ports::app_installer_client::AppInstallerClient;
use crate::domain::apps::manifest::AppManifest;

pub struct ReqwestAppInstallerClient {
    client: reqwest::Client,
}

impl ReqwestAppInstallerClient {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build app installer http client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl AppInstallerClient for ReqwestAppInstallerClient {
    async fn fetch_manifest(&self, manifest_url: &str) -> anyhow::Result<AppManifest> {
        let resp = self
            .client
            .get(manifest_url)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("request failed: {e}"))?;
        if !resp.status().is_success() {
            anyhow::bail!("manifest url returned status {}", resp.status());
        }
        let manifest = resp
            .json::<AppManifest>()
            .await
            .map_err(|e| anyhow::anyhow!("malformed manifest: {e}"))?;
        Ok(manifest)
    }

    async fn send_token(&self, target_url: &str, auth_token: &str) -> anyhow::Result<()> {
        let resp = self
            .client
            .post(target_url)
            .json(&json!({ "auth_token": auth_token }))
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("request failed: {e}"))?;
        if !resp.status().is_success() {
            anyhow::bail!("token target returned status {}", resp.status());
        }
        Ok(())
    }
}
