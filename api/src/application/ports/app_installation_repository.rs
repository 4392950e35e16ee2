use async_trait::async_trait;

use crate::domain::apps::app_installation::{AppInstallation, NewAppInstallation};
use crate::domain::apps::job_status::JobStatus;

#[async_trait]
pub trait AppInstallationRepository: Send + Sync {
    async fn create(&self, new: &NewAppInstallation) -> anyhow::Result<AppInstallation>;

    async fn get(&self, id: i32) -> anyhow::Result<Option<AppInstallation>>;

    async fn list(&self) -> anyhow::Result<Vec<AppInstallation>>;

    /// Moves the installation to `to` only while it is still in `from`.
    /// Returns `None` when the row is gone or in another status.
    async fn transition_status(
        &self,
        id: i32,
        from: JobStatus,
        to: JobStatus,
        message: Option<&str>,
    ) -> anyhow::Result<Option<AppInstallation>>;

    async fn delete(&self, id: i32) -> anyhow::Result<bool>;

    /// Deletes the installation only while it is in `status`, returning the
    /// removed row.
    async fn delete_if_status(
        &self,
        id: i32,
        status: JobStatus,
    ) -> anyhow::Result<Option<AppInstallation>>;
}
