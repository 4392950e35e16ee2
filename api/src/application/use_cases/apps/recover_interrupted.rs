use crate::application::ports::app_installation_repository::AppInstallationRepository;
use crate::domain::apps::job_status::JobStatus;

pub const INTERRUPTED_MESSAGE: &str = "Installation was interrupted by a server restart.";

/// Jobs live in process memory, so PENDING rows found at startup have no
/// job behind them. Failing them makes them retryable.
pub struct RecoverInterruptedInstallations<'a, R: AppInstallationRepository + ?Sized> {
    pub installations: &'a R,
}

impl<'a, R: AppInstallationRepository + ?Sized> RecoverInterruptedInstallations<'a, R> {
    pub async fn execute(&self) -> anyhow::Result<usize> {
        let mut recovered = 0;
        for installation in self.installations.list().await? {
            if installation.status != JobStatus::Pending {
                continue;
            }
            let failed = self
                .installations
                .transition_status(
                    installation.id,
                    JobStatus::Pending,
                    JobStatus::Failed,
                    Some(INTERRUPTED_MESSAGE),
                )
                .await?;
            if failed.is_some() {
                recovered += 1;
            }
        }
        if recovered > 0 {
            tracing::warn!(count = recovered, "interrupted_app_installations_failed");
        }
        Ok(recovered)
    }
}
