use crate::application::access::Requestor;
use crate::application::dto::apps::{AppError, AppErrorCode};
use crate::application::ports::app_installation_repository::AppInstallationRepository;
use crate::application::ports::install_task_queue::{InstallAppJob, InstallTaskQueue};
use crate::domain::apps::app_installation::AppInstallation;
use crate::domain::apps::job_status::JobStatus;
use crate::domain::apps::permission::Permission;

use super::{ScopedLookup, load_scoped_installation, not_found_error, out_of_scope_error};

#[derive(thiserror::Error, Debug)]
pub enum RetryInstallError {
    #[error("app installation {0} not found")]
    NotFound(i32),
    #[error("app installation is out of the requestor's scope")]
    OutOfScope { missing: Vec<Permission> },
    #[error("cannot retry an installation in status {0}")]
    InvalidStatus(JobStatus),
    #[error("failed to load or persist app installation")]
    Persist(#[source] anyhow::Error),
    #[error("failed to dispatch installation job")]
    Dispatch(#[source] anyhow::Error),
}

impl RetryInstallError {
    /// Field-attributed error for rejections the caller can act on.
    pub fn app_error(&self) -> Option<AppError> {
        match self {
            RetryInstallError::NotFound(id) => Some(not_found_error("id", *id)),
            RetryInstallError::OutOfScope { missing } => {
                Some(out_of_scope_error("id", missing.clone()))
            }
            RetryInstallError::InvalidStatus(_) => Some(AppError::new(
                "id",
                AppErrorCode::InvalidStatus,
                "Cannot retry installation with different status than failed installation.",
            )),
            RetryInstallError::Persist(_) | RetryInstallError::Dispatch(_) => None,
        }
    }
}

pub struct RetryAppInstallation<'a, R, Q>
where
    R: AppInstallationRepository + ?Sized,
    Q: InstallTaskQueue + ?Sized,
{
    pub installations: &'a R,
    pub tasks: &'a Q,
}

impl<'a, R, Q> RetryAppInstallation<'a, R, Q>
where
    R: AppInstallationRepository + ?Sized,
    Q: InstallTaskQueue + ?Sized,
{
    pub async fn execute(
        &self,
        requestor: &Requestor,
        installation_id: i32,
        activate_after_installation: bool,
    ) -> Result<AppInstallation, RetryInstallError> {
        let installation =
            match load_scoped_installation(self.installations, requestor, installation_id)
                .await
                .map_err(RetryInstallError::Persist)?
            {
                ScopedLookup::Found(installation) => installation,
                ScopedLookup::NotFound => return Err(RetryInstallError::NotFound(installation_id)),
                ScopedLookup::OutOfScope(missing) => {
                    return Err(RetryInstallError::OutOfScope { missing });
                }
            };

        if !installation.can_retry() {
            return Err(RetryInstallError::InvalidStatus(installation.status));
        }

        let updated = self
            .installations
            .transition_status(installation_id, JobStatus::Failed, JobStatus::Pending, None)
            .await
            .map_err(RetryInstallError::Persist)?;
        let Some(updated) = updated else {
            // Another retry or a delete won the race since the row was read.
            let current = self
                .installations
                .get(installation_id)
                .await
                .map_err(RetryInstallError::Persist)?;
            return Err(match current {
                Some(current) => RetryInstallError::InvalidStatus(current.status),
                None => RetryInstallError::NotFound(installation_id),
            });
        };

        let dispatched = self
            .tasks
            .enqueue(InstallAppJob {
                installation_id,
                activate_after_installation,
            })
            .await;
        if let Err(err) = dispatched {
            // Without a job the row would sit in PENDING forever.
            if let Err(revert) = self
                .installations
                .transition_status(
                    installation_id,
                    JobStatus::Pending,
                    JobStatus::Failed,
                    installation.message.as_deref(),
                )
                .await
            {
                tracing::error!(installation_id, error = ?revert, "app_installation_retry_revert_failed");
            }
            return Err(RetryInstallError::Dispatch(err));
        }

        tracing::info!(
            installation_id,
            requestor = %requestor.label(),
            activate_after_installation,
            "app_installation_retry_dispatched"
        );
        Ok(updated)
    }
}
