use crate::application::access::Requestor;
use crate::application::dto::apps::{AppError, AppErrorCode};
use crate::application::ports::app_installation_repository::AppInstallationRepository;
use crate::domain::apps::app_installation::AppInstallation;
use crate::domain::apps::job_status::JobStatus;
use crate::domain::apps::permission::Permission;

use super::{ScopedLookup, load_scoped_installation, not_found_error, out_of_scope_error};

#[derive(thiserror::Error, Debug)]
pub enum DeleteFailedInstallationError {
    #[error("app installation {0} not found")]
    NotFound(i32),
    #[error("app installation is out of the requestor's scope")]
    OutOfScope { missing: Vec<Permission> },
    #[error("cannot delete an installation in status {0}")]
    InvalidStatus(JobStatus),
    #[error("failed to load or delete app installation")]
    Persist(#[source] anyhow::Error),
}

impl DeleteFailedInstallationError {
    pub fn app_error(&self) -> Option<AppError> {
        match self {
            DeleteFailedInstallationError::NotFound(id) => Some(not_found_error("id", *id)),
            DeleteFailedInstallationError::OutOfScope { missing } => {
                Some(out_of_scope_error("id", missing.clone()))
            }
            DeleteFailedInstallationError::InvalidStatus(_) => Some(AppError::new(
                "id",
                AppErrorCode::InvalidStatus,
                "Cannot delete installation because job for installation is not failed.",
            )),
            DeleteFailedInstallationError::Persist(_) => None,
        }
    }
}

pub struct DeleteFailedInstallation<'a, R: AppInstallationRepository + ?Sized> {
    pub installations: &'a R,
}

impl<'a, R: AppInstallationRepository + ?Sized> DeleteFailedInstallation<'a, R> {
    /// Returns the removed installation so the caller can echo it back.
    pub async fn execute(
        &self,
        requestor: &Requestor,
        installation_id: i32,
    ) -> Result<AppInstallation, DeleteFailedInstallationError> {
        let installation =
            match load_scoped_installation(self.installations, requestor, installation_id)
                .await
                .map_err(DeleteFailedInstallationError::Persist)?
            {
                ScopedLookup::Found(installation) => installation,
                ScopedLookup::NotFound => {
                    return Err(DeleteFailedInstallationError::NotFound(installation_id));
                }
                ScopedLookup::OutOfScope(missing) => {
                    return Err(DeleteFailedInstallationError::OutOfScope { missing });
                }
            };

        if installation.status != JobStatus::Failed {
            return Err(DeleteFailedInstallationError::InvalidStatus(
                installation.status,
            ));
        }

        let removed = self
            .installations
            .delete_if_status(installation_id, JobStatus::Failed)
            .await
            .map_err(DeleteFailedInstallationError::Persist)?;
        let Some(installation) = removed else {
            // A retry or another delete changed the row since it was read.
            let current = self
                .installations
                .get(installation_id)
                .await
                .map_err(DeleteFailedInstallationError::Persist)?;
            return Err(match current {
                Some(current) => DeleteFailedInstallationError::InvalidStatus(current.status),
                None => DeleteFailedInstallationError::NotFound(installation_id),
            });
        };
        tracing::info!(
            installation_id,
            requestor = %requestor.label(),
            "failed_app_installation_deleted"
        );
        Ok(installation)
    }
}
