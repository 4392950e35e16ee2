use crate::application::access::Requestor;
use crate::application::dto::apps::{AppError, AppErrorCode};
use crate::application::ports::app_installation_repository::AppInstallationRepository;
use crate::application::ports::install_task_queue::{InstallAppJob, InstallTaskQueue};
use crate::domain::apps::app_installation::{AppInstallation, NewAppInstallation};
use crate::domain::apps::job_status::JobStatus;
use crate::domain::apps::permission::{Permission, PermissionSet};

pub const DISPATCH_FAILED_MESSAGE: &str = "Installation job could not be scheduled.";

#[derive(Debug, Clone)]
pub struct InstallAppRequest {
    pub app_name: String,
    pub manifest_url: String,
    pub activate_after_installation: bool,
    pub permissions: PermissionSet,
}

#[derive(thiserror::Error, Debug)]
pub enum InstallAppError {
    #[error("requestor lacks the manage_apps permission")]
    PermissionDenied,
    #[error("invalid app installation input")]
    Rejected(Vec<AppError>),
    #[error("failed to persist app installation")]
    Persist(#[source] anyhow::Error),
    #[error("failed to dispatch installation job")]
    Dispatch(#[source] anyhow::Error),
}

pub struct InstallApp<'a, R, Q>
where
    R: AppInstallationRepository + ?Sized,
    Q: InstallTaskQueue + ?Sized,
{
    pub installations: &'a R,
    pub tasks: &'a Q,
}

impl<'a, R, Q> InstallApp<'a, R, Q>
where
    R: AppInstallationRepository + ?Sized,
    Q: InstallTaskQueue + ?Sized,
{
    pub async fn execute(
        &self,
        requestor: &Requestor,
        req: &InstallAppRequest,
    ) -> Result<AppInstallation, InstallAppError> {
        if !requestor.has_permission(Permission::ManageApps) {
            return Err(InstallAppError::PermissionDenied);
        }
        let errors = validate(requestor, req);
        if !errors.is_empty() {
            return Err(InstallAppError::Rejected(errors));
        }

        let installation = self
            .installations
            .create(&NewAppInstallation {
                app_name: req.app_name.trim().to_string(),
                manifest_url: req.manifest_url.trim().to_string(),
                permissions: req.permissions.clone(),
            })
            .await
            .map_err(InstallAppError::Persist)?;

        let dispatched = self
            .tasks
            .enqueue(InstallAppJob {
                installation_id: installation.id,
                activate_after_installation: req.activate_after_installation,
            })
            .await;
        if let Err(err) = dispatched {
            // Failing the row keeps it retryable and deletable.
            if let Err(revert) = self
                .installations
                .transition_status(
                    installation.id,
                    JobStatus::Pending,
                    JobStatus::Failed,
                    Some(DISPATCH_FAILED_MESSAGE),
                )
                .await
            {
                tracing::error!(
                    installation_id = installation.id,
                    error = ?revert,
                    "app_installation_dispatch_revert_failed"
                );
            }
            return Err(InstallAppError::Dispatch(err));
        }

        tracing::info!(
            installation_id = installation.id,
            requestor = %requestor.label(),
            manifest_url = %installation.manifest_url,
            "app_installation_created"
        );
        Ok(installation)
    }
}

fn validate(requestor: &Requestor, req: &InstallAppRequest) -> Vec<AppError> {
    let mut errors = Vec::new();

    if req.app_name.trim().is_empty() {
        errors.push(AppError::new(
            "appName",
            AppErrorCode::Required,
            "This field is required.",
        ));
    }

    if !is_valid_manifest_url(&req.manifest_url) {
        errors.push(AppError::new(
            "manifestUrl",
            AppErrorCode::InvalidUrlFormat,
            "Enter a valid URL.",
        ));
    }

    let missing = requestor.missing_permissions(&req.permissions);
    if !missing.is_empty() {
        errors.push(
            AppError::new(
                "permissions",
                AppErrorCode::OutOfScopePermission,
                "You can't add permission that you don't have.",
            )
            .with_permissions(missing),
        );
    }
    errors
}

pub(crate) fn is_valid_manifest_url(raw: &str) -> bool {
    match reqwest::Url::parse(raw.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}
