use crate::application::ports::app_installation_repository::AppInstallationRepository;
use crate::application::ports::app_installer_client::AppInstallerClient;
use crate::application::ports::app_repository::AppRepository;
use crate::application::ports::install_task_queue::InstallAppJob;
use crate::application::services::app_tokens;
use crate::domain::apps::app::{App, NewApp, NewAppToken};
use crate::domain::apps::app_installation::AppInstallation;
use crate::domain::apps::job_status::JobStatus;
use crate::domain::apps::manifest::ManifestError;

#[derive(thiserror::Error, Debug)]
pub enum RunInstallationError {
    #[error("failed to fetch app manifest")]
    Manifest(#[source] anyhow::Error),
    #[error("invalid app manifest")]
    InvalidManifest(#[source] ManifestError),
    #[error("failed to deliver auth token to the app")]
    TokenDelivery(#[source] anyhow::Error),
    #[error("failed to save installed app")]
    Persist(#[source] anyhow::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallationOutcome {
    Installed { app_id: i32 },
    Failed { reason: String },
    Skipped,
}

/// Body of the background installation job.
pub struct RunAppInstallation<'a, R, A, C>
where
    R: AppInstallationRepository + ?Sized,
    A: AppRepository + ?Sized,
    C: AppInstallerClient + ?Sized,
{
    pub installations: &'a R,
    pub apps: &'a A,
    pub client: &'a C,
}

impl<'a, R, A, C> RunAppInstallation<'a, R, A, C>
where
    R: AppInstallationRepository + ?Sized,
    A: AppRepository + ?Sized,
    C: AppInstallerClient + ?Sized,
{
    pub async fn execute(&self, job: InstallAppJob) -> anyhow::Result<InstallationOutcome> {
        let Some(installation) = self.installations.get(job.installation_id).await? else {
            tracing::warn!(
                installation_id = job.installation_id,
                "app_installation_vanished_before_job"
            );
            return Ok(InstallationOutcome::Skipped);
        };
        if installation.status != JobStatus::Pending {
            tracing::warn!(
                installation_id = installation.id,
                status = %installation.status,
                "app_installation_not_pending"
            );
            return Ok(InstallationOutcome::Skipped);
        }

        match self
            .install(&installation, job.activate_after_installation)
            .await
        {
            Ok(app) => {
                match self.installations.delete(installation.id).await {
                    Ok(true) => {}
                    Ok(false) => tracing::warn!(
                        installation_id = installation.id,
                        "app_installation_already_removed"
                    ),
                    Err(err) => {
                        // The app exists now; the row must never become retryable.
                        tracing::error!(
                            installation_id = installation.id,
                            app_id = app.id,
                            error = ?err,
                            "app_installation_cleanup_failed"
                        );
                        if let Err(err) = self
                            .installations
                            .transition_status(
                                installation.id,
                                JobStatus::Pending,
                                JobStatus::Success,
                                None,
                            )
                            .await
                        {
                            tracing::error!(
                                installation_id = installation.id,
                                error = ?err,
                                "app_installation_mark_success_failed"
                            );
                        }
                    }
                }
                tracing::info!(
                    installation_id = installation.id,
                    app_id = app.id,
                    is_active = app.is_active,
                    "app_installed"
                );
                Ok(InstallationOutcome::Installed { app_id: app.id })
            }
            Err(err) => {
                let reason = format!("{:#}", anyhow::Error::new(err));
                tracing::error!(
                    installation_id = installation.id,
                    error = %reason,
                    "app_installation_failed"
                );
                self.installations
                    .transition_status(
                        installation.id,
                        JobStatus::Pending,
                        JobStatus::Failed,
                        Some(&reason),
                    )
                    .await?;
                Ok(InstallationOutcome::Failed { reason })
            }
        }
    }

    async fn install(
        &self,
        installation: &AppInstallation,
        activate: bool,
    ) -> Result<App, RunInstallationError> {
        let manifest = self
            .client
            .fetch_manifest(&installation.manifest_url)
            .await
            .map_err(RunInstallationError::Manifest)?;
        manifest
            .validate(&installation.permissions)
            .map_err(RunInstallationError::InvalidManifest)?;

        let token = app_tokens::generate_token();
        if let Some(target) = manifest.token_target_url.as_deref() {
            self.client
                .send_token(target, &token)
                .await
                .map_err(RunInstallationError::TokenDelivery)?;
        }

        let new_app = NewApp {
            name: installation.app_name.clone(),
            identifier: Some(manifest.id.clone()),
            version: Some(manifest.version.clone()),
            is_active: activate,
            permissions: installation.permissions.clone(),
            manifest_url: Some(installation.manifest_url.clone()),
            about_app: manifest.about.clone(),
            data_privacy: manifest.data_privacy.clone(),
            data_privacy_url: manifest.data_privacy_url.clone(),
            homepage_url: manifest.homepage_url.clone(),
            support_url: manifest.support_url.clone(),
            configuration_url: manifest.configuration_url.clone(),
            app_url: manifest.app_url.clone(),
        };
        let new_token = NewAppToken {
            name: "Default token".to_string(),
            token_hash: app_tokens::hash_token(&token),
            token_last_4: app_tokens::last_4(&token),
        };
        self.apps
            .create_with_token(&new_app, &new_token)
            .await
            .map_err(RunInstallationError::Persist)
    }
}
