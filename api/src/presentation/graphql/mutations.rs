use async_graphql::{Context, ID, InputObject, Object, SimpleObject};

use crate::application::dto::apps::AppError;
use crate::application::use_cases::apps::delete_failed_installation::DeleteFailedInstallation;
use crate::application::use_cases::apps::install_app::{
    InstallApp, InstallAppError, InstallAppRequest,
};
use crate::application::use_cases::apps::retry_install::RetryAppInstallation;
use crate::bootstrap::app_context::AppContext;
use crate::domain::apps::app_installation::AppInstallation;
use crate::domain::apps::permission::Permission;

use super::global_id;
use super::types::{APP_INSTALLATION_TYPE, AppErrorType, AppInstallationType, PermissionEnum};
use super::{internal_error, permission_denied, require_requestor};

// Every app mutation answers with the same shape: the installation, or the
// reasons it was rejected (mirrored on `errors` for newer clients).
macro_rules! installation_payload {
    ($name:ident, $graphql_name:literal) => {
        #[derive(SimpleObject)]
        #[graphql(name = $graphql_name)]
        pub struct $name {
            pub app_installation: Option<AppInstallationType>,
            pub app_errors: Vec<AppErrorType>,
            pub errors: Vec<AppErrorType>,
        }

        impl $name {
            fn installed(installation: AppInstallation) -> Self {
                Self {
                    app_installation: Some(AppInstallationType(installation)),
                    app_errors: Vec::new(),
                    errors: Vec::new(),
                }
            }

            fn rejected(errors: Vec<AppError>) -> Self {
                let errors: Vec<AppErrorType> =
                    errors.into_iter().map(AppErrorType::from).collect();
                Self {
                    app_installation: None,
                    app_errors: errors.clone(),
                    errors,
                }
            }
        }
    };
}

installation_payload!(AppRetryInstallPayload, "AppRetryInstall");
installation_payload!(AppInstallPayload, "AppInstall");
installation_payload!(AppDeleteFailedInstallationPayload, "AppDeleteFailedInstallation");

#[derive(InputObject)]
pub struct AppInstallInput {
    /// Name of the app to install.
    pub app_name: Option<String>,
    /// Url to app's manifest in JSON format.
    pub manifest_url: Option<String>,
    /// Determine if app will be set active or not.
    pub activate_after_installation: Option<bool>,
    /// List of permission codes to assign to this app.
    pub permissions: Option<Vec<PermissionEnum>>,
}

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Retry failed installation of new app.
    async fn app_retry_install(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "ID of failed installation.")] id: ID,
        #[graphql(desc = "Determine if app will be set active or not.")]
        activate_after_installation: Option<bool>,
    ) -> async_graphql::Result<AppRetryInstallPayload> {
        let requestor = require_requestor(ctx)?;
        let app_ctx = ctx.data::<AppContext>()?;
        let pk = match global_id::decode_pk(&id, APP_INSTALLATION_TYPE) {
            Ok(pk) => pk,
            Err(err) => return Ok(AppRetryInstallPayload::rejected(vec![err.app_error("id")])),
        };

        let installations = app_ctx.app_installations();
        let tasks = app_ctx.install_tasks();
        let uc = RetryAppInstallation {
            installations: installations.as_ref(),
            tasks: tasks.as_ref(),
        };
        match uc
            .execute(requestor, pk, activate_after_installation.unwrap_or(true))
            .await
        {
            Ok(installation) => Ok(AppRetryInstallPayload::installed(installation)),
            Err(err) => match err.app_error() {
                Some(app_error) => Ok(AppRetryInstallPayload::rejected(vec![app_error])),
                None => {
                    tracing::error!(error = ?err, installation_id = pk, "app_retry_install_failed");
                    Err(internal_error())
                }
            },
        }
    }

    /// Install new app by using app manifest.
    async fn app_install(
        &self,
        ctx: &Context<'_>,
        input: AppInstallInput,
    ) -> async_graphql::Result<AppInstallPayload> {
        let requestor = require_requestor(ctx)?;
        let app_ctx = ctx.data::<AppContext>()?;
        let req = InstallAppRequest {
            app_name: input.app_name.unwrap_or_default(),
            manifest_url: input.manifest_url.unwrap_or_default(),
            activate_after_installation: input.activate_after_installation.unwrap_or(true),
            permissions: input
                .permissions
                .unwrap_or_default()
                .into_iter()
                .map(Permission::from)
                .collect(),
        };

        let installations = app_ctx.app_installations();
        let tasks = app_ctx.install_tasks();
        let uc = InstallApp {
            installations: installations.as_ref(),
            tasks: tasks.as_ref(),
        };
        match uc.execute(requestor, &req).await {
            Ok(installation) => Ok(AppInstallPayload::installed(installation)),
            Err(InstallAppError::PermissionDenied) => Err(permission_denied()),
            Err(InstallAppError::Rejected(errors)) => Ok(AppInstallPayload::rejected(errors)),
            Err(err) => {
                tracing::error!(error = ?err, "app_install_failed");
                Err(internal_error())
            }
        }
    }

    /// Delete failed installation.
    async fn app_delete_failed_installation(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "ID of failed installation.")] id: ID,
    ) -> async_graphql::Result<AppDeleteFailedInstallationPayload> {
        let requestor = require_requestor(ctx)?;
        let app_ctx = ctx.data::<AppContext>()?;
        let pk = match global_id::decode_pk(&id, APP_INSTALLATION_TYPE) {
            Ok(pk) => pk,
            Err(err) => {
                return Ok(AppDeleteFailedInstallationPayload::rejected(vec![
                    err.app_error("id"),
                ]));
            }
        };

        let installations = app_ctx.app_installations();
        let uc = DeleteFailedInstallation {
            installations: installations.as_ref(),
        };
        match uc.execute(requestor, pk).await {
            Ok(installation) => Ok(AppDeleteFailedInstallationPayload::installed(installation)),
            Err(err) => match err.app_error() {
                Some(app_error) => Ok(AppDeleteFailedInstallationPayload::rejected(vec![
                    app_error,
                ])),
                None => {
                    tracing::error!(
                        error = ?err,
                        installation_id = pk,
                        "app_delete_failed_installation_failed"
                    );
                    Err(internal_error())
                }
            },
        }
    }
}
