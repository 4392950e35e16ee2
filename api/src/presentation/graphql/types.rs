use async_graphql::{Enum, ID, Object, SimpleObject};
use chrono::{DateTime, Utc};

use crate::application::dto::apps::AppError;
use crate::domain::apps::app_installation::AppInstallation;

use super::global_id;

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(
    name = "PermissionEnum",
    remote = "crate::domain::apps::permission::Permission"
)]
pub enum PermissionEnum {
    ManageUsers,
    ManageStaff,
    ManageApps,
    ManageChannels,
    ManageDiscounts,
    ManagePlugins,
    ManageGiftCard,
    ManageMenus,
    ManageOrders,
    ManagePages,
    ManageProducts,
    ManageShipping,
    ManageSettings,
    ManageTranslations,
    ManageCheckouts,
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(
    name = "JobStatusEnum",
    remote = "crate::domain::apps::job_status::JobStatus"
)]
pub enum JobStatusEnum {
    Pending,
    Success,
    Failed,
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
#[graphql(
    name = "AppErrorCode",
    remote = "crate::application::dto::apps::AppErrorCode"
)]
pub enum AppErrorCodeEnum {
    Forbidden,
    GraphqlError,
    Invalid,
    InvalidStatus,
    InvalidPermission,
    InvalidUrlFormat,
    InvalidManifestFormat,
    ManifestUrlCantConnect,
    NotFound,
    Required,
    Unique,
    OutOfScopeApp,
    OutOfScopePermission,
}

#[derive(SimpleObject, Clone, Debug)]
#[graphql(name = "AppError")]
pub struct AppErrorType {
    /// Name of a field that caused the error.
    pub field: Option<String>,
    pub message: Option<String>,
    pub code: AppErrorCodeEnum,
    /// Permissions the requestor is missing.
    pub permissions: Option<Vec<PermissionEnum>>,
}

impl From<AppError> for AppErrorType {
    fn from(err: AppError) -> Self {
        Self {
            field: err.field,
            message: Some(err.message),
            code: err.code.into(),
            permissions: err
                .permissions
                .map(|perms| perms.into_iter().map(PermissionEnum::from).collect()),
        }
    }
}

pub struct AppInstallationType(pub AppInstallation);

pub const APP_INSTALLATION_TYPE: &str = "AppInstallation";

#[Object(name = "AppInstallation")]
impl AppInstallationType {
    async fn id(&self) -> ID {
        ID(global_id::to_global_id(APP_INSTALLATION_TYPE, self.0.id))
    }

    async fn status(&self) -> JobStatusEnum {
        self.0.status.into()
    }

    async fn app_name(&self) -> &str {
        &self.0.app_name
    }

    async fn manifest_url(&self) -> &str {
        &self.0.manifest_url
    }

    /// Reason of the last failed installation attempt.
    async fn message(&self) -> Option<&str> {
        self.0.message.as_deref()
    }

    async fn permissions(&self) -> Vec<PermissionEnum> {
        self.0
            .permissions
            .iter()
            .copied()
            .map(PermissionEnum::from)
            .collect()
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }
}
