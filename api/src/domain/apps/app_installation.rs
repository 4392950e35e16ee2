use chrono::{DateTime, Utc};

use super::job_status::JobStatus;
use super::permission::PermissionSet;

/// One attempt at installing an app from its manifest.
#[derive(Debug, Clone)]
pub struct AppInstallation {
    pub id: i32,
    pub app_name: String,
    pub manifest_url: String,
    pub status: JobStatus,
    pub message: Option<String>,
    pub permissions: PermissionSet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AppInstallation {
    pub fn can_retry(&self) -> bool {
        self.status == JobStatus::Failed
    }
}

#[derive(Debug, Clone)]
pub struct NewAppInstallation {
    pub app_name: String,
    pub manifest_url: String,
    pub permissions: PermissionSet,
}
