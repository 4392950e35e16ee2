use chrono::{DateTime, Utc};

use super::permission::PermissionSet;

#[derive(Debug, Clone)]
pub struct App {
    pub id: i32,
    pub name: String,
    pub identifier: Option<String>,
    pub version: Option<String>,
    pub is_active: bool,
    pub permissions: PermissionSet,
    pub manifest_url: Option<String>,
    pub about_app: Option<String>,
    pub data_privacy: Option<String>,
    pub data_privacy_url: Option<String>,
    pub homepage_url: Option<String>,
    pub support_url: Option<String>,
    pub configuration_url: Option<String>,
    pub app_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewApp {
    pub name: String,
    pub identifier: Option<String>,
    pub version: Option<String>,
    pub is_active: bool,
    pub permissions: PermissionSet,
    pub manifest_url: Option<String>,
    pub about_app: Option<String>,
    pub data_privacy: Option<String>,
    pub data_privacy_url: Option<String>,
    pub homepage_url: Option<String>,
    pub support_url: Option<String>,
    pub configuration_url: Option<String>,
    pub app_url: Option<String>,
}

/// Hashed credential handed to an app once, at installation time.
#[derive(Debug, Clone)]
pub struct NewAppToken {
    pub name: String,
    pub token_hash: String,
    pub token_last_4: String,
}
