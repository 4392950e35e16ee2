use crate::domain::apps::permission::Permission;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppErrorCode {
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

/// Business-level rejection attributed to one input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppError {
    pub field: Option<String>,
    pub message: String,
    pub code: AppErrorCode,
    pub permissions: Option<Vec<Permission>>,
}

impl AppError {
    pub fn new(field: &str, code: AppErrorCode, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.to_string()),
            message: message.into(),
            code,
            permissions: None,
        }
    }

    pub fn with_permissions(mut self, permissions: Vec<Permission>) -> Self {
        self.permissions = Some(permissions);
        self
    }
}
