use serde::Deserialize;

use super::permission::{Permission, PermissionSet};

/// Manifest document served by the app at its manifest URL.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppManifest {
    pub id: String,
    pub version: String,
    pub name: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub token_target_url: Option<String>,
    pub app_url: Option<String>,
    pub configuration_url: Option<String>,
    pub about: Option<String>,
    pub data_privacy: Option<String>,
    pub data_privacy_url: Option<String>,
    pub homepage_url: Option<String>,
    pub support_url: Option<String>,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ManifestError {
    #[error("manifest declares unknown permissions: {}", .0.join(", "))]
    UnknownPermissions(Vec<String>),
    #[error("manifest does not declare permissions: {}", .0.join(", "))]
    MissingPermissions(Vec<String>),
    #[error("manifest is missing `{0}`")]
    MissingField(&'static str),
}

impl AppManifest {
    /// Checks the manifest against the permissions granted to the installation.
    pub fn validate(&self, assigned: &PermissionSet) -> Result<PermissionSet, ManifestError> {
        if self.id.trim().is_empty() {
            return Err(ManifestError::MissingField("id"));
        }
        if self.version.trim().is_empty() {
            return Err(ManifestError::MissingField("version"));
        }

        let mut declared = PermissionSet::new();
        let mut unknown = Vec::new();
        for code in &self.permissions {
            match Permission::parse_code(code) {
                Some(p) => {
                    declared.insert(p);
                }
                None => unknown.push(code.clone()),
            }
        }
        if !unknown.is_empty() {
            return Err(ManifestError::UnknownPermissions(unknown));
        }

        let missing: Vec<String> = assigned
            .difference(&declared)
            .map(|p| p.codename().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(ManifestError::MissingPermissions(missing));
        }
        Ok(declared)
    }
}
