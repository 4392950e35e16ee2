use uuid::Uuid;

use crate::domain::apps::app_installation::AppInstallation;
use crate::domain::apps::permission::{Permission, PermissionSet};

/// Authenticated caller of the admin API.
#[derive(Debug, Clone)]
pub enum Requestor {
    Staff {
        user_id: Uuid,
        is_superuser: bool,
        permissions: PermissionSet,
    },
    App {
        app_id: i32,
        permissions: PermissionSet,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    InScope,
    OutOfScope { missing: Vec<Permission> },
}

// Presentation layer is responsible for building Requestor from HTTP inputs.

impl Requestor {
    pub fn effective_permissions(&self) -> PermissionSet {
        match self {
            Requestor::Staff {
                is_superuser: true, ..
            } => Permission::ALL.into_iter().collect(),
            Requestor::Staff { permissions, .. } | Requestor::App { permissions, .. } => {
                permissions.clone()
            }
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.effective_permissions().contains(&permission)
    }

    pub fn missing_permissions<'a, I>(&self, required: I) -> Vec<Permission>
    where
        I: IntoIterator<Item = &'a Permission>,
    {
        let granted = self.effective_permissions();
        let mut missing: Vec<Permission> = required
            .into_iter()
            .filter(|p| !granted.contains(p))
            .copied()
            .collect();
        missing.sort();
        missing.dedup();
        missing
    }

    pub fn label(&self) -> String {
        match self {
            Requestor::Staff { user_id, .. } => format!("staff:{user_id}"),
            Requestor::App { app_id, .. } => format!("app:{app_id}"),
        }
    }
}

/// Permissions a caller needs before an installation becomes visible to it.
pub fn installation_required_permissions(installation: &AppInstallation) -> PermissionSet {
    let mut required = installation.permissions.clone();
    required.insert(Permission::ManageApps);
    required
}

pub fn resolve_installation(requestor: &Requestor, installation: &AppInstallation) -> Scope {
    let required = installation_required_permissions(installation);
    let missing = requestor.missing_permissions(&required);
    if missing.is_empty() {
        Scope::InScope
    } else {
        Scope::OutOfScope { missing }
    }
}
