use crate::application::access::Requestor;
use crate::application::ports::app_installation_repository::AppInstallationRepository;
use crate::domain::apps::app_installation::AppInstallation;
use crate::domain::apps::permission::Permission;

#[derive(thiserror::Error, Debug)]
pub enum ListInstallationsError {
    #[error("requestor lacks the manage_apps permission")]
    PermissionDenied,
    #[error(transparent)]
    Persist(#[from] anyhow::Error),
}

pub struct ListAppInstallations<'a, R: AppInstallationRepository + ?Sized> {
    pub installations: &'a R,
}

impl<'a, R: AppInstallationRepository + ?Sized> ListAppInstallations<'a, R> {
    pub async fn execute(
        &self,
        requestor: &Requestor,
    ) -> Result<Vec<AppInstallation>, ListInstallationsError> {
        if !requestor.has_permission(Permission::ManageApps) {
            return Err(ListInstallationsError::PermissionDenied);
        }
        let mut rows = self.installations.list().await?;
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }
}
