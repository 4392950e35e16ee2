pub mod delete_failed_installation;
pub mod install_app;
pub mod list_installations;
pub mod recover_interrupted;
pub mod retry_install;
pub mod run_installation;

use crate::application::access::{self, Requestor, Scope};
use crate::application::dto::apps::{AppError, AppErrorCode};
use crate::application::ports::app_installation_repository::AppInstallationRepository;
use crate::domain::apps::app_installation::AppInstallation;
use crate::domain::apps::permission::Permission;

/// Outcome of looking up an installation on behalf of a caller.
pub(crate) enum ScopedLookup {
    Found(AppInstallation),
    NotFound,
    OutOfScope(Vec<Permission>),
}

pub(crate) async fn load_scoped_installation<R>(
    repo: &R,
    requestor: &Requestor,
    id: i32,
) -> anyhow::Result<ScopedLookup>
where
    R: AppInstallationRepository + ?Sized,
{
    let Some(installation) = repo.get(id).await? else {
        return Ok(ScopedLookup::NotFound);
    };
    match access::resolve_installation(requestor, &installation) {
        Scope::InScope => Ok(ScopedLookup::Found(installation)),
        Scope::OutOfScope { missing } => Ok(ScopedLookup::OutOfScope(missing)),
    }
}

pub(crate) fn not_found_error(field: &str, id: i32) -> AppError {
    AppError::new(
        field,
        AppErrorCode::NotFound,
        format!("Couldn't resolve app installation: {id}"),
    )
}

pub(crate) fn out_of_scope_error(field: &str, missing: Vec<Permission>) -> AppError {
    AppError::new(
        field,
        AppErrorCode::OutOfScopeApp,
        "You can't manage this app installation.",
    )
    .with_permissions(missing)
}
