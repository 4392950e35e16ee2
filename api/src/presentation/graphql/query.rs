use async_graphql::{Context, Object};

use crate::application::use_cases::apps::list_installations::{
    ListAppInstallations, ListInstallationsError,
};
use crate::bootstrap::app_context::AppContext;

use super::types::AppInstallationType;
use super::{internal_error, permission_denied, require_requestor};

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// List of all app installations.
    async fn apps_installations(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Vec<AppInstallationType>> {
        let requestor = require_requestor(ctx)?;
        let app_ctx = ctx.data::<AppContext>()?;
        let installations = app_ctx.app_installations();
        let uc = ListAppInstallations {
            installations: installations.as_ref(),
        };
        match uc.execute(requestor).await {
            Ok(rows) => Ok(rows.into_iter().map(AppInstallationType).collect()),
            Err(ListInstallationsError::PermissionDenied) => Err(permission_denied()),
            Err(ListInstallationsError::Persist(err)) => {
                tracing::error!(error = ?err, "list_app_installations_failed");
                Err(internal_error())
            }
        }
    }
}
