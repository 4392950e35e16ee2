pub mod global_id;
pub mod mutations;
pub mod query;
pub mod schema;
pub mod types;

use async_graphql::{Context, ErrorExtensions};

use crate::application::access::Requestor;

pub const PERMISSION_DENIED_MESSAGE: &str = "You do not have permission to perform this action";

pub(crate) fn permission_denied() -> async_graphql::Error {
    async_graphql::Error::new(PERMISSION_DENIED_MESSAGE)
        .extend_with(|_, e| e.set("code", "PERMISSION_DENIED"))
}

pub(crate) fn internal_error() -> async_graphql::Error {
    async_graphql::Error::new("Internal server error")
        .extend_with(|_, e| e.set("code", "INTERNAL_SERVER_ERROR"))
}

/// Anonymous requests never reach the app-management use cases.
pub(crate) fn require_requestor<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a Requestor> {
    ctx.data_opt::<Requestor>().ok_or_else(permission_denied)
}
