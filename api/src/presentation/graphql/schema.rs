use async_graphql::{EmptySubscription, Schema};

use crate::bootstrap::app_context::AppContext;

use super::mutations::MutationRoot;
use super::query::QueryRoot;

pub type AdminSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(ctx: AppContext) -> AdminSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(ctx)
        .limit_depth(16)
        .finish()
}
