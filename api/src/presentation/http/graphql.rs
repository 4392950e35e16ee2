use async_graphql::Pos;
use async_graphql::http::GraphiQLSource;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::Html,
    routing::get,
};

use crate::bootstrap::app_context::AppContext;
use crate::presentation::graphql::internal_error;
use crate::presentation::graphql::schema::{AdminSchema, build_schema};
use crate::presentation::http::auth::{self, Bearer};

#[derive(Clone)]
pub struct GraphqlState {
    pub ctx: AppContext,
    pub schema: AdminSchema,
}

pub fn routes(ctx: AppContext) -> Router {
    let schema = build_schema(ctx.clone());
    Router::new()
        .route("/graphql", get(playground).post(graphql_handler))
        .with_state(GraphqlState { ctx, schema })
}

pub async fn graphql_handler(
    State(state): State<GraphqlState>,
    bearer: Option<Bearer>,
    Json(request): Json<async_graphql::Request>,
) -> (StatusCode, Json<async_graphql::Response>) {
    let mut request = request;
    match auth::resolve_requestor(&state.ctx, bearer).await {
        Ok(Some(requestor)) => request = request.data(requestor),
        Ok(None) => {}
        Err(err) => {
            tracing::error!(error = ?err, "resolve_requestor_failed");
            let error = internal_error().into_server_error(Pos::default());
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(async_graphql::Response::from_errors(vec![error])),
            );
        }
    }
    (StatusCode::OK, Json(state.schema.execute(request).await))
}

pub async fn playground(State(state): State<GraphqlState>) -> Result<Html<String>, StatusCode> {
    if !state.ctx.cfg.graphql_playground {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Html(GraphiQLSource::build().endpoint("/graphql").finish()))
}
