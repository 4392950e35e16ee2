mod support;

use std::sync::Arc;

use api::application::ports::user_repository::UserRepository;
use api::domain::apps::job_status::JobStatus;
use api::domain::apps::permission::{Permission, PermissionSet};
use api::presentation::graphql::PERMISSION_DENIED_MESSAGE;
use api::presentation::http::auth::{Bearer, issue_token};
use api::presentation::http::graphql::{GraphqlState, graphql_handler};
use async_graphql::Request;
use axum::{Json, extract::State, http::StatusCode};
use uuid::Uuid;

use support::{InMemoryUsers, TestApi, UnreachableUsers};

const APPS_INSTALLATIONS_QUERY: &str = "{ appsInstallations { id status } }";

fn state(api: &TestApi) -> State<GraphqlState> {
    State(GraphqlState {
        ctx: api.ctx.clone(),
        schema: api.schema.clone(),
    })
}

#[tokio::test]
async fn staff_token_resolves_to_requestor() {
    let users = Arc::new(InMemoryUsers::default());
    let staff = users
        .create_user(
            "ops@example.com",
            "Ops",
            "unused",
            false,
            &PermissionSet::from([Permission::ManageApps]),
        )
        .await
        .unwrap();
    let api = TestApi::with_users(users);
    api.installations.seed(JobStatus::Failed, &[]);
    let jwt = issue_token(&api.ctx.cfg, staff.id).unwrap();

    let (status, Json(response)) = graphql_handler(
        state(&api),
        Some(Bearer(jwt)),
        Json(Request::new(APPS_INSTALLATIONS_QUERY)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    let body = serde_json::to_value(&response).unwrap();
    assert_eq!(body["data"]["appsInstallations"][0]["status"], "FAILED");
}

#[tokio::test]
async fn unknown_token_runs_as_anonymous() {
    let api = TestApi::new();

    let (status, Json(response)) = graphql_handler(
        state(&api),
        Some(Bearer("unknownapptoken".into())),
        Json(Request::new(APPS_INSTALLATIONS_QUERY)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response.errors[0].message, PERMISSION_DENIED_MESSAGE);
}

#[tokio::test]
async fn requestor_lookup_failure_is_a_server_error() {
    let api = TestApi::with_users(Arc::new(UnreachableUsers));
    api.installations.seed(JobStatus::Failed, &[]);
    let jwt = issue_token(&api.ctx.cfg, Uuid::new_v4()).unwrap();

    let (status, Json(response)) = graphql_handler(
        state(&api),
        Some(Bearer(jwt)),
        Json(Request::new(APPS_INSTALLATIONS_QUERY)),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].message, "Internal server error");
    assert!(
        response
            .errors
            .iter()
            .all(|e| e.message != PERMISSION_DENIED_MESSAGE)
    );
}
