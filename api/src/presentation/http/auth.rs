use crate::application::access::Requestor;
use crate::application::use_cases::auth::login::{Login as LoginUc, LoginRequest as LoginDto};
use crate::application::use_cases::auth::resolve_requestor::{Credential, ResolveRequestor};
use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::Config;
use crate::domain::apps::permission;
use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct StaffUserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub is_superuser: bool,
    pub permissions: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: StaffUserResponse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new().route("/login", post(login)).with_state(ctx)
}

#[utoipa::path(post, path = "/api/auth/login", tag = "Auth", request_body = LoginRequest, security(()), responses(
    (status = 200, body = LoginResponse)
))]
pub async fn login(
    State(ctx): State<AppContext>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, StatusCode> {
    let repo = ctx.user_repo();
    let uc = LoginUc {
        repo: repo.as_ref(),
    };
    let dto = LoginDto {
        email: req.email.clone(),
        password: req.password.clone(),
    };
    let user = uc
        .execute(&dto)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::UNAUTHORIZED)?;
    let token = issue_token(&ctx.cfg, user.id)?;
    tracing::info!(user_id = %user.id, "staff_login");
    Ok(Json(LoginResponse {
        access_token: token,
        user: StaffUserResponse {
            id: user.id,
            email: user.email,
            name: user.name,
            is_superuser: user.is_superuser,
            permissions: permission::codenames(&user.permissions),
        },
    }))
}

pub fn issue_token(cfg: &Config, user_id: Uuid) -> Result<String, StatusCode> {
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: user_id.to_string(),
        exp: now + (cfg.jwt_expires_secs.max(0) as usize),
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(cfg.jwt_secret_pem.as_bytes()),
    )
    .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

// --- Bearer extractor & requestor resolution ---
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

pub struct Bearer(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|auth| auth.strip_prefix("Bearer "))
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(|t| Bearer(t.to_string()))
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}

pub fn validate_bearer_str(cfg: &Config, token: &str) -> Result<String, StatusCode> {
    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(cfg.jwt_secret_pem.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| StatusCode::UNAUTHORIZED)?;
    Ok(data.claims.sub)
}

/// Staff users authenticate with JWTs; apps with their opaque tokens.
pub fn credential_from_bearer(cfg: &Config, bearer: &Bearer) -> Option<Credential> {
    let token = bearer.0.as_str();
    if let Ok(sub) = validate_bearer_str(cfg, token) {
        return Uuid::parse_str(&sub).ok().map(Credential::Staff);
    }
    if token.contains('.') {
        // Expired or forged JWT.
        return None;
    }
    Some(Credential::AppToken(token.to_string()))
}

pub async fn resolve_requestor(
    ctx: &AppContext,
    bearer: Option<Bearer>,
) -> anyhow::Result<Option<Requestor>> {
    let Some(credential) = bearer.and_then(|b| credential_from_bearer(&ctx.cfg, &b)) else {
        return Ok(None);
    };
    let users = ctx.user_repo();
    let apps = ctx.apps();
    let uc = ResolveRequestor {
        users: users.as_ref(),
        apps: apps.as_ref(),
    };
    uc.execute(&credential).await
}
