use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::MatchedPath;
use dotenvy::dotenv;
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use api::application::ports::install_task_queue::InstallTaskQueue;
use api::application::use_cases::apps::recover_interrupted::RecoverInterruptedInstallations;
use api::application::use_cases::auth::bootstrap_admin::EnsureSuperuser;
use api::bootstrap::app_context::{AppContext, AppServices};
use api::bootstrap::config::Config;
use api::infrastructure::apps::installer_client_reqwest::ReqwestAppInstallerClient;
use api::infrastructure::db::repositories::app_installation_repository_sqlx::SqlxAppInstallationRepository;
use api::infrastructure::db::repositories::app_repository_sqlx::SqlxAppRepository;
use api::infrastructure::db::repositories::user_repository_sqlx::SqlxUserRepository;
use api::infrastructure::tasks::install_queue::{ChannelInstallTaskQueue, InstallWorker};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::presentation::http::auth::login,
        api::presentation::http::health::health,
    ),
    components(schemas(
        api::presentation::http::auth::LoginRequest,
        api::presentation::http::auth::LoginResponse,
        api::presentation::http::auth::StaffUserResponse,
        api::presentation::http::health::HealthResp,
    )),
    tags(
        (name = "Auth", description = "Staff authentication"),
        (name = "Health", description = "System health checks")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "api=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(?cfg, "Starting admin API");

    // Database
    let pool = api::infrastructure::db::connect_pool(&cfg.database_url).await?;
    api::infrastructure::db::migrate(&pool).await?;

    let installations = Arc::new(SqlxAppInstallationRepository::new(pool.clone()));
    let apps = Arc::new(SqlxAppRepository::new(pool.clone()));
    let user_repo = Arc::new(SqlxUserRepository::new(pool.clone()));

    if let Some(admin) = &cfg.bootstrap_admin {
        let uc = EnsureSuperuser {
            repo: user_repo.as_ref(),
        };
        if let Err(e) = uc.execute(&admin.email, &admin.password).await {
            tracing::warn!(error = ?e, email = %admin.email, "bootstrap_superuser_failed");
        }
    }

    // Background installation jobs
    let recover = RecoverInterruptedInstallations {
        installations: installations.as_ref(),
    };
    if let Err(e) = recover.execute().await {
        tracing::warn!(error = ?e, "recover_interrupted_installations_failed");
    }
    let (queue, receiver) = ChannelInstallTaskQueue::new();
    let installer_client = Arc::new(ReqwestAppInstallerClient::new(Duration::from_secs(
        cfg.manifest_fetch_timeout_secs,
    ))?);
    let worker_handle = InstallWorker {
        installations: installations.clone(),
        apps: apps.clone(),
        client: installer_client,
    }
    .spawn(receiver, cfg.install_worker_concurrency);
    let install_tasks: Arc<dyn InstallTaskQueue> = Arc::new(queue);

    let services = AppServices::new(installations, apps, user_repo, install_tasks);
    let ctx = AppContext::new(cfg.clone(), services);

    // Build CORS
    let cors = match cfg.frontend_url.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([http::Method::GET, http::Method::POST, http::Method::OPTIONS])
            .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
            .allow_credentials(true),
        _ if cfg.is_production => {
            // FRONTEND_URL is validated at startup in production; deny all otherwise
            CorsLayer::new().allow_origin(AllowOrigin::exact(HeaderValue::from_static(
                "http://invalid",
            )))
        }
        _ => CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods([http::Method::GET, http::Method::POST, http::Method::OPTIONS])
            .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
            .allow_credentials(true),
    };

    let app = Router::new()
        .nest(
            "/api",
            api::presentation::http::health::routes(pool.clone()),
        )
        .nest(
            "/api/auth",
            api::presentation::http::auth::routes(ctx.clone()),
        )
        .merge(api::presentation::http::graphql::routes(ctx.clone()))
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%api_addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(api_addr).await?;

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(?e, "Failed to listen for shutdown signal");
            }
            info!("Shutdown signal received");
        })
        .await;
    if let Err(e) = served {
        error!(?e, "API server task failed");
    }

    // Interrupted jobs are failed on the next startup.
    worker_handle.abort();
    Ok(())
}
