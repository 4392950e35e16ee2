pub mod app_installation_repository_sqlx;
pub mod app_repository_sqlx;
pub mod user_repository_sqlx;
