use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::application::ports::app_repository::AppRepository;
use crate::domain::apps::app::{App, NewApp, NewAppToken};
use crate::domain::apps::permission;
use crate::infrastructure::db::PgPool;

pub struct SqlxAppRepository {
    pub pool: PgPool,
}

impl SqlxAppRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_app(row: &PgRow) -> App {
    let permissions: Vec<String> = row.get("permissions");
    App {
        id: row.get("id"),
        name: row.get("name"),
        identifier: row.try_get("identifier").ok().flatten(),
        version: row.try_get("version").ok().flatten(),
        is_active: row.get("is_active"),
        permissions: permission::from_codenames(permissions),
        manifest_url: row.try_get("manifest_url").ok().flatten(),
        about_app: row.try_get("about_app").ok().flatten(),
        data_privacy: row.try_get("data_privacy").ok().flatten(),
        data_privacy_url: row.try_get("data_privacy_url").ok().flatten(),
        homepage_url: row.try_get("homepage_url").ok().flatten(),
        support_url: row.try_get("support_url").ok().flatten(),
        configuration_url: row.try_get("configuration_url").ok().flatten(),
        app_url: row.try_get("app_url").ok().flatten(),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl AppRepository for SqlxAppRepository {
    async fn create_with_token(&self, app: &NewApp, token: &NewAppToken) -> anyhow::Result<App> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query(
            r#"INSERT INTO apps
               (name, identifier, version, is_active, permissions, manifest_url, about_app,
                data_privacy, data_privacy_url, homepage_url, support_url, configuration_url, app_url)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
               RETURNING *"#,
        )
        .bind(&app.name)
        .bind(&app.identifier)
        .bind(&app.version)
        .bind(app.is_active)
        .bind(permission::codenames(&app.permissions))
        .bind(&app.manifest_url)
        .bind(&app.about_app)
        .bind(&app.data_privacy)
        .bind(&app.data_privacy_url)
        .bind(&app.homepage_url)
        .bind(&app.support_url)
        .bind(&app.configuration_url)
        .bind(&app.app_url)
        .fetch_one(&mut *tx)
        .await?;
        let created = map_app(&row);

        sqlx::query(
            r#"INSERT INTO app_tokens (app_id, name, token_hash, token_last_4)
               VALUES ($1, $2, $3, $4)"#,
        )
        .bind(created.id)
        .bind(&token.name)
        .bind(&token.token_hash)
        .bind(&token.token_last_4)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn find_active_by_token_hash(&self, token_hash: &str) -> anyhow::Result<Option<App>> {
        let row = sqlx::query(
            r#"SELECT a.* FROM app_tokens t
               JOIN apps a ON a.id = t.app_id
               WHERE t.token_hash = $1 AND a.is_active"#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_app))
    }
}
