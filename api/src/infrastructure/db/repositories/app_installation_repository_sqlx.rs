use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::application::ports::app_installation_repository::AppInstallationRepository;
use crate::domain::apps::app_installation::{AppInstallation, NewAppInstallation};
use crate::domain::apps::job_status::JobStatus;
use crate::domain::apps::permission;
use crate::infrastructure::db::PgPool;

const COLUMNS: &str =
    "id, app_name, manifest_url, status, message, permissions, created_at, updated_at";

pub struct SqlxAppInstallationRepository {
    pub pool: PgPool,
}

impl SqlxAppInstallationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_row(row: &PgRow) -> anyhow::Result<AppInstallation> {
    let status: String = row.get("status");
    let permissions: Vec<String> = row.get("permissions");
    Ok(AppInstallation {
        id: row.get("id"),
        app_name: row.get("app_name"),
        manifest_url: row.get("manifest_url"),
        status: status.parse::<JobStatus>()?,
        message: row.try_get("message").ok().flatten(),
        permissions: permission::from_codenames(permissions),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[async_trait]
impl AppInstallationRepository for SqlxAppInstallationRepository {
    async fn create(&self, new: &NewAppInstallation) -> anyhow::Result<AppInstallation> {
        let row = sqlx::query(&format!(
            r#"INSERT INTO app_installations (app_name, manifest_url, status, permissions)
               VALUES ($1, $2, $3, $4)
               RETURNING {COLUMNS}"#
        ))
        .bind(&new.app_name)
        .bind(&new.manifest_url)
        .bind(JobStatus::Pending.as_str())
        .bind(permission::codenames(&new.permissions))
        .fetch_one(&self.pool)
        .await?;
        map_row(&row)
    }

    async fn get(&self, id: i32) -> anyhow::Result<Option<AppInstallation>> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM app_installations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_row).transpose()
    }

    async fn list(&self) -> anyhow::Result<Vec<AppInstallation>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM app_installations ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(map_row).collect()
    }

    async fn transition_status(
        &self,
        id: i32,
        from: JobStatus,
        to: JobStatus,
        message: Option<&str>,
    ) -> anyhow::Result<Option<AppInstallation>> {
        let row = sqlx::query(&format!(
            r#"UPDATE app_installations
               SET status = $3, message = $4, updated_at = now()
               WHERE id = $1 AND status = $2
               RETURNING {COLUMNS}"#
        ))
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .bind(message)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_row).transpose()
    }

    async fn delete(&self, id: i32) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM app_installations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    async fn delete_if_status(
        &self,
        id: i32,
        status: JobStatus,
    ) -> anyhow::Result<Option<AppInstallation>> {
        let row = sqlx::query(&format!(
            r#"DELETE FROM app_installations
               WHERE id = $1 AND status = $2
               RETURNING {COLUMNS}"#
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_row).transpose()
    }
}
