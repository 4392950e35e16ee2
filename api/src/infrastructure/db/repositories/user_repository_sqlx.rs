use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;
use uuid::Uuid;

use crate::application::ports::user_repository::{StaffUserRow, UserRepository};
use crate::domain::apps::permission::{self, PermissionSet};
use crate::infrastructure::db::PgPool;

pub struct SqlxUserRepository {
    pub pool: PgPool,
}

impl SqlxUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_user(r: &PgRow) -> StaffUserRow {
    let permissions: Vec<String> = r.get("permissions");
    StaffUserRow {
        id: r.get("id"),
        email: r.get("email"),
        name: r.get("name"),
        password_hash: r.try_get("password_hash").ok(),
        is_active: r.get("is_active"),
        is_superuser: r.get("is_superuser"),
        permissions: permission::from_codenames(permissions),
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
        is_superuser: bool,
        permissions: &PermissionSet,
    ) -> anyhow::Result<StaffUserRow> {
        let row = sqlx::query(
            r#"INSERT INTO staff_users (email, name, password_hash, is_superuser, permissions)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, email, name, password_hash, is_active, is_superuser, permissions"#,
        )
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .bind(is_superuser)
        .bind(permission::codenames(permissions))
        .fetch_one(&self.pool)
        .await?;
        Ok(map_user(&row))
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<StaffUserRow>> {
        let row = sqlx::query(
            r#"SELECT id, email, name, password_hash, is_active, is_superuser, permissions
               FROM staff_users WHERE email = $1"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_user))
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<StaffUserRow>> {
        let row = sqlx::query(
            r#"SELECT id, email, name, NULL::text AS password_hash, is_active, is_superuser, permissions
               FROM staff_users WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(map_user))
    }
}
