use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::apps::permission::PermissionSet;

#[derive(Debug, Clone)]
pub struct StaffUserRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: Option<String>,
    pub is_active: bool,
    pub is_superuser: bool,
    pub permissions: PermissionSet,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
        is_superuser: bool,
        permissions: &PermissionSet,
    ) -> anyhow::Result<StaffUserRow>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<StaffUserRow>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<StaffUserRow>>;
}
