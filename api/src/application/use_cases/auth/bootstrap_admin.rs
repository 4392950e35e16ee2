use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString},
};
use password_hash::rand_core::OsRng;

use crate::application::ports::user_repository::{StaffUserRow, UserRepository};
use crate::domain::apps::permission::PermissionSet;

/// Creates the first superuser when no staff account uses the email yet.
pub struct EnsureSuperuser<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> EnsureSuperuser<'a, R> {
    pub async fn execute(&self, email: &str, password: &str) -> anyhow::Result<Option<StaffUserRow>> {
        if self.repo.find_by_email(email).await?.is_some() {
            return Ok(None);
        }
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!(e.to_string()))?
            .to_string();
        let user = self
            .repo
            .create_user(email, "Administrator", &hash, true, &PermissionSet::new())
            .await?;
        tracing::info!(user_id = %user.id, "bootstrap_superuser_created");
        Ok(Some(user))
    }
}
