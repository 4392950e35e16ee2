use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};

use crate::application::ports::user_repository::{StaffUserRow, UserRepository};

pub struct Login<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl<'a, R: UserRepository + ?Sized> Login<'a, R> {
    pub async fn execute(&self, req: &LoginRequest) -> anyhow::Result<Option<StaffUserRow>> {
        let row = match self.repo.find_by_email(&req.email).await? {
            Some(r) if r.is_active => r,
            _ => return Ok(None),
        };
        let hash = row.password_hash.clone().unwrap_or_default();
        let parsed = PasswordHash::new(&hash).map_err(|e| anyhow::anyhow!(e.to_string()))?;
        if Argon2::default()
            .verify_password(req.password.as_bytes(), &parsed)
            .is_ok()
        {
            Ok(Some(StaffUserRow {
                password_hash: None,
                ..row
            }))
        } else {
            Ok(None)
        }
    }
}
