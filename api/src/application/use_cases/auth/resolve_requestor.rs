use uuid::Uuid;

use crate::application::access::Requestor;
use crate::application::ports::app_repository::AppRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::app_tokens;

/// Credential extracted from the request by the presentation layer.
#[derive(Debug, Clone)]
pub enum Credential {
    Staff(Uuid),
    AppToken(String),
}

pub struct ResolveRequestor<'a, U, A>
where
    U: UserRepository + ?Sized,
    A: AppRepository + ?Sized,
{
    pub users: &'a U,
    pub apps: &'a A,
}

impl<'a, U, A> ResolveRequestor<'a, U, A>
where
    U: UserRepository + ?Sized,
    A: AppRepository + ?Sized,
{
    pub async fn execute(&self, credential: &Credential) -> anyhow::Result<Option<Requestor>> {
        match credential {
            Credential::Staff(user_id) => {
                let user = self.users.find_by_id(*user_id).await?;
                Ok(user.filter(|u| u.is_active).map(|u| Requestor::Staff {
                    user_id: u.id,
                    is_superuser: u.is_superuser,
                    permissions: u.permissions,
                }))
            }
            Credential::AppToken(token) => {
                let hash = app_tokens::hash_token(token);
                let app = self.apps.find_active_by_token_hash(&hash).await?;
                Ok(app.map(|a| Requestor::App {
                    app_id: a.id,
                    permissions: a.permissions,
                }))
            }
        }
    }
}
