use async_trait::async_trait;
use tudu_application::UserDirectory;
use tudu_core::AppResult;
use tudu_domain::User;

/// Fixed user list for offline use.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    users: Vec<User>,
}

impl InMemoryUserDirectory {
    /// Creates a directory serving the given users.
    #[must_use]
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn list_users(&self) -> AppResult<Vec<User>> {
        Ok(self.users.clone())
    }
}
