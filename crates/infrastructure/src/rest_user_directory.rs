use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;
use tudu_application::UserDirectory;
use tudu_core::AppResult;
use tudu_domain::User;

use crate::rest_client::RestClient;

/// Reads relation-picker candidates from `GET /api/users`.
#[derive(Debug, Clone)]
pub struct RestUserDirectory {
    client: RestClient,
}

impl RestUserDirectory {
    /// Creates a user directory sharing the given client.
    #[must_use]
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserDirectory for RestUserDirectory {
    async fn list_users(&self) -> AppResult<Vec<User>> {
        let url = self.client.api_url(&["users"], &[])?;
        let (_, users) = self
            .client
            .send_json::<Vec<User>>(self.client.request(Method::GET, url), "list users")
            .await?;
        debug!(users = users.len(), "user candidates received");
        Ok(users)
    }
}
