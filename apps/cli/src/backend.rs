use std::sync::Arc;

use tudu_application::form_builder::{FormValues, RelationCandidates};
use tudu_application::{EntityGateway, UserDirectory};
use tudu_core::{AppError, AppResult};
use tudu_domain::{Entity, FieldKind, Notification, Task, UserTasks, UserWorkspaces, Workspace};
use tudu_infrastructure::{
    InMemoryEntityGateway, InMemoryUserDirectory, RestClient, RestEntityGateway,
    RestUserDirectory,
};

use crate::client_config::ClientConfig;

/// Gateways for every entity collection plus the user directory.
pub struct Backend {
    notifications: Arc<dyn EntityGateway<Notification>>,
    tasks: Arc<dyn EntityGateway<Task>>,
    user_tasks: Arc<dyn EntityGateway<UserTasks>>,
    user_workspaces: Arc<dyn EntityGateway<UserWorkspaces>>,
    workspaces: Arc<dyn EntityGateway<Workspace>>,
    users: Arc<dyn UserDirectory>,
}

/// Selects the gateway serving one entity type.
pub trait GatewayOf<E: Entity> {
    fn gateway(&self) -> Arc<dyn EntityGateway<E>>;
}

macro_rules! gateway_of {
    ($entity:ty, $field:ident) => {
        impl GatewayOf<$entity> for Backend {
            fn gateway(&self) -> Arc<dyn EntityGateway<$entity>> {
                Arc::clone(&self.$field)
            }
        }
    };
}

gateway_of!(Notification, notifications);
gateway_of!(Task, tasks);
gateway_of!(UserTasks, user_tasks);
gateway_of!(UserWorkspaces, user_workspaces);
gateway_of!(Workspace, workspaces);

impl Backend {
    pub fn rest(config: &ClientConfig) -> AppResult<Self> {
        let client = RestClient::new(
            config.api_base_url.as_str(),
            config.api_token.clone(),
            config.http_timeout,
        )?;

        Ok(Self {
            notifications: Arc::new(RestEntityGateway::<Notification>::new(client.clone())),
            tasks: Arc::new(RestEntityGateway::<Task>::new(client.clone())),
            user_tasks: Arc::new(RestEntityGateway::<UserTasks>::new(client.clone())),
            user_workspaces: Arc::new(RestEntityGateway::<UserWorkspaces>::new(client.clone())),
            workspaces: Arc::new(RestEntityGateway::<Workspace>::new(client.clone())),
            users: Arc::new(RestUserDirectory::new(client)),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            notifications: Arc::new(InMemoryEntityGateway::<Notification>::new()),
            tasks: Arc::new(InMemoryEntityGateway::<Task>::new()),
            user_tasks: Arc::new(InMemoryEntityGateway::<UserTasks>::new()),
            user_workspaces: Arc::new(InMemoryEntityGateway::<UserWorkspaces>::new()),
            workspaces: Arc::new(InMemoryEntityGateway::<Workspace>::new()),
            users: Arc::new(InMemoryUserDirectory::default()),
        }
    }

    #[cfg(test)]
    pub fn with_users(mut self, users: Vec<tudu_domain::User>) -> Self {
        self.users = Arc::new(InMemoryUserDirectory::new(users));
        self
    }

    /// Loads candidates for every single-valued relation the draft selects.
    pub async fn relation_candidates<E: Entity>(
        &self,
        draft: &FormValues,
    ) -> AppResult<RelationCandidates> {
        let mut candidates = RelationCandidates::new();

        for field in E::form_schema().fields() {
            let FieldKind::OneRelation { target } = field.kind() else {
                continue;
            };
            let selected = draft
                .get(field.name())
                .and_then(|value| value.as_str())
                .is_some_and(|value| !value.trim().is_empty());
            if !selected || candidates.get(target).is_some() {
                continue;
            }

            match target {
                "user" => candidates.insert(target, &self.users.list_users().await?)?,
                "notification" => {
                    candidates.insert(target, &self.notifications.list(None).await?.items)?;
                }
                "task" => candidates.insert(target, &self.tasks.list(None).await?.items)?,
                "userTasks" => {
                    candidates.insert(target, &self.user_tasks.list(None).await?.items)?;
                }
                "userWorkspaces" => {
                    candidates.insert(target, &self.user_workspaces.list(None).await?.items)?;
                }
                "workspace" => {
                    candidates.insert(target, &self.workspaces.list(None).await?.items)?;
                }
                other => {
                    return Err(AppError::Internal(format!(
                        "no candidate source for relation target '{other}'"
                    )));
                }
            }
        }

        Ok(candidates)
    }
}
