/// Route and menu entry of one entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityRoute {
    /// Slice name, as in [`crate::Entity::SLICE_NAME`].
    pub slice: &'static str,
    /// Client route path segment.
    pub path: &'static str,
    /// REST resource segment, as in [`crate::Entity::RESOURCE`].
    pub resource: &'static str,
    /// Menu label.
    pub label: &'static str,
}

/// Entity routes in menu order.
pub const ENTITY_ROUTES: [EntityRoute; 5] = [
    EntityRoute {
        slice: "notification",
        path: "notification",
        resource: "notifications",
        label: "Notification",
    },
    EntityRoute {
        slice: "task",
        path: "task",
        resource: "tasks",
        label: "Task",
    },
    EntityRoute {
        slice: "userTasks",
        path: "user-tasks",
        resource: "user-tasks",
        label: "User Tasks",
    },
    EntityRoute {
        slice: "userWorkspaces",
        path: "user-workspaces",
        resource: "user-workspaces",
        label: "User Workspaces",
    },
    EntityRoute {
        slice: "workspace",
        path: "workspace",
        resource: "workspaces",
        label: "Workspace",
    },
];

/// Finds a route by path segment or slice name.
#[must_use]
pub fn find_route(key: &str) -> Option<&'static EntityRoute> {
    let key = key.trim().trim_start_matches('/');
    ENTITY_ROUTES
        .iter()
        .find(|route| route.path == key || route.slice == key)
}

#[cfg(test)]
mod tests {
    use super::{ENTITY_ROUTES, find_route};
    use crate::{Entity, Notification, Task, UserTasks, UserWorkspaces, Workspace};

    fn assert_route_matches<E: Entity>() {
        let route = find_route(E::SLICE_NAME);
        assert_eq!(route.map(|route| route.resource), Some(E::RESOURCE));
    }

    #[test]
    fn every_entity_type_has_a_route() {
        assert_route_matches::<Notification>();
        assert_route_matches::<Task>();
        assert_route_matches::<UserTasks>();
        assert_route_matches::<UserWorkspaces>();
        assert_route_matches::<Workspace>();
    }

    #[test]
    fn lookup_accepts_paths_with_leading_slash() {
        assert_eq!(
            find_route("/user-workspaces").map(|route| route.slice),
            Some("userWorkspaces")
        );
        assert!(find_route("account").is_none());
    }

    #[test]
    fn menu_order_is_alphabetical_by_path() {
        let paths: Vec<&str> = ENTITY_ROUTES.iter().map(|route| route.path).collect();
        let mut sorted = paths.clone();
        sorted.sort_unstable();
        assert_eq!(paths, sorted);
    }
}
