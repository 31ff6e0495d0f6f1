use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use super::error::RepositoryError;
use super::traits::{PermissionRepository, Repository};
use crate::models::permission::{
    GroupSummary, PermissionInput, PermissionResponse, RoleSummary, UserSummary,
};
use crate::models::shared::Pagination;
use crate::utils::listing::{DEFAULT_PAGE_PARAM, ListParams, Paginated};

#[derive(Default)]
struct MemoryState {
    last_id: i32,
    permissions: BTreeMap<i32, PermissionResponse>,
    roles: BTreeMap<i32, RoleSummary>,
    groups: BTreeMap<i32, GroupSummary>,
    users: BTreeMap<i32, UserSummary>,
    /// (permission_id, role_id)
    permission_roles: BTreeSet<(i32, i32)>,
    /// (permission_id, group_id)
    permission_groups: BTreeSet<(i32, i32)>,
    /// (permission_id, user_id)
    permission_users: BTreeSet<(i32, i32)>,
}

impl MemoryState {
    fn next_id(&mut self) -> Result<i32, RepositoryError> {
        self.last_id = self
            .last_id
            .checked_add(1)
            .ok_or_else(|| RepositoryError::Internal("id sequence exhausted".into()))?;
        Ok(self.last_id)
    }

    fn ensure_exists(&self, id: i32) -> Result<(), RepositoryError> {
        if self.permissions.contains_key(&id) {
            Ok(())
        } else {
            Err(RepositoryError::permission_not_found())
        }
    }
}

/// Collect the related items linked to `permission_id`, in related-id order.
fn linked<T: Clone>(
    links: &BTreeSet<(i32, i32)>,
    items: &BTreeMap<i32, T>,
    permission_id: i32,
) -> Vec<T> {
    links
        .range((permission_id, i32::MIN)..=(permission_id, i32::MAX))
        .filter_map(|(_, related_id)| items.get(related_id).cloned())
        .collect()
}

fn matches_search(permission: &PermissionResponse, term: &str) -> bool {
    let term = term.to_lowercase();
    [
        Some(permission.name.as_str()),
        permission.slug.as_deref(),
        permission.description.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(&term))
}

/// In-process permission repository.
///
/// Selected with a `memory://` database URL. Ids are assigned from one
/// counter shared by all entity kinds, so they never repeat after a delete.
#[derive(Default)]
pub struct MemoryPermissionRepository {
    state: RwLock<MemoryState>,
}

impl MemoryPermissionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_role(&self, name: &str) -> Result<RoleSummary, RepositoryError> {
        let mut state = self.state.write().await;
        let role = RoleSummary {
            id: state.next_id()?,
            name: name.to_string(),
            slug: None,
            description: None,
        };
        state.roles.insert(role.id, role.clone());
        Ok(role)
    }

    pub async fn add_group(&self, name: &str) -> Result<GroupSummary, RepositoryError> {
        let mut state = self.state.write().await;
        let group = GroupSummary {
            id: state.next_id()?,
            name: name.to_string(),
            description: None,
        };
        state.groups.insert(group.id, group.clone());
        Ok(group)
    }

    pub async fn add_user(&self, username: &str) -> Result<UserSummary, RepositoryError> {
        let mut state = self.state.write().await;
        let user = UserSummary {
            id: state.next_id()?,
            username: username.to_string(),
            email: None,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    /// Grant a permission to a role. Both must exist.
    pub async fn attach_role(&self, permission_id: i32, role_id: i32) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        state.ensure_exists(permission_id)?;
        if !state.roles.contains_key(&role_id) {
            return Err(RepositoryError::NotFound("Role not found".into()));
        }
        state.permission_roles.insert((permission_id, role_id));
        Ok(())
    }

    /// Grant a permission to a group. Both must exist.
    pub async fn attach_group(
        &self,
        permission_id: i32,
        group_id: i32,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        state.ensure_exists(permission_id)?;
        if !state.groups.contains_key(&group_id) {
            return Err(RepositoryError::NotFound("Group not found".into()));
        }
        state.permission_groups.insert((permission_id, group_id));
        Ok(())
    }

    /// Grant a permission directly to a user. Both must exist.
    pub async fn attach_user(&self, permission_id: i32, user_id: i32) -> Result<(), RepositoryError> {
        let mut state = self.state.write().await;
        state.ensure_exists(permission_id)?;
        if !state.users.contains_key(&user_id) {
            return Err(RepositoryError::NotFound("User not found".into()));
        }
        state.permission_users.insert((permission_id, user_id));
        Ok(())
    }
}

#[async_trait]
impl Repository for MemoryPermissionRepository {
    type Entity = PermissionResponse;
    type Input = PermissionInput;

    async fn paginate(
        &self,
        params: &ListParams,
    ) -> Result<Paginated<PermissionResponse>, RepositoryError> {
        let state = self.state.read().await;

        let matching: Vec<&PermissionResponse> = state
            .permissions
            .values()
            .filter(|p| {
                params
                    .search
                    .as_deref()
                    .is_none_or(|term| matches_search(p, term))
            })
            .collect();

        let total = matching.len() as u64;
        let offset = usize::try_from(params.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(params.per_page).unwrap_or(usize::MAX);
        let data = matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        Ok(Paginated::new(
            data,
            Pagination::new(params.page, params.per_page, total),
            DEFAULT_PAGE_PARAM,
        ))
    }

    async fn create(&self, input: PermissionInput) -> Result<PermissionResponse, RepositoryError> {
        let mut state = self.state.write().await;
        let now = chrono::Utc::now();
        let permission = PermissionResponse {
            id: state.next_id()?,
            name: input.name,
            slug: input.slug.flatten(),
            description: input.description.flatten(),
            created_at: now,
            updated_at: now,
        };
        state.permissions.insert(permission.id, permission.clone());
        info!(id = permission.id, "Permission created");
        Ok(permission)
    }

    async fn find(&self, id: i32) -> Result<PermissionResponse, RepositoryError> {
        let state = self.state.read().await;
        state
            .permissions
            .get(&id)
            .cloned()
            .ok_or_else(RepositoryError::permission_not_found)
    }

    async fn update(&self, id: i32, input: PermissionInput) -> Result<bool, RepositoryError> {
        let mut state = self.state.write().await;
        let Some(permission) = state.permissions.get_mut(&id) else {
            return Ok(false);
        };

        permission.name = input.name;
        if let Some(slug) = input.slug {
            permission.slug = slug;
        }
        if let Some(description) = input.description {
            permission.description = description;
        }
        permission.updated_at = chrono::Utc::now();

        info!(id, "Permission updated");
        Ok(true)
    }

    async fn delete(&self, id: i32) -> Result<bool, RepositoryError> {
        let mut state = self.state.write().await;
        if state.permissions.remove(&id).is_none() {
            return Ok(false);
        }
        state.permission_roles.retain(|&(pid, _)| pid != id);
        state.permission_groups.retain(|&(pid, _)| pid != id);
        state.permission_users.retain(|&(pid, _)| pid != id);
        info!(id, "Permission deleted");
        Ok(true)
    }

    async fn next(&self, id: i32) -> Result<Option<i32>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state
            .permissions
            .range(id.saturating_add(1)..)
            .next()
            .map(|(&k, _)| k)
            .filter(|&k| k > id))
    }

    async fn prev(&self, id: i32) -> Result<Option<i32>, RepositoryError> {
        let state = self.state.read().await;
        Ok(state.permissions.range(..id).next_back().map(|(&k, _)| k))
    }
}

#[async_trait]
impl PermissionRepository for MemoryPermissionRepository {
    async fn roles(&self, id: i32) -> Result<Vec<RoleSummary>, RepositoryError> {
        let state = self.state.read().await;
        state.ensure_exists(id)?;
        Ok(linked(&state.permission_roles, &state.roles, id))
    }

    async fn groups(&self, id: i32) -> Result<Vec<GroupSummary>, RepositoryError> {
        let state = self.state.read().await;
        state.ensure_exists(id)?;
        Ok(linked(&state.permission_groups, &state.groups, id))
    }

    async fn users(&self, id: i32) -> Result<Vec<UserSummary>, RepositoryError> {
        let state = self.state.read().await;
        state.ensure_exists(id)?;
        Ok(linked(&state.permission_users, &state.users, id))
    }
}
