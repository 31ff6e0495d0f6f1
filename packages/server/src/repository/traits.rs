use async_trait::async_trait;

use super::error::RepositoryError;
use crate::models::permission::{
    GroupSummary, PermissionInput, PermissionResponse, RoleSummary, UserSummary,
};
use crate::utils::listing::{ListParams, Paginated};

/// CRUD access to one entity type, keyed by integer id.
///
/// Each backend fixes its own search fields; `paginate` matches
/// `ListParams::search` against all of them.
#[async_trait]
pub trait Repository: Send + Sync {
    type Entity: Send;
    type Input: Send;

    /// One page of entities ordered by id, optionally filtered by search term.
    async fn paginate(&self, params: &ListParams)
    -> Result<Paginated<Self::Entity>, RepositoryError>;

    /// Persist a new entity and return it.
    async fn create(&self, input: Self::Input) -> Result<Self::Entity, RepositoryError>;

    /// Fetch an entity, failing with `NotFound` when it does not exist.
    async fn find(&self, id: i32) -> Result<Self::Entity, RepositoryError>;

    /// Apply `input` to an existing entity.
    ///
    /// Returns `false` if no entity has the given id.
    async fn update(&self, id: i32, input: Self::Input) -> Result<bool, RepositoryError>;

    /// Delete an entity.
    ///
    /// Returns `true` if it was deleted, `false` if it did not exist.
    async fn delete(&self, id: i32) -> Result<bool, RepositoryError>;

    /// Smallest id greater than `id`.
    async fn next(&self, id: i32) -> Result<Option<i32>, RepositoryError>;

    /// Largest id smaller than `id`.
    async fn prev(&self, id: i32) -> Result<Option<i32>, RepositoryError>;
}

/// Permission storage, including its role, group and user assignments.
///
/// The relation lookups fail with `NotFound` when the permission does not
/// exist and return their items ordered by id.
#[async_trait]
pub trait PermissionRepository:
    Repository<Entity = PermissionResponse, Input = PermissionInput>
{
    async fn roles(&self, id: i32) -> Result<Vec<RoleSummary>, RepositoryError>;

    async fn groups(&self, id: i32) -> Result<Vec<GroupSummary>, RepositoryError>;

    async fn users(&self, id: i32) -> Result<Vec<UserSummary>, RepositoryError>;
}
