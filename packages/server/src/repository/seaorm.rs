use async_trait::async_trait;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr};
use sea_orm::*;
use tracing::info;

use super::error::RepositoryError;
use super::traits::{PermissionRepository, Repository};
use crate::entity::{
    group, permission, permission_group, permission_role, permission_user, role, user,
};
use crate::models::permission::{
    GroupSummary, PermissionInput, PermissionResponse, RoleSummary, UserSummary,
};
use crate::models::shared::{Pagination, escape_like};
use crate::utils::listing::{DEFAULT_PAGE_PARAM, ListParams, Paginated};

/// Columns matched by the list search box.
const SEARCH_COLUMNS: [permission::Column; 3] = [
    permission::Column::Name,
    permission::Column::Slug,
    permission::Column::Description,
];

/// SeaORM-backed permission repository.
#[derive(Clone)]
pub struct SeaOrmPermissionRepository {
    db: DatabaseConnection,
}

impl SeaOrmPermissionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn ensure_exists(&self, id: i32) -> Result<(), RepositoryError> {
        find_permission(&self.db, id).await.map(|_| ())
    }
}

async fn find_permission<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<permission::Model, RepositoryError> {
    permission::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(RepositoryError::permission_not_found)
}

/// Case-insensitive substring match against any search column.
fn search_condition(term: &str) -> Condition {
    let pattern = format!("%{}%", escape_like(term).to_lowercase());
    SEARCH_COLUMNS
        .into_iter()
        .fold(Condition::any(), |cond, column| {
            cond.add(
                Expr::expr(Func::lower(Expr::col(column)))
                    .like(LikeExpr::new(pattern.clone()).escape('\\')),
            )
        })
}

#[async_trait]
impl Repository for SeaOrmPermissionRepository {
    type Entity = PermissionResponse;
    type Input = PermissionInput;

    async fn paginate(
        &self,
        params: &ListParams,
    ) -> Result<Paginated<PermissionResponse>, RepositoryError> {
        let mut select = permission::Entity::find();

        if let Some(ref search) = params.search {
            select = select.filter(search_condition(search));
        }

        let paginator = select
            .order_by_asc(permission::Column::Id)
            .paginate(&self.db, params.per_page);

        let total = paginator.num_items().await?;
        let data = paginator
            .fetch_page(params.page.saturating_sub(1))
            .await?
            .into_iter()
            .map(PermissionResponse::from)
            .collect();

        Ok(Paginated::new(
            data,
            Pagination::new(params.page, params.per_page, total),
            DEFAULT_PAGE_PARAM,
        ))
    }

    async fn create(&self, input: PermissionInput) -> Result<PermissionResponse, RepositoryError> {
        let now = chrono::Utc::now();
        let new_permission = permission::ActiveModel {
            name: Set(input.name),
            slug: Set(input.slug.flatten()),
            description: Set(input.description.flatten()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = new_permission.insert(&self.db).await?;
        info!(id = model.id, "Permission created");

        Ok(model.into())
    }

    async fn find(&self, id: i32) -> Result<PermissionResponse, RepositoryError> {
        find_permission(&self.db, id).await.map(Into::into)
    }

    async fn update(&self, id: i32, input: PermissionInput) -> Result<bool, RepositoryError> {
        let txn = self.db.begin().await?;

        let Some(existing) = permission::Entity::find_by_id(id).one(&txn).await? else {
            return Ok(false);
        };

        let mut active: permission::ActiveModel = existing.into();
        active.name = Set(input.name);
        if let Some(slug) = input.slug {
            active.slug = Set(slug);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        active.updated_at = Set(chrono::Utc::now());

        active.update(&txn).await?;
        txn.commit().await?;

        info!(id, "Permission updated");
        Ok(true)
    }

    async fn delete(&self, id: i32) -> Result<bool, RepositoryError> {
        let txn = self.db.begin().await?;

        permission_role::Entity::delete_many()
            .filter(permission_role::Column::PermissionId.eq(id))
            .exec(&txn)
            .await?;
        permission_group::Entity::delete_many()
            .filter(permission_group::Column::PermissionId.eq(id))
            .exec(&txn)
            .await?;
        permission_user::Entity::delete_many()
            .filter(permission_user::Column::PermissionId.eq(id))
            .exec(&txn)
            .await?;

        let result = permission::Entity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(false);
        }

        txn.commit().await?;
        info!(id, "Permission deleted");
        Ok(true)
    }

    async fn next(&self, id: i32) -> Result<Option<i32>, RepositoryError> {
        let next = permission::Entity::find()
            .select_only()
            .column(permission::Column::Id)
            .filter(permission::Column::Id.gt(id))
            .order_by_asc(permission::Column::Id)
            .into_tuple::<i32>()
            .one(&self.db)
            .await?;
        Ok(next)
    }

    async fn prev(&self, id: i32) -> Result<Option<i32>, RepositoryError> {
        let prev = permission::Entity::find()
            .select_only()
            .column(permission::Column::Id)
            .filter(permission::Column::Id.lt(id))
            .order_by_desc(permission::Column::Id)
            .into_tuple::<i32>()
            .one(&self.db)
            .await?;
        Ok(prev)
    }
}

#[async_trait]
impl PermissionRepository for SeaOrmPermissionRepository {
    async fn roles(&self, id: i32) -> Result<Vec<RoleSummary>, RepositoryError> {
        self.ensure_exists(id).await?;

        let rows = permission_role::Entity::find()
            .filter(permission_role::Column::PermissionId.eq(id))
            .find_also_related(role::Entity)
            .order_by_asc(permission_role::Column::RoleId)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(_, r)| r.map(RoleSummary::from))
            .collect())
    }

    async fn groups(&self, id: i32) -> Result<Vec<GroupSummary>, RepositoryError> {
        self.ensure_exists(id).await?;

        let rows = permission_group::Entity::find()
            .filter(permission_group::Column::PermissionId.eq(id))
            .find_also_related(group::Entity)
            .order_by_asc(permission_group::Column::GroupId)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(_, g)| g.map(GroupSummary::from))
            .collect())
    }

    async fn users(&self, id: i32) -> Result<Vec<UserSummary>, RepositoryError> {
        self.ensure_exists(id).await?;

        let rows = permission_user::Entity::find()
            .filter(permission_user::Column::PermissionId.eq(id))
            .find_also_related(user::Entity)
            .order_by_asc(permission_user::Column::UserId)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(_, u)| u.map(UserSummary::from))
            .collect())
    }
}
