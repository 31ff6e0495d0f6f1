use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A named capability that can be granted to roles, groups and users.
///
/// Neither `name` nor `slug` carries a unique constraint.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "permission")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,

    #[sea_orm(has_many, via = "permission_role")]
    pub roles: HasMany<super::role::Entity>,

    #[sea_orm(has_many, via = "permission_group")]
    pub groups: HasMany<super::group::Entity>,

    #[sea_orm(has_many, via = "permission_user")]
    pub users: HasMany<super::user::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
