use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "permission_group")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub permission_id: i32,
    #[sea_orm(primary_key)]
    pub group_id: i32,
    #[sea_orm(belongs_to, from = "permission_id", to = "id")]
    pub permission: Option<super::permission::Entity>,
    #[sea_orm(belongs_to, from = "group_id", to = "id")]
    pub group: Option<super::group::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
