//! Admin role link - marks a member as administrator of an association.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Admin role database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "association_admins")]
pub struct Model {
    /// Administrator
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    /// Administered association
    #[sea_orm(primary_key, auto_increment = false)]
    pub association_id: Uuid,
    /// When the role was granted
    pub created_at: DateTimeUtc,
}

/// Defines relationships between an admin role and its endpoints
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The member holding the role
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    /// The association the role belongs to
    #[sea_orm(
        belongs_to = "super::association::Entity",
        from = "Column::AssociationId",
        to = "super::association::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Association,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::association::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Association.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
