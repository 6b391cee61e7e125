//! Membership link - many-to-many join between users and associations.
//!
//! Keyed by the `(user_id, association_id)` pair, so a user can hold at most one
//! membership row per association. Both sides cascade on delete.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Membership database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_associations")]
pub struct Model {
    /// Member
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    /// Association the user belongs to
    #[sea_orm(primary_key, auto_increment = false)]
    pub association_id: Uuid,
    /// When the link was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between a membership and its endpoints
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each membership belongs to one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
    /// Each membership belongs to one association
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
