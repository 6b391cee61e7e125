//! Treasurer term - a time-bounded treasurer role within an association.
//!
//! A term covers `[start_date, end_date)`; a missing `end_date` means the term
//! is still open. Terms are keyed by user, association and start date so the
//! same person can serve several non-overlapping terms.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Treasurer term database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "association_treasurers")]
pub struct Model {
    /// Treasurer
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,
    /// Association the term belongs to
    #[sea_orm(primary_key, auto_increment = false)]
    pub association_id: Uuid,
    /// First day of the term
    #[sea_orm(primary_key, auto_increment = false)]
    pub start_date: Date,
    /// First day after the term, `None` while the term is open
    pub end_date: Option<Date>,
    /// When the term was recorded
    pub created_at: DateTimeUtc,
    /// When the term was last modified (closed)
    pub updated_at: DateTimeUtc,
}

impl Model {
    /// Whether the term has no end date yet.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.end_date.is_none()
    }

    /// Whether `day` falls inside `[start_date, end_date)`.
    #[must_use]
    pub fn covers(&self, day: Date) -> bool {
        day >= self.start_date && self.end_date.is_none_or(|end| day < end)
    }
}

/// Defines relationships between a treasurer term and its endpoints
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
    /// The association the term belongs to
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
