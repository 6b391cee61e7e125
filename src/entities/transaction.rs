//! Transaction entity - A ledger entry owned by an association.
//!
//! Each transaction has an `association_id` (owner), a `creator_id` (the user who
//! recorded it), free-text details, a signed decimal amount and the date it
//! refers to. Rows are never physically removed; `deleted` marks a logical
//! deletion that keeps the entry for audit while excluding it from balances.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier assigned when the transaction is recorded
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Association that owns the entry
    pub association_id: Uuid,
    /// User who recorded the entry
    pub creator_id: Uuid,
    /// Free-text description
    pub details: String,
    /// Signed amount (positive for income, negative for expenses)
    pub amount: Decimal,
    /// Date the entry refers to
    pub reference_date: Date,
    /// Soft delete flag - if true, the entry is excluded from balances but kept
    pub deleted: bool,
    /// When the transaction was recorded
    pub created_at: DateTimeUtc,
    /// When the transaction was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction belongs to one association
    #[sea_orm(
        belongs_to = "super::association::Entity",
        from = "Column::AssociationId",
        to = "super::association::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Association,
    /// Each transaction was created by one user
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatorId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Creator,
}

impl Related<super::association::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Association.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
