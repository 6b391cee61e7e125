//! Association entity - Represents an organization with members and a ledger.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Association database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "associations")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Display name of the association
    pub name: String,
    /// Neighborhood the association operates in
    pub neighborhood: String,
    /// Country
    pub country: String,
    /// State or province
    pub state: String,
    /// Street address
    pub address: String,
    /// Optional registration/identity reference
    pub identity: Option<String>,
    /// When the association was created
    pub created_at: DateTimeUtc,
    /// When the association was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Association and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One association has many membership links
    #[sea_orm(has_many = "super::user_association::Entity")]
    Members,
    /// One association has many admin role links
    #[sea_orm(has_many = "super::association_admin::Entity")]
    Admins,
    /// One association has many treasurer terms
    #[sea_orm(has_many = "super::association_treasurer::Entity")]
    TreasurerTerms,
    /// One association owns many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::user_association::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl Related<super::association_admin::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Admins.def()
    }
}

impl Related<super::association_treasurer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TreasurerTerms.def()
    }
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
