//! User entity - Represents a person registered in the system.
//!
//! A user can belong to many associations through membership links and can hold
//! admin or treasurer roles in them. Users are also recorded as the creator of
//! ledger transactions.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Globally unique identifier, immutable after creation
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Full name
    pub name: String,
    /// Date of birth
    pub birthday: Date,
    /// Postal address
    pub address: String,
    /// Occupation or main activity
    pub activity: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Personal phone number
    pub personal_phone: Option<String>,
    /// Commercial phone number
    pub commercial_phone: Option<String>,
    /// Whether the user can be reached through WhatsApp
    pub uses_whatsapp: bool,
    /// Identity document reference(s)
    pub identities: Option<String>,
    /// Profile picture or page URL
    pub profile_url: Option<String>,
    /// When the user was created
    pub created_at: DateTimeUtc,
    /// When the user was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user has many membership links
    #[sea_orm(has_many = "super::user_association::Entity")]
    Memberships,
    /// One user has many admin role links
    #[sea_orm(has_many = "super::association_admin::Entity")]
    AdminRoles,
    /// One user has many treasurer terms
    #[sea_orm(has_many = "super::association_treasurer::Entity")]
    TreasurerTerms,
    /// One user creates many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::user_association::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Memberships.def()
    }
}

impl Related<super::association_admin::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdminRoles.def()
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
