//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod association;
pub mod association_admin;
pub mod association_treasurer;
pub mod transaction;
pub mod user;
pub mod user_association;

// Re-export specific types to avoid conflicts
pub use association::{
    Column as AssociationColumn, Entity as Association, Model as AssociationModel,
};
pub use association_admin::{
    Column as AssociationAdminColumn, Entity as AssociationAdmin, Model as AssociationAdminModel,
};
pub use association_treasurer::{
    Column as AssociationTreasurerColumn, Entity as AssociationTreasurer,
    Model as AssociationTreasurerModel,
};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
pub use user_association::{
    Column as UserAssociationColumn, Entity as UserAssociation, Model as UserAssociationModel,
};
