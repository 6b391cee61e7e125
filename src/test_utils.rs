//! Shared test utilities for the association registry.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{association, membership, transaction, user},
    entities,
    errors::Result,
    models::{AssociationCandidate, UserCandidate},
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Builds a calendar date, panicking on an impossible one.
#[allow(clippy::unwrap_used)]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// A complete, valid user candidate with a fresh id.
///
/// # Defaults
/// * `birthday`: 1985-03-02
/// * `address`: "Rua Principal 100"
/// * `uses_whatsapp`: true
/// * all optional fields absent
pub fn user_candidate(name: &str) -> UserCandidate {
    UserCandidate {
        id: Some(Uuid::new_v4().to_string()),
        name: Some(name.to_string()),
        birthday: Some("1985-03-02".to_string()),
        address: Some("Rua Principal 100".to_string()),
        uses_whatsapp: Some("true".to_string()),
        ..Default::default()
    }
}

/// A complete, valid association candidate with a fresh id.
pub fn association_candidate(name: &str) -> AssociationCandidate {
    AssociationCandidate {
        id: Some(Uuid::new_v4().to_string()),
        name: Some(name.to_string()),
        neighborhood: Some("Centro".to_string()),
        country: Some("Brazil".to_string()),
        state: Some("MG".to_string()),
        address: Some("Praça da Matriz 5".to_string()),
        identity: None,
    }
}

/// Creates a test user with sensible defaults.
pub async fn create_test_user(db: &DatabaseConnection, name: &str) -> Result<entities::UserModel> {
    user::create_user(db, &user_candidate(name)).await
}

/// Creates a test association with sensible defaults.
pub async fn create_test_association(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::AssociationModel> {
    association::create_association(db, &association_candidate(name)).await
}

/// Creates a user and links them as a member of `association_id`.
pub async fn create_test_member(
    db: &DatabaseConnection,
    name: &str,
    association_id: Uuid,
) -> Result<entities::UserModel> {
    let member = create_test_user(db, name).await?;
    membership::link_user_to_association(db, member.id, association_id).await?;
    Ok(member)
}

/// Records a test transaction dated 2024-01-01 with details `"Test transaction"`.
pub async fn create_test_transaction(
    db: &DatabaseConnection,
    association_id: Uuid,
    creator_id: Uuid,
    amount: f64,
) -> Result<entities::TransactionModel> {
    transaction::record_transaction(
        db,
        association_id,
        creator_id,
        "Test transaction".to_string(),
        amount,
        date(2024, 1, 1),
    )
    .await
}

/// Sets up a complete test environment with one association and one member.
/// Returns (db, user, association) for common test scenarios.
pub async fn setup_with_member() -> Result<(
    DatabaseConnection,
    entities::UserModel,
    entities::AssociationModel,
)> {
    let db = setup_test_db().await?;
    let association = create_test_association(&db, "Test Association").await?;
    let member = create_test_member(&db, "Test Member", association.id).await?;
    Ok((db, member, association))
}
