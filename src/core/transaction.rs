//! Transaction business logic - Handles the association ledger.
//!
//! This module provides functions for recording, retrieving and soft-deleting
//! ledger transactions. Recording validates the amount and checks that both the
//! owning association and the creating user exist, all inside one database
//! transaction. Rows are never physically deleted: soft deletion flips the
//! `deleted` flag, which is a one-way transition.

use crate::{
    core::{association::require_association, user::require_user},
    entities::{Transaction, transaction},
    errors::{Error, FieldIssue, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{debug, info, instrument};

/// Converts a submitted amount into a ledger decimal.
///
/// # Errors
/// Returns `Error::Validation` for NaN, infinities and values outside the
/// decimal range.
pub fn parse_amount(amount: f64) -> Result<Decimal> {
    if !amount.is_finite() {
        return Err(Error::invalid(FieldIssue::malformed(
            "amount",
            format!("must be a finite number, got {amount}"),
        )));
    }
    Decimal::try_from(amount).map_err(|e| {
        Error::invalid(FieldIssue::malformed(
            "amount",
            format!("cannot be represented as a decimal: {e}"),
        ))
    })
}

/// Records a new ledger transaction for an association.
///
/// # Arguments
/// * `association_id` - The association that owns the entry
/// * `creator_id` - The user recording the entry
/// * `details` - Free-text description
/// * `amount` - Signed amount (positive for income, negative for expenses)
/// * `reference_date` - The date the entry refers to
///
/// Returns the stored row with a fresh id and `deleted = false`.
#[instrument(skip(db, details))]
pub async fn record_transaction(
    db: &DatabaseConnection,
    association_id: Uuid,
    creator_id: Uuid,
    details: String,
    amount: f64,
    reference_date: NaiveDate,
) -> Result<transaction::Model> {
    let amount = parse_amount(amount)?;

    // Use a transaction to ensure atomicity
    let txn = db.begin().await?;

    require_association(&txn, association_id).await?;
    require_user(&txn, creator_id).await?;

    let now = chrono::Utc::now();
    let transaction_model = transaction::ActiveModel {
        id: Set(Uuid::new_v4()),
        association_id: Set(association_id),
        creator_id: Set(creator_id),
        details: Set(details),
        amount: Set(amount),
        reference_date: Set(reference_date),
        deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let result = transaction_model.insert(&txn).await?;

    txn.commit().await?;
    info!(transaction_id = %result.id, %association_id, %amount, "recorded transaction");
    Ok(result)
}

/// Retrieves a specific transaction by its unique ID, deleted or not.
pub async fn get_transaction(
    db: &DatabaseConnection,
    transaction_id: Uuid,
) -> Result<Option<transaction::Model>> {
    Transaction::find_by_id(transaction_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the transactions of an association, newest reference date first.
///
/// Soft-deleted rows are only returned when `include_deleted` is set, which is
/// what audit views use.
pub async fn transactions_for_association(
    db: &DatabaseConnection,
    association_id: Uuid,
    include_deleted: bool,
) -> Result<Vec<transaction::Model>> {
    let mut query = Transaction::find()
        .filter(transaction::Column::AssociationId.eq(association_id));
    if !include_deleted {
        query = query.filter(transaction::Column::Deleted.eq(false));
    }
    query
        .order_by_desc(transaction::Column::ReferenceDate)
        .order_by_desc(transaction::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Marks a transaction as deleted.
///
/// Idempotent: deleting an already-deleted transaction succeeds and returns the
/// row unchanged. Fails with `Error::NotFound` for an unknown id.
#[instrument(skip(db))]
pub async fn soft_delete_transaction(
    db: &DatabaseConnection,
    transaction_id: Uuid,
) -> Result<transaction::Model> {
    let txn = db.begin().await?;

    let existing = Transaction::find_by_id(transaction_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("transaction", transaction_id))?;

    if existing.deleted {
        debug!(%transaction_id, "transaction already deleted");
        return Ok(existing);
    }

    let mut active: transaction::ActiveModel = existing.into();
    active.deleted = Set(true);
    active.updated_at = Set(chrono::Utc::now());
    let result = active.update(&txn).await?;

    txn.commit().await?;
    info!(%transaction_id, "soft-deleted transaction");
    Ok(result)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(50.0).unwrap(), Decimal::new(50, 0));
        assert_eq!(parse_amount(-12.5).unwrap(), Decimal::new(-125, 1));
        assert!(parse_amount(f64::NAN).is_err());
        assert!(parse_amount(f64::INFINITY).is_err());
        assert!(parse_amount(f64::NEG_INFINITY).is_err());
    }

    #[tokio::test]
    async fn test_record_transaction_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        for amount in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let result = record_transaction(
                &db,
                Uuid::new_v4(),
                Uuid::new_v4(),
                "test".to_string(),
                amount,
                date(2024, 1, 1),
            )
            .await;
            match result.unwrap_err() {
                Error::Validation { issues } => assert_eq!(issues[0].field, "amount"),
                other => panic!("unexpected error: {other:?}"),
            }
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_record_transaction_integration() -> Result<()> {
        let (db, member, association) = setup_with_member().await?;

        let entry = record_transaction(
            &db,
            association.id,
            member.id,
            "Dues".to_string(),
            50.00,
            date(2024, 1, 1),
        )
        .await?;

        assert!(!entry.deleted);
        assert_eq!(entry.association_id, association.id);
        assert_eq!(entry.creator_id, member.id);
        assert_eq!(entry.details, "Dues");
        assert_eq!(entry.amount, Decimal::new(5000, 2));
        assert_eq!(entry.reference_date, date(2024, 1, 1));

        let stored = get_transaction(&db, entry.id).await?.unwrap();
        assert_eq!(stored.id, entry.id);
        assert_eq!(stored.amount, Decimal::new(50, 0));
        assert!(!stored.deleted);

        Ok(())
    }

    #[tokio::test]
    async fn test_record_transaction_assigns_unique_ids() -> Result<()> {
        let (db, member, association) = setup_with_member().await?;

        let first = create_test_transaction(&db, association.id, member.id, 10.0).await?;
        let second = create_test_transaction(&db, association.id, member.id, 10.0).await?;
        assert_ne!(first.id, second.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_record_transaction_missing_owner_or_creator() -> Result<()> {
        let (db, member, association) = setup_with_member().await?;

        let result = create_test_transaction(&db, Uuid::new_v4(), member.id, 10.0).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound { entity: "association", id: _ }
        ));

        let result = create_test_transaction(&db, association.id, Uuid::new_v4(), 10.0).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound { entity: "user", id: _ }
        ));

        assert!(
            transactions_for_association(&db, association.id, true)
                .await?
                .is_empty()
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_soft_delete_is_idempotent() -> Result<()> {
        let (db, member, association) = setup_with_member().await?;
        let entry = create_test_transaction(&db, association.id, member.id, 25.0).await?;

        let first = soft_delete_transaction(&db, entry.id).await?;
        assert!(first.deleted);

        let second = soft_delete_transaction(&db, entry.id).await?;
        assert!(second.deleted);
        assert_eq!(second.updated_at, first.updated_at);

        // Retained for audit
        let stored = get_transaction(&db, entry.id).await?.unwrap();
        assert!(stored.deleted);

        Ok(())
    }

    #[tokio::test]
    async fn test_soft_delete_unknown_transaction_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let result = soft_delete_transaction(&db, Uuid::new_v4()).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound { entity: "transaction", id: _ }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_transactions_for_association_filters_deleted() -> Result<()> {
        let (db, member, association) = setup_with_member().await?;
        let january = create_test_transaction(&db, association.id, member.id, 10.0).await?;
        let march = record_transaction(
            &db,
            association.id,
            member.id,
            "Rent".to_string(),
            -30.0,
            date(2024, 3, 1),
        )
        .await?;
        let removed = create_test_transaction(&db, association.id, member.id, 99.0).await?;
        soft_delete_transaction(&db, removed.id).await?;

        let active: Vec<Uuid> = transactions_for_association(&db, association.id, false)
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(active, vec![march.id, january.id]);

        let all = transactions_for_association(&db, association.id, true).await?;
        assert_eq!(all.len(), 3);

        Ok(())
    }
}
