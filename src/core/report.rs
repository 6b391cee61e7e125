//! Ledger report business logic.
//!
//! This module computes balances and summaries for an association's ledger.
//! Soft-deleted transactions never contribute to any sum; they are only counted
//! so audit views can show how many entries were withdrawn.

use crate::{
    core::{association::require_association, transaction::transactions_for_association},
    entities::{association, transaction},
    errors::Result,
};
use sea_orm::{DatabaseConnection, prelude::*};

/// Summary of an association's ledger.
#[derive(Debug, Clone)]
pub struct LedgerSummary {
    /// The association being reported on
    pub association: association::Model,
    /// Sum of all active amounts
    pub balance: Decimal,
    /// Sum of the positive active amounts
    pub income: Decimal,
    /// Sum of the negative active amounts, as a non-positive number
    pub expenses: Decimal,
    /// Number of active transactions
    pub active_count: usize,
    /// Number of soft-deleted transactions
    pub deleted_count: usize,
    /// Most recent active transactions, newest reference date first
    pub recent_transactions: Vec<transaction::Model>,
}

/// Sums the amounts of active transactions.
#[must_use]
pub fn active_balance(transactions: &[transaction::Model]) -> Decimal {
    transactions
        .iter()
        .filter(|t| !t.deleted)
        .map(|t| t.amount)
        .sum()
}

/// Current balance of an association: the sum of its active transactions.
///
/// Fails with `Error::NotFound` for an unknown association.
pub async fn association_balance(db: &DatabaseConnection, association_id: Uuid) -> Result<Decimal> {
    require_association(db, association_id).await?;
    let active = transactions_for_association(db, association_id, false).await?;
    Ok(active_balance(&active))
}

/// Generates a ledger summary for an association.
///
/// # Arguments
/// * `db` - Database connection
/// * `association_id` - ID of the association to report on
/// * `recent_limit` - Maximum number of recent transactions to include (default 10)
pub async fn generate_ledger_summary(
    db: &DatabaseConnection,
    association_id: Uuid,
    recent_limit: Option<usize>,
) -> Result<LedgerSummary> {
    let association = require_association(db, association_id).await?;

    let all = transactions_for_association(db, association_id, true).await?;
    let (active, deleted): (Vec<_>, Vec<_>) = all.into_iter().partition(|t| !t.deleted);

    let balance = active_balance(&active);
    let income: Decimal = active
        .iter()
        .map(|t| t.amount)
        .filter(|amount| amount.is_sign_positive())
        .sum();
    let expenses: Decimal = active
        .iter()
        .map(|t| t.amount)
        .filter(|amount| amount.is_sign_negative())
        .sum();

    let active_count = active.len();
    let recent_transactions = active.into_iter().take(recent_limit.unwrap_or(10)).collect();

    Ok(LedgerSummary {
        association,
        balance,
        income,
        expenses,
        active_count,
        deleted_count: deleted.len(),
        recent_transactions,
    })
}
