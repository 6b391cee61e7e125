//! Treasurer term business logic.
//!
//! A treasurer term covers the half-open range `[start_date, end_date)`, open
//! ended while `end_date` is absent. No two terms of the same association may
//! overlap, which also means an association has at most one open term and the
//! same person never holds two overlapping terms. A term moves one way only,
//! from open to closed.

use crate::{
    core::{
        association::require_association, membership::require_membership, user::require_user,
    },
    entities::{AssociationTreasurer, association_treasurer},
    errors::{Error, FieldIssue, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument, warn};

/// Whether two terms share at least one day.
///
/// Both ranges are half-open and `None` means open ended. An empty term
/// (`start == end`) covers no day and overlaps nothing.
#[must_use]
pub fn terms_overlap(
    a_start: NaiveDate,
    a_end: Option<NaiveDate>,
    b_start: NaiveDate,
    b_end: Option<NaiveDate>,
) -> bool {
    if a_end == Some(a_start) || b_end == Some(b_start) {
        return false;
    }
    a_end.is_none_or(|end| b_start < end) && b_end.is_none_or(|end| a_start < end)
}

fn check_term_bounds(start_date: NaiveDate, end_date: Option<NaiveDate>) -> Result<()> {
    match end_date {
        Some(end) if end < start_date => Err(Error::invalid(FieldIssue::malformed(
            "end_date",
            format!("{end} is before start_date {start_date}"),
        ))),
        _ => Ok(()),
    }
}

/// Records a treasurer term for a member of an association.
///
/// Fails with `Error::Validation` if `end_date` precedes `start_date`,
/// `Error::NotFound` if the user, association or membership is missing, and
/// `Error::Overlap` if the term overlaps any stored term of the association.
#[instrument(skip(db))]
pub async fn assign_treasurer(
    db: &DatabaseConnection,
    user_id: Uuid,
    association_id: Uuid,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> Result<association_treasurer::Model> {
    check_term_bounds(start_date, end_date)?;

    let txn = db.begin().await?;

    require_user(&txn, user_id).await?;
    require_association(&txn, association_id).await?;
    require_membership(&txn, user_id, association_id).await?;

    let existing = AssociationTreasurer::find()
        .filter(association_treasurer::Column::AssociationId.eq(association_id))
        .all(&txn)
        .await?;

    if let Some(clash) = existing
        .iter()
        .find(|term| terms_overlap(term.start_date, term.end_date, start_date, end_date))
    {
        warn!(
            clashing_user = %clash.user_id,
            clashing_start = %clash.start_date,
            "treasurer term overlaps an existing term"
        );
        return Err(Error::Overlap {
            association_id,
            start_date,
            end_date,
        });
    }

    // Empty terms overlap nothing, so the key itself can still collide.
    if existing
        .iter()
        .any(|term| term.user_id == user_id && term.start_date == start_date)
    {
        return Err(Error::Conflict {
            message: format!(
                "user {user_id} already has a treasurer term starting {start_date} in association {association_id}"
            ),
        });
    }

    let now = chrono::Utc::now();
    let term = association_treasurer::ActiveModel {
        user_id: Set(user_id),
        association_id: Set(association_id),
        start_date: Set(start_date),
        end_date: Set(end_date),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let result = term.insert(&txn).await?;

    txn.commit().await?;
    info!(%user_id, %association_id, %start_date, "recorded treasurer term");
    Ok(result)
}

/// Closes an open treasurer term by setting its end date.
///
/// Fails with `Error::NotFound` if no such term exists, `Error::Conflict` if it
/// is already closed and `Error::Validation` if `end_date` precedes the start.
#[instrument(skip(db))]
pub async fn close_treasurer_term(
    db: &DatabaseConnection,
    user_id: Uuid,
    association_id: Uuid,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<association_treasurer::Model> {
    check_term_bounds(start_date, Some(end_date))?;

    let txn = db.begin().await?;

    let term = AssociationTreasurer::find_by_id((user_id, association_id, start_date))
        .one(&txn)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "treasurer term",
            id: format!("{user_id}/{association_id}/{start_date}"),
        })?;

    if let Some(closed_on) = term.end_date {
        return Err(Error::Conflict {
            message: format!("treasurer term starting {start_date} already ended on {closed_on}"),
        });
    }

    let mut term: association_treasurer::ActiveModel = term.into();
    term.end_date = Set(Some(end_date));
    term.updated_at = Set(chrono::Utc::now());
    let result = term.update(&txn).await?;

    txn.commit().await?;
    info!(%user_id, %association_id, %start_date, %end_date, "closed treasurer term");
    Ok(result)
}

/// All terms of an association, earliest first.
pub async fn treasurer_terms(
    db: &DatabaseConnection,
    association_id: Uuid,
) -> Result<Vec<association_treasurer::Model>> {
    AssociationTreasurer::find()
        .filter(association_treasurer::Column::AssociationId.eq(association_id))
        .order_by_asc(association_treasurer::Column::StartDate)
        .all(db)
        .await
        .map_err(Into::into)
}

/// The term covering `on`, if any.
pub async fn current_treasurer(
    db: &DatabaseConnection,
    association_id: Uuid,
    on: NaiveDate,
) -> Result<Option<association_treasurer::Model>> {
    Ok(treasurer_terms(db, association_id)
        .await?
        .into_iter()
        .find(|term| term.covers(on)))
}

/// Whether the user is the association's treasurer on the given day.
pub async fn is_treasurer(
    db: &DatabaseConnection,
    user_id: Uuid,
    association_id: Uuid,
    on: NaiveDate,
) -> Result<bool> {
    Ok(current_treasurer(db, association_id, on)
        .await?
        .is_some_and(|term| term.user_id == user_id))
}
