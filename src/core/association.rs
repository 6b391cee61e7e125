//! Association business logic - Handles creation and maintenance of associations.
//!
//! Mirrors the user operations: candidates are validated before any write,
//! deletion cascades membership and role links, and an association that owns
//! ledger transactions cannot be deleted.

use crate::{
    core::validation::validate_association,
    entities::{
        Association, AssociationAdmin, AssociationTreasurer, Transaction, UserAssociation,
        association, association_admin, association_treasurer, transaction, user_association,
    },
    errors::{Error, FieldIssue, Result},
    models::{self, AssociationCandidate},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Finds an association by id or fails with `Error::NotFound`.
pub async fn require_association<C>(db: &C, association_id: Uuid) -> Result<association::Model>
where
    C: ConnectionTrait,
{
    Association::find_by_id(association_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("association", association_id))
}

/// Validates a candidate and stores it as a new association.
#[instrument(skip(db, candidate), fields(id = ?candidate.id))]
pub async fn create_association(
    db: &DatabaseConnection,
    candidate: &AssociationCandidate,
) -> Result<association::Model> {
    let valid = validate_association(candidate)?;

    let txn = db.begin().await?;

    if Association::find_by_id(valid.id).one(&txn).await?.is_some() {
        return Err(Error::Conflict {
            message: format!("association {} already exists", valid.id),
        });
    }

    let now = chrono::Utc::now();
    let result = active_model(valid, now, now).insert(&txn).await?;

    txn.commit().await?;
    info!(association_id = %result.id, name = %result.name, "created association");
    Ok(result)
}

/// Finds an association by id, returning None if it doesn't exist.
pub async fn get_association(
    db: &DatabaseConnection,
    association_id: Uuid,
) -> Result<Option<association::Model>> {
    Association::find_by_id(association_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists every association ordered by name.
pub async fn list_associations(db: &DatabaseConnection) -> Result<Vec<association::Model>> {
    Association::find()
        .order_by_asc(association::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies a partial update to a stored association. See `update_user`.
#[instrument(skip(db, patch))]
pub async fn update_association(
    db: &DatabaseConnection,
    association_id: Uuid,
    patch: &AssociationCandidate,
) -> Result<association::Model> {
    if let Some(patch_id) = patch.id.as_deref() {
        if Uuid::parse_str(patch_id.trim()).ok() != Some(association_id) {
            return Err(Error::invalid(FieldIssue::malformed(
                "id",
                "cannot be changed after creation",
            )));
        }
    }

    let txn = db.begin().await?;

    let existing = require_association(&txn, association_id).await?;
    let created_at = existing.created_at;
    let merged = AssociationCandidate::from(&models::Association::from(existing))
        .merged_with(patch.clone());
    let valid = validate_association(&merged)?;

    let result = active_model(valid, created_at, chrono::Utc::now())
        .update(&txn)
        .await?;

    txn.commit().await?;
    info!(association_id = %result.id, "updated association");
    Ok(result)
}

/// Deletes an association together with its membership, admin and treasurer links.
///
/// Fails with `Error::Conflict` if the association owns ledger transactions,
/// soft-deleted ones included.
#[instrument(skip(db))]
pub async fn delete_association(db: &DatabaseConnection, association_id: Uuid) -> Result<()> {
    let txn = db.begin().await?;

    let existing = require_association(&txn, association_id).await?;

    let owned = Transaction::find()
        .filter(transaction::Column::AssociationId.eq(association_id))
        .count(&txn)
        .await?;
    if owned > 0 {
        return Err(Error::Conflict {
            message: format!("association {association_id} owns {owned} ledger transaction(s)"),
        });
    }

    UserAssociation::delete_many()
        .filter(user_association::Column::AssociationId.eq(association_id))
        .exec(&txn)
        .await?;
    AssociationAdmin::delete_many()
        .filter(association_admin::Column::AssociationId.eq(association_id))
        .exec(&txn)
        .await?;
    AssociationTreasurer::delete_many()
        .filter(association_treasurer::Column::AssociationId.eq(association_id))
        .exec(&txn)
        .await?;
    existing.delete(&txn).await?;

    txn.commit().await?;
    info!(%association_id, "deleted association");
    Ok(())
}

fn active_model(
    valid: models::Association,
    created_at: DateTimeUtc,
    updated_at: DateTimeUtc,
) -> association::ActiveModel {
    association::ActiveModel {
        id: Set(valid.id),
        name: Set(valid.name),
        neighborhood: Set(valid.neighborhood),
        country: Set(valid.country),
        state: Set(valid.state),
        address: Set(valid.address),
        identity: Set(valid.identity),
        created_at: Set(created_at),
        updated_at: Set(updated_at),
    }
}
