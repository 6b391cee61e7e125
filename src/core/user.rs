//! User business logic - Handles registration and maintenance of users.
//!
//! Users are written only after their candidate passes validation. Deleting a
//! user removes their membership and role links, but a user who recorded ledger
//! transactions cannot be deleted because ledger rows are kept for audit.

use crate::{
    core::validation::validate_user,
    entities::{
        AssociationAdmin, AssociationTreasurer, Transaction, User, UserAssociation,
        association_admin, association_treasurer, transaction, user, user_association,
    },
    errors::{Error, FieldIssue, Result},
    models::{self, UserCandidate},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Finds a user by id or fails with `Error::NotFound`.
///
/// Generic over the connection so it can run inside an open database
/// transaction as part of a larger check-then-write.
pub async fn require_user<C>(db: &C, user_id: Uuid) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("user", user_id))
}

/// Validates a candidate and stores it as a new user.
///
/// Fails with `Error::Validation` for a bad candidate and `Error::Conflict` if a
/// user with the same id already exists.
#[instrument(skip(db, candidate), fields(id = ?candidate.id))]
pub async fn create_user(db: &DatabaseConnection, candidate: &UserCandidate) -> Result<user::Model> {
    let valid = validate_user(candidate)?;

    let txn = db.begin().await?;

    if User::find_by_id(valid.id).one(&txn).await?.is_some() {
        return Err(Error::Conflict {
            message: format!("user {} already exists", valid.id),
        });
    }

    let now = chrono::Utc::now();
    let result = active_model(valid, now, now).insert(&txn).await?;

    txn.commit().await?;
    info!(user_id = %result.id, "created user");
    Ok(result)
}

/// Finds a user by id, returning None if it doesn't exist.
pub async fn get_user(db: &DatabaseConnection, user_id: Uuid) -> Result<Option<user::Model>> {
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Lists every user ordered by name.
pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<user::Model>> {
    User::find()
        .order_by_asc(user::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies a partial update to a stored user.
///
/// Fields present in `patch` replace the stored values; absent fields are kept.
/// The merged record is validated as a whole. The id is immutable: a patch
/// carrying a different id is rejected.
#[instrument(skip(db, patch))]
pub async fn update_user(
    db: &DatabaseConnection,
    user_id: Uuid,
    patch: &UserCandidate,
) -> Result<user::Model> {
    if let Some(patch_id) = patch.id.as_deref() {
        if Uuid::parse_str(patch_id.trim()).ok() != Some(user_id) {
            return Err(Error::invalid(FieldIssue::malformed(
                "id",
                "cannot be changed after creation",
            )));
        }
    }

    let txn = db.begin().await?;

    let existing = require_user(&txn, user_id).await?;
    let created_at = existing.created_at;
    let merged = UserCandidate::from(&models::User::from(existing)).merged_with(patch.clone());
    let valid = validate_user(&merged)?;

    let result = active_model(valid, created_at, chrono::Utc::now())
        .update(&txn)
        .await?;

    txn.commit().await?;
    info!(user_id = %result.id, "updated user");
    Ok(result)
}

/// Deletes a user together with every membership, admin and treasurer link.
///
/// Fails with `Error::Conflict` if the user created any ledger transaction.
#[instrument(skip(db))]
pub async fn delete_user(db: &DatabaseConnection, user_id: Uuid) -> Result<()> {
    let txn = db.begin().await?;

    let existing = require_user(&txn, user_id).await?;

    let recorded = Transaction::find()
        .filter(transaction::Column::CreatorId.eq(user_id))
        .count(&txn)
        .await?;
    if recorded > 0 {
        return Err(Error::Conflict {
            message: format!("user {user_id} recorded {recorded} ledger transaction(s)"),
        });
    }

    UserAssociation::delete_many()
        .filter(user_association::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    AssociationAdmin::delete_many()
        .filter(association_admin::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    AssociationTreasurer::delete_many()
        .filter(association_treasurer::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    existing.delete(&txn).await?;

    txn.commit().await?;
    info!(%user_id, "deleted user");
    Ok(())
}

fn active_model(
    valid: models::User,
    created_at: DateTimeUtc,
    updated_at: DateTimeUtc,
) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(valid.id),
        name: Set(valid.name),
        birthday: Set(valid.birthday),
        address: Set(valid.address),
        activity: Set(valid.activity),
        email: Set(valid.email),
        personal_phone: Set(valid.personal_phone),
        commercial_phone: Set(valid.commercial_phone),
        uses_whatsapp: Set(valid.uses_whatsapp),
        identities: Set(valid.identities),
        profile_url: Set(valid.profile_url),
        created_at: Set(created_at),
        updated_at: Set(updated_at),
    }
}
