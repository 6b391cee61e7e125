//! Admin role business logic.
//!
//! An admin link has the same key shape as a membership and requires one: a
//! user must be a member of an association before administering it.

use crate::{
    core::{
        association::require_association,
        membership::{pair_key, require_membership},
        user::require_user,
    },
    entities::{AssociationAdmin, association_admin},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Grants the admin role to a member.
///
/// Fails with `Error::NotFound` if the user, the association or the membership
/// is missing, and `Error::Conflict` if the user is already an admin.
#[instrument(skip(db))]
pub async fn assign_admin(
    db: &DatabaseConnection,
    user_id: Uuid,
    association_id: Uuid,
) -> Result<association_admin::Model> {
    let txn = db.begin().await?;

    require_user(&txn, user_id).await?;
    require_association(&txn, association_id).await?;
    require_membership(&txn, user_id, association_id).await?;

    if AssociationAdmin::find_by_id((user_id, association_id))
        .one(&txn)
        .await?
        .is_some()
    {
        return Err(Error::Conflict {
            message: format!("user {user_id} is already an admin of association {association_id}"),
        });
    }

    let role = association_admin::ActiveModel {
        user_id: Set(user_id),
        association_id: Set(association_id),
        created_at: Set(chrono::Utc::now()),
    };
    let result = role.insert(&txn).await?;

    txn.commit().await?;
    info!(%user_id, %association_id, "granted admin role");
    Ok(result)
}

/// Revokes the admin role. Fails with `Error::NotFound` if it was not granted.
#[instrument(skip(db))]
pub async fn revoke_admin(db: &DatabaseConnection, user_id: Uuid, association_id: Uuid) -> Result<()> {
    let txn = db.begin().await?;

    let role = AssociationAdmin::find_by_id((user_id, association_id))
        .one(&txn)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "admin role",
            id: pair_key(user_id, association_id),
        })?;
    role.delete(&txn).await?;

    txn.commit().await?;
    info!(%user_id, %association_id, "revoked admin role");
    Ok(())
}

/// Whether the user administers the association.
pub async fn is_admin(db: &DatabaseConnection, user_id: Uuid, association_id: Uuid) -> Result<bool> {
    Ok(AssociationAdmin::find_by_id((user_id, association_id))
        .one(db)
        .await?
        .is_some())
}

/// Lists the admin links of an association, oldest grant first.
pub async fn admins_of(
    db: &DatabaseConnection,
    association_id: Uuid,
) -> Result<Vec<association_admin::Model>> {
    AssociationAdmin::find()
        .filter(association_admin::Column::AssociationId.eq(association_id))
        .order_by_asc(association_admin::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_assign_admin_to_member() -> Result<()> {
        let (db, member, association) = setup_with_member().await?;

        let role = assign_admin(&db, member.id, association.id).await?;
        assert_eq!(role.user_id, member.id);
        assert!(is_admin(&db, member.id, association.id).await?);
        assert_eq!(admins_of(&db, association.id).await?, vec![role]);

        Ok(())
    }

    #[tokio::test]
    async fn test_assign_admin_requires_membership() -> Result<()> {
        let db = setup_test_db().await?;
        let association = create_test_association(&db, "Club").await?;
        let outsider = create_test_user(&db, "Outsider").await?;

        let result = assign_admin(&db, outsider.id, association.id).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound { entity: "membership", id: _ }
        ));
        assert!(!is_admin(&db, outsider.id, association.id).await?);

        Ok(())
    }

    #[tokio::test]
    async fn test_assign_admin_twice_conflicts() -> Result<()> {
        let (db, member, association) = setup_with_member().await?;
        assign_admin(&db, member.id, association.id).await?;

        let result = assign_admin(&db, member.id, association.id).await;
        assert!(matches!(result.unwrap_err(), Error::Conflict { message: _ }));
        assert_eq!(admins_of(&db, association.id).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_revoke_admin() -> Result<()> {
        let (db, member, association) = setup_with_member().await?;
        assign_admin(&db, member.id, association.id).await?;

        revoke_admin(&db, member.id, association.id).await?;
        assert!(!is_admin(&db, member.id, association.id).await?);

        let result = revoke_admin(&db, member.id, association.id).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound { entity: "admin role", id: _ }
        ));

        Ok(())
    }
}
