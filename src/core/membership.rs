//! Membership business logic - links users to associations.
//!
//! A membership is the baseline link every role assignment builds on. Linking
//! checks both endpoints and the pair's uniqueness inside one database
//! transaction so concurrent requests cannot create duplicate rows.

use crate::{
    core::{association::require_association, user::require_user},
    entities::{
        Association, AssociationAdmin, AssociationTreasurer, User, UserAssociation, association,
        association_admin, association_treasurer, user, user_association,
    },
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

pub(crate) fn pair_key(user_id: Uuid, association_id: Uuid) -> String {
    format!("{user_id}/{association_id}")
}

/// Fails with `Error::NotFound` (entity `"membership"`) unless the user is a
/// member of the association.
pub async fn require_membership<C>(
    db: &C,
    user_id: Uuid,
    association_id: Uuid,
) -> Result<user_association::Model>
where
    C: ConnectionTrait,
{
    UserAssociation::find_by_id((user_id, association_id))
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "membership",
            id: pair_key(user_id, association_id),
        })
}

/// Makes a user a member of an association.
///
/// Fails with `Error::NotFound` if either id is unknown and `Error::Conflict`
/// if the membership already exists.
#[instrument(skip(db))]
pub async fn link_user_to_association(
    db: &DatabaseConnection,
    user_id: Uuid,
    association_id: Uuid,
) -> Result<user_association::Model> {
    let txn = db.begin().await?;

    require_user(&txn, user_id).await?;
    require_association(&txn, association_id).await?;

    if UserAssociation::find_by_id((user_id, association_id))
        .one(&txn)
        .await?
        .is_some()
    {
        return Err(Error::Conflict {
            message: format!("user {user_id} is already a member of association {association_id}"),
        });
    }

    let link = user_association::ActiveModel {
        user_id: Set(user_id),
        association_id: Set(association_id),
        created_at: Set(chrono::Utc::now()),
    };
    let result = link.insert(&txn).await?;

    txn.commit().await?;
    info!(%user_id, %association_id, "linked user to association");
    Ok(result)
}

/// Removes a membership and the admin role that depends on it.
///
/// Closed treasurer terms are kept as history. An open treasurer term blocks
/// the unlink with `Error::Conflict`; close it first.
#[instrument(skip(db))]
pub async fn unlink_user_from_association(
    db: &DatabaseConnection,
    user_id: Uuid,
    association_id: Uuid,
) -> Result<()> {
    let txn = db.begin().await?;

    let link = require_membership(&txn, user_id, association_id).await?;

    let open_terms = AssociationTreasurer::find()
        .filter(association_treasurer::Column::UserId.eq(user_id))
        .filter(association_treasurer::Column::AssociationId.eq(association_id))
        .filter(association_treasurer::Column::EndDate.is_null())
        .count(&txn)
        .await?;
    if open_terms > 0 {
        return Err(Error::Conflict {
            message: format!(
                "user {user_id} holds an open treasurer term in association {association_id}"
            ),
        });
    }

    AssociationAdmin::delete_many()
        .filter(association_admin::Column::UserId.eq(user_id))
        .filter(association_admin::Column::AssociationId.eq(association_id))
        .exec(&txn)
        .await?;
    link.delete(&txn).await?;

    txn.commit().await?;
    info!(%user_id, %association_id, "unlinked user from association");
    Ok(())
}

/// Whether the user is a member of the association.
pub async fn is_member(db: &DatabaseConnection, user_id: Uuid, association_id: Uuid) -> Result<bool> {
    Ok(UserAssociation::find_by_id((user_id, association_id))
        .one(db)
        .await?
        .is_some())
}

/// Lists the members of an association ordered by name.
pub async fn members_of(db: &DatabaseConnection, association_id: Uuid) -> Result<Vec<user::Model>> {
    let user_ids: Vec<Uuid> = UserAssociation::find()
        .filter(user_association::Column::AssociationId.eq(association_id))
        .all(db)
        .await?
        .into_iter()
        .map(|link| link.user_id)
        .collect();

    User::find()
        .filter(user::Column::Id.is_in(user_ids))
        .order_by_asc(user::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Lists the associations a user belongs to ordered by name.
pub async fn associations_of_user(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Vec<association::Model>> {
    let association_ids: Vec<Uuid> = UserAssociation::find()
        .filter(user_association::Column::UserId.eq(user_id))
        .all(db)
        .await?
        .into_iter()
        .map(|link| link.association_id)
        .collect();

    Association::find()
        .filter(association::Column::Id.is_in(association_ids))
        .order_by_asc(association::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{admin, treasurer};
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_link_user_to_association() -> Result<()> {
        let db = setup_test_db().await?;
        let association = create_test_association(&db, "Club").await?;
        let user = create_test_user(&db, "Ana").await?;

        let link = link_user_to_association(&db, user.id, association.id).await?;
        assert_eq!(link.user_id, user.id);
        assert_eq!(link.association_id, association.id);
        assert!(is_member(&db, user.id, association.id).await?);

        Ok(())
    }

    #[tokio::test]
    async fn test_link_twice_conflicts_and_keeps_one_row() -> Result<()> {
        let (db, member, association) = setup_with_member().await?;

        let result = link_user_to_association(&db, member.id, association.id).await;
        assert!(matches!(result.unwrap_err(), Error::Conflict { message: _ }));

        let rows = UserAssociation::find()
            .filter(user_association::Column::UserId.eq(member.id))
            .filter(user_association::Column::AssociationId.eq(association.id))
            .count(&db)
            .await?;
        assert_eq!(rows, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_link_unknown_ids_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let association = create_test_association(&db, "Club").await?;
        let user = create_test_user(&db, "Ana").await?;

        let result = link_user_to_association(&db, Uuid::new_v4(), association.id).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound { entity: "user", id: _ }
        ));

        let result = link_user_to_association(&db, user.id, Uuid::new_v4()).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound { entity: "association", id: _ }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_unlink_removes_admin_role() -> Result<()> {
        let (db, member, association) = setup_with_member().await?;
        admin::assign_admin(&db, member.id, association.id).await?;

        unlink_user_from_association(&db, member.id, association.id).await?;

        assert!(!is_member(&db, member.id, association.id).await?);
        assert!(!admin::is_admin(&db, member.id, association.id).await?);

        Ok(())
    }

    #[tokio::test]
    async fn test_unlink_blocked_by_open_treasurer_term() -> Result<()> {
        let (db, member, association) = setup_with_member().await?;
        treasurer::assign_treasurer(&db, member.id, association.id, date(2024, 1, 1), None)
            .await?;

        let result = unlink_user_from_association(&db, member.id, association.id).await;
        assert!(matches!(result.unwrap_err(), Error::Conflict { message: _ }));

        treasurer::close_treasurer_term(
            &db,
            member.id,
            association.id,
            date(2024, 1, 1),
            date(2024, 6, 1),
        )
        .await?;
        unlink_user_from_association(&db, member.id, association.id).await?;

        let history = treasurer::treasurer_terms(&db, association.id).await?;
        assert_eq!(history.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_unlink_missing_membership_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let result = unlink_user_from_association(&db, Uuid::new_v4(), Uuid::new_v4()).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound { entity: "membership", id: _ }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_member_listings() -> Result<()> {
        let db = setup_test_db().await?;
        let club = create_test_association(&db, "Club").await?;
        let choir = create_test_association(&db, "Choir").await?;
        let bruno = create_test_member(&db, "Bruno", club.id).await?;
        let ana = create_test_member(&db, "Ana", club.id).await?;
        link_user_to_association(&db, ana.id, choir.id).await?;

        let members: Vec<Uuid> = members_of(&db, club.id).await?.into_iter().map(|u| u.id).collect();
        assert_eq!(members, vec![ana.id, bruno.id]);

        let groups: Vec<String> = associations_of_user(&db, ana.id)
            .await?
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(groups, vec!["Choir", "Club"]);

        Ok(())
    }
}
