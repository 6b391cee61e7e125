//! Domain records and the form-shaped candidates they are validated from.
//!
//! A candidate mirrors what a form or JSON payload submits: every field is an
//! optional string so that missing and malformed input can be reported field by
//! field. Validation turns a candidate into a [`User`] or [`Association`], which
//! carry only well-typed values.

use crate::entities::{association, user};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A validated user record, as submitted and as stored (minus timestamps).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    /// Full name
    pub name: String,
    /// Date of birth
    pub birthday: NaiveDate,
    /// Postal address
    pub address: String,
    /// Occupation or trade
    pub activity: Option<String>,
    /// Contact e-mail
    pub email: Option<String>,
    /// Personal phone number
    pub personal_phone: Option<String>,
    /// Work phone number
    pub commercial_phone: Option<String>,
    /// Whether the personal phone is reachable on WhatsApp
    pub uses_whatsapp: bool,
    /// Identity document numbers
    pub identities: Option<String>,
    /// Link to a profile picture
    pub profile_url: Option<String>,
}

/// A validated association record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Neighborhood served
    pub neighborhood: String,
    /// Country
    pub country: String,
    /// State or province
    pub state: String,
    /// Postal address
    pub address: String,
    /// Registration number
    pub identity: Option<String>,
}

/// Unvalidated user input. Also used as a patch by `update_user`, where an
/// absent field keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserCandidate {
    /// Unique identifier, as submitted
    pub id: Option<String>,
    /// Full name, as submitted
    pub name: Option<String>,
    /// ISO-8601 date, `YYYY-MM-DD`
    pub birthday: Option<String>,
    /// Postal address, as submitted
    pub address: Option<String>,
    /// Occupation or trade, as submitted
    pub activity: Option<String>,
    /// Contact e-mail, as submitted
    pub email: Option<String>,
    /// Personal phone number, as submitted
    pub personal_phone: Option<String>,
    /// Work phone number, as submitted
    pub commercial_phone: Option<String>,
    /// `"true"` or `"false"`
    pub uses_whatsapp: Option<String>,
    /// Identity document numbers, as submitted
    pub identities: Option<String>,
    /// Link to a profile picture, as submitted
    pub profile_url: Option<String>,
}

/// Unvalidated association input. Also used as a patch by `update_association`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssociationCandidate {
    /// Unique identifier, as submitted
    pub id: Option<String>,
    /// Display name, as submitted
    pub name: Option<String>,
    /// Neighborhood served, as submitted
    pub neighborhood: Option<String>,
    /// Country, as submitted
    pub country: Option<String>,
    /// State or province, as submitted
    pub state: Option<String>,
    /// Postal address, as submitted
    pub address: Option<String>,
    /// Registration number, as submitted
    pub identity: Option<String>,
}

impl UserCandidate {
    /// Overlays every field present in `patch` on top of `self`.
    #[must_use]
    pub fn merged_with(self, patch: Self) -> Self {
        Self {
            id: patch.id.or(self.id),
            name: patch.name.or(self.name),
            birthday: patch.birthday.or(self.birthday),
            address: patch.address.or(self.address),
            activity: patch.activity.or(self.activity),
            email: patch.email.or(self.email),
            personal_phone: patch.personal_phone.or(self.personal_phone),
            commercial_phone: patch.commercial_phone.or(self.commercial_phone),
            uses_whatsapp: patch.uses_whatsapp.or(self.uses_whatsapp),
            identities: patch.identities.or(self.identities),
            profile_url: patch.profile_url.or(self.profile_url),
        }
    }
}

impl AssociationCandidate {
    /// Overlays every field present in `patch` on top of `self`.
    #[must_use]
    pub fn merged_with(self, patch: Self) -> Self {
        Self {
            id: patch.id.or(self.id),
            name: patch.name.or(self.name),
            neighborhood: patch.neighborhood.or(self.neighborhood),
            country: patch.country.or(self.country),
            state: patch.state.or(self.state),
            address: patch.address.or(self.address),
            identity: patch.identity.or(self.identity),
        }
    }
}

impl From<&User> for UserCandidate {
    fn from(user: &User) -> Self {
        Self {
            id: Some(user.id.to_string()),
            name: Some(user.name.clone()),
            birthday: Some(user.birthday.format("%Y-%m-%d").to_string()),
            address: Some(user.address.clone()),
            activity: user.activity.clone(),
            email: user.email.clone(),
            personal_phone: user.personal_phone.clone(),
            commercial_phone: user.commercial_phone.clone(),
            uses_whatsapp: Some(user.uses_whatsapp.to_string()),
            identities: user.identities.clone(),
            profile_url: user.profile_url.clone(),
        }
    }
}

impl From<&Association> for AssociationCandidate {
    fn from(association: &Association) -> Self {
        Self {
            id: Some(association.id.to_string()),
            name: Some(association.name.clone()),
            neighborhood: Some(association.neighborhood.clone()),
            country: Some(association.country.clone()),
            state: Some(association.state.clone()),
            address: Some(association.address.clone()),
            identity: association.identity.clone(),
        }
    }
}

impl From<user::Model> for User {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            birthday: model.birthday,
            address: model.address,
            activity: model.activity,
            email: model.email,
            personal_phone: model.personal_phone,
            commercial_phone: model.commercial_phone,
            uses_whatsapp: model.uses_whatsapp,
            identities: model.identities,
            profile_url: model.profile_url,
        }
    }
}

impl From<association::Model> for Association {
    fn from(model: association::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            neighborhood: model.neighborhood,
            country: model.country,
            state: model.state,
            address: model.address,
            identity: model.identity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_overrides_only_present_fields() {
        let base = AssociationCandidate {
            id: Some("a".to_string()),
            name: Some("Old".to_string()),
            country: Some("BR".to_string()),
            ..Default::default()
        };
        let patch = AssociationCandidate {
            name: Some("New".to_string()),
            ..Default::default()
        };

        let merged = base.merged_with(patch);
        assert_eq!(merged.id.as_deref(), Some("a"));
        assert_eq!(merged.name.as_deref(), Some("New"));
        assert_eq!(merged.country.as_deref(), Some("BR"));
    }

    #[test]
    fn test_candidate_deserializes_with_missing_fields() -> Result<(), toml::de::Error> {
        let candidate: UserCandidate = toml::from_str(r#"name = "Ana""#)?;
        assert_eq!(candidate.name.as_deref(), Some("Ana"));
        assert!(candidate.id.is_none());
        assert!(candidate.uses_whatsapp.is_none());
        Ok(())
    }
}
