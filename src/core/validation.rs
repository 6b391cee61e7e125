//! Record validation - turns form-shaped candidates into typed records.
//!
//! Validation never stops at the first problem: every missing or malformed field
//! is collected so the caller can report them all at once. Required text fields
//! are trimmed; optional text fields that are blank are treated as absent.

use crate::{
    errors::{Error, FieldIssue, Result},
    models::{Association, AssociationCandidate, User, UserCandidate},
};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

/// Date format accepted for every date field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Compiled once from a constant pattern, so it cannot fail at runtime.
#[allow(clippy::expect_used)]
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("invalid email regex")
});

#[allow(clippy::expect_used)]
static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s/$.?#][^\s]*$").expect("invalid url regex"));

/// Collects field issues while a candidate is being checked.
#[derive(Debug, Default)]
struct Checker {
    issues: Vec<FieldIssue>,
}

impl Checker {
    fn required_text(&mut self, field: &'static str, value: Option<&String>) -> Option<String> {
        match value.map(|v| v.trim()) {
            Some(v) if !v.is_empty() => Some(v.to_string()),
            _ => {
                self.issues.push(FieldIssue::missing(field));
                None
            }
        }
    }

    fn required_uuid(&mut self, field: &'static str, value: Option<&String>) -> Option<Uuid> {
        let raw = self.required_text(field, value)?;
        match parse_uuid(field, &raw) {
            Ok(id) => Some(id),
            Err(issue) => {
                self.issues.push(issue);
                None
            }
        }
    }

    fn required_date(&mut self, field: &'static str, value: Option<&String>) -> Option<NaiveDate> {
        let raw = self.required_text(field, value)?;
        match parse_date(field, &raw) {
            Ok(date) => Some(date),
            Err(issue) => {
                self.issues.push(issue);
                None
            }
        }
    }

    fn required_flag(&mut self, field: &'static str, value: Option<&String>) -> Option<bool> {
        let raw = self.required_text(field, value)?;
        match raw.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            other => {
                self.issues.push(FieldIssue::malformed(
                    field,
                    format!("must be true or false, got {other:?}"),
                ));
                None
            }
        }
    }

    fn optional_matching(
        &mut self,
        field: &'static str,
        value: Option<&String>,
        pattern: &Regex,
        reason: &str,
    ) -> Option<String> {
        let value = optional_text(value)?;
        if pattern.is_match(&value) {
            Some(value)
        } else {
            self.issues.push(FieldIssue::malformed(field, reason));
            None
        }
    }

    fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> Result<T> {
        if !self.issues.is_empty() {
            return Err(Error::Validation {
                issues: self.issues,
            });
        }
        // With no issues recorded every required field was produced.
        build().ok_or_else(|| Error::Validation { issues: Vec::new() })
    }
}

fn optional_text(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

fn parse_uuid(field: &'static str, raw: &str) -> std::result::Result<Uuid, FieldIssue> {
    Uuid::parse_str(raw).map_err(|_| FieldIssue::malformed(field, "is not a valid UUID"))
}

/// Parses a `YYYY-MM-DD` date, reporting the failure against `field`.
pub fn parse_date(field: &'static str, raw: &str) -> std::result::Result<NaiveDate, FieldIssue> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| FieldIssue::malformed(field, "must be a date formatted YYYY-MM-DD"))
}

/// Validates a user candidate.
///
/// Required: `id`, `name`, `birthday`, `address`, `uses_whatsapp`. Optional
/// `email` and `profile_url` are checked for shape when present.
///
/// # Errors
/// Returns `Error::Validation` listing every missing or malformed field.
pub fn validate_user(candidate: &UserCandidate) -> Result<User> {
    let mut check = Checker::default();

    let id = check.required_uuid("id", candidate.id.as_ref());
    let name = check.required_text("name", candidate.name.as_ref());
    let birthday = check.required_date("birthday", candidate.birthday.as_ref());
    let address = check.required_text("address", candidate.address.as_ref());
    let uses_whatsapp = check.required_flag("uses_whatsapp", candidate.uses_whatsapp.as_ref());
    let email = check.optional_matching(
        "email",
        candidate.email.as_ref(),
        &EMAIL_RE,
        "is not a valid email address",
    );
    let profile_url = check.optional_matching(
        "profile_url",
        candidate.profile_url.as_ref(),
        &URL_RE,
        "must be an http(s) URL",
    );

    check.finish(|| {
        Some(User {
            id: id?,
            name: name?,
            birthday: birthday?,
            address: address?,
            activity: optional_text(candidate.activity.as_ref()),
            email,
            personal_phone: optional_text(candidate.personal_phone.as_ref()),
            commercial_phone: optional_text(candidate.commercial_phone.as_ref()),
            uses_whatsapp: uses_whatsapp?,
            identities: optional_text(candidate.identities.as_ref()),
            profile_url,
        })
    })
}

/// Validates an association candidate.
///
/// Required: `id`, `name`, `neighborhood`, `country`, `state`, `address`.
///
/// # Errors
/// Returns `Error::Validation` listing every missing or malformed field.
pub fn validate_association(candidate: &AssociationCandidate) -> Result<Association> {
    let mut check = Checker::default();

    let id = check.required_uuid("id", candidate.id.as_ref());
    let name = check.required_text("name", candidate.name.as_ref());
    let neighborhood = check.required_text("neighborhood", candidate.neighborhood.as_ref());
    let country = check.required_text("country", candidate.country.as_ref());
    let state = check.required_text("state", candidate.state.as_ref());
    let address = check.required_text("address", candidate.address.as_ref());

    check.finish(|| {
        Some(Association {
            id: id?,
            name: name?,
            neighborhood: neighborhood?,
            country: country?,
            state: state?,
            address: address?,
            identity: optional_text(candidate.identity.as_ref()),
        })
    })
}
