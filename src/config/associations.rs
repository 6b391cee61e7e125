//! Association seed loading from a TOML file.
//!
//! The associations listed in the seed file are validated and inserted on
//! start-up when their id is not stored yet, so the file can be applied to the
//! same database any number of times.

use crate::{
    core::association::{create_association, get_association},
    core::validation::validate_association,
    errors::{Error, Result},
    models::AssociationCandidate,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Used when `ASSOCIATIONS_CONFIG` is not set.
pub const DEFAULT_SEED_PATH: &str = "config.toml";

/// Configuration structure representing the entire seed file
#[derive(Debug, Default, Deserialize)]
pub struct SeedConfig {
    /// Associations to make sure exist
    #[serde(default)]
    pub associations: Vec<AssociationCandidate>,
}

/// Loads the seed configuration from a TOML file
///
/// # Errors
/// Returns `Error::Config` if the file cannot be read or is not valid TOML.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SeedConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read {}: {e}", path.as_ref().display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path.as_ref().display()),
    })
}

/// Path of the seed file, from `ASSOCIATIONS_CONFIG` or the default.
#[must_use]
pub fn seed_path() -> String {
    std::env::var("ASSOCIATIONS_CONFIG").unwrap_or_else(|_| DEFAULT_SEED_PATH.to_string())
}

/// Inserts every configured association whose id is not stored yet.
///
/// All entries are validated before anything is written. Returns how many
/// associations were inserted.
pub async fn seed_associations(db: &DatabaseConnection, config: &SeedConfig) -> Result<usize> {
    info!(
        "Seeding associations. Found {} entries in the seed file.",
        config.associations.len()
    );

    let validated = config
        .associations
        .iter()
        .map(validate_association)
        .collect::<Result<Vec<_>>>()?;

    let mut inserted = 0;
    for (candidate, valid) in config.associations.iter().zip(&validated) {
        if get_association(db, valid.id).await?.is_some() {
            debug!(association_id = %valid.id, "association already stored, skipping");
            continue;
        }
        create_association(db, candidate).await?;
        inserted += 1;
    }

    info!("Seeded {inserted} new association(s).");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::association::list_associations;
    use crate::test_utils::setup_test_db;

    const SEED: &str = r#"
        [[associations]]
        id = "0b7a4c1d-8f3e-4a2b-b6c5-d4e3f2a1b0c9"
        name = "Vila Nova Residents"
        neighborhood = "Vila Nova"
        country = "Brazil"
        state = "SP"
        address = "Praça Central 1"

        [[associations]]
        id = "3d2c1b0a-9f8e-4d7c-a6b5-c4d3e2f1a0b9"
        name = "Centro Craft Guild"
        neighborhood = "Centro"
        country = "Brazil"
        state = "SP"
        address = "Rua do Comércio 40"
        identity = "CNPJ 11.222.333/0001-44"
    "#;

    #[test]
    fn test_parse_seed_config() {
        let config: SeedConfig = toml::from_str(SEED).unwrap();
        assert_eq!(config.associations.len(), 2);
        assert_eq!(
            config.associations[0].name.as_deref(),
            Some("Vila Nova Residents")
        );
        assert!(config.associations[0].identity.is_none());
        assert_eq!(
            config.associations[1].identity.as_deref(),
            Some("CNPJ 11.222.333/0001-44")
        );
    }

    #[test]
    fn test_empty_seed_config() {
        let config: SeedConfig = toml::from_str("").unwrap();
        assert!(config.associations.is_empty());
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let result = load_config("does/not/exist.toml");
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));
    }

    #[tokio::test]
    async fn test_seed_is_repeatable() -> Result<()> {
        let db = setup_test_db().await?;
        let config: SeedConfig = toml::from_str(SEED).unwrap();

        assert_eq!(seed_associations(&db, &config).await?, 2);
        assert_eq!(seed_associations(&db, &config).await?, 0);
        assert_eq!(list_associations(&db).await?.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_rejects_invalid_entry_before_writing() -> Result<()> {
        let db = setup_test_db().await?;
        let mut config: SeedConfig = toml::from_str(SEED).unwrap();
        config.associations[1].country = None;

        let result = seed_associations(&db, &config).await;
        assert!(matches!(result.unwrap_err(), Error::Validation { issues: _ }));
        assert!(list_associations(&db).await?.is_empty());

        Ok(())
    }
}
