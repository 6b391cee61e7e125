/// Seed file of associations loaded from TOML
pub mod associations;

/// Database configuration and connection management
pub mod database;
