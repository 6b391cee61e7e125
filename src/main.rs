use association_registry::{
    config::{associations, database},
    core::association::list_associations,
    errors::Result,
};
use dotenvy::dotenv;
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Connect and make sure the schema exists
    if database::get_database_url() == database::DEFAULT_DATABASE_URL {
        std::fs::create_dir_all("data")?;
    }
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 4. Seed associations from the seed file, if there is one
    let seed_path = associations::seed_path();
    if Path::new(&seed_path).exists() {
        let seed = associations::load_config(&seed_path)?;
        associations::seed_associations(&db, &seed)
            .await
            .inspect_err(|e| error!("Failed to seed associations: {}", e))?;
    } else {
        warn!("No seed file at {seed_path}, skipping association seeding.");
    }

    let registered = list_associations(&db).await?;
    info!("Registry ready with {} association(s).", registered.len());
    Ok(())
}
