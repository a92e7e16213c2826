use mimalloc::MiMalloc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = db_bootstrap::config::Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.database_url,
        scripts = ?cfg.script_locations,
        resource_dir = %cfg.resource_dir.display(),
        continue_on_error = cfg.continue_on_error,
        ignore_failed_drops = cfg.ignore_failed_drops,
        loglevel = %cfg.loglevel
    );

    let pool = db_bootstrap::db::connect_with(&cfg).await?;
    let bootstrapper = db_bootstrap::DatabaseBootstrapper::from_config(&cfg);

    // Startup does not proceed until the scripts have run.
    if let Err(e) = bootstrapper.initialize(&pool) {
        error!(error = %e, "database initialization failed; aborting startup");
        pool.close().await;
        return Err(e.into());
    }

    pool.close().await;
    info!("startup complete");
    Ok(())
}
