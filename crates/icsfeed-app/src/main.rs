use clap::Parser;
use icsfeed_app::app::{prepare_destination, serve};
use icsfeed_app::cli::Cli;
use icsfeed_app::logging;
use icsfeed_core::config::{DatabaseBackend, load_config};
use icsfeed_db::db::connection::{create_mysql_pool, create_pg_pool};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter_handle = logging::init();

    tracing::info!("Starting icsfeed");

    let config = load_config(&cli.overrides())?;

    tracing::info!(config = ?config, "Configuration loaded");

    logging::apply_level(&filter_handle, &config.logging.level);

    prepare_destination(&config.feed.destination).await?;

    let pool_size = u32::from(config.database.max_connections);

    match config.database.backend()? {
        DatabaseBackend::Postgres => {
            let pool = create_pg_pool(&config.database.url, pool_size).await?;
            serve(pool, &config).await
        }
        DatabaseBackend::Mysql => {
            let pool = create_mysql_pool(&config.database.url, pool_size).await?;
            serve(pool, &config).await
        }
    }
}
