use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fittrack::config::Config;
use fittrack::migrations::{self, TABLES};
use fittrack::version::GIT_VERSION;
use fittrack::{db, error};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fittrack=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env();

    tracing::info!("fittrack {}", GIT_VERSION);
    tracing::info!("Connecting to database: {}", config.database_url);

    let pool = db::create_pool(&config.database_url, config.max_connections)?;

    migrations::run_migrations(&pool)?;

    report_row_counts(&pool)?;

    Ok(())
}

fn report_row_counts(pool: &db::DbPool) -> error::Result<()> {
    let conn = pool.get()?;
    for table in TABLES {
        let count: i64 =
            conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        tracing::info!(table, rows = count, "Table ready");
    }
    Ok(())
}
