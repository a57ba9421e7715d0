use std::time::Duration;

use infdb_core::{AppConfig, IdentifierError, StoreTarget};
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use thiserror::Error;

const DEFAULT_MAX_CONNECTIONS: u32 = 3;
const DEFAULT_MIN_CONNECTIONS: u32 = 1;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 60;

// Path relative to crates/infdb-db/Cargo.toml; resolves to <workspace-root>/migrations/
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_connections: config.db_max_connections,
            min_connections: config.db_min_connections,
            acquire_timeout_secs: config.db_acquire_timeout_secs,
        }
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error(transparent)]
    InvalidIdentifier(#[from] IdentifierError),
}

/// Build connection options from either a URL or discrete credentials.
///
/// # Errors
///
/// Returns [`sqlx::Error::Configuration`] if the URL cannot be parsed.
pub fn connect_options(target: &StoreTarget) -> Result<PgConnectOptions, sqlx::Error> {
    match target {
        StoreTarget::Url(url) => url.parse::<PgConnectOptions>(),
        StoreTarget::Parts {
            host,
            port,
            database,
            user,
            password,
        } => Ok(PgConnectOptions::new()
            .host(host)
            .port(*port)
            .database(database)
            .username(user)
            .password(password)),
    }
}

/// Connect a Postgres pool for the given store target.
///
/// Acquisition blocks while the pool is exhausted, up to the configured
/// timeout, after which the call fails with [`sqlx::Error::PoolTimedOut`].
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the connection cannot be established.
pub async fn connect_pool(target: &StoreTarget, config: PoolConfig) -> Result<PgPool, sqlx::Error> {
    let options = connect_options(target)?;
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_with(options)
        .await
}

/// Run all pending migrations against the pool.
///
/// # Errors
///
/// Returns [`sqlx::migrate::MigrateError`] if any migration fails.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Send a `SELECT 1` to verify the pool has a live connection.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await?;
    Ok(())
}

/// Run a full health check: ping the pool and return a typed error on failure.
///
/// # Errors
///
/// Returns [`DbError`] if the ping fails.
pub async fn health_check(pool: &PgPool) -> Result<(), DbError> {
    ping(pool).await?;
    Ok(())
}

/// Collapse a store failure into `T::default()` after logging it.
///
/// Reads degrade to an empty result and writes to `false`, so callers see the
/// same shape whether the store had no data or failed.
pub fn or_default<T: Default>(operation: &'static str, result: Result<T, DbError>) -> T {
    result.unwrap_or_else(|error| {
        tracing::error!(operation, error = %error, "store operation failed; returning default");
        T::default()
    })
}


pub mod accounts;
pub mod brand_deals;
pub mod companies;
pub mod influencers;
pub mod posts;
pub mod reports;
pub mod schema;

pub use accounts::{insert_account, list_accounts, AccountRow, NewAccount};
pub use brand_deals::{list_brand_deals, update_brand_deal, BrandDealRow, BrandDealUpdate};
pub use companies::{list_companies, CompanyRow};
pub use influencers::{
    delete_influencer, filter_influencers, list_influencers, DeleteOutcome, InfluencerRow,
};
pub use posts::{list_posts, PostRow};
pub use reports::{
    all_platform_influencers, category_engagement, deal_costs, platform_average_age,
    top_deal_accounts, AllPlatformInfluencerRow, CategoryEngagementRow, DealCostRow,
    PlatformAgeRow, TopDealAccountRow,
};
pub use schema::{fetch_projection, list_table_columns, list_table_names, ProjectionRows};
