// init.rs

use deadpool_postgres::{Config, ManagerConfig, Pool, RecyclingMethod, Runtime};
use dotenv::dotenv;
use std::env;
use thiserror::Error;
use tokio_postgres::{Config as PgConfig, NoTls};
use tracing::info;

use crate::database::migrations::apply_migrations;

/// Errors raised while bringing up the database layer.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Failed to parse DATABASE_URL: {0}")]
    ParseError(String),

    #[error("Failed to create pool: {0}")]
    PoolCreationError(String),

    #[error("Migration error: {0}")]
    MigrationError(String),
}

fn load_database_url() -> Result<String, DbError> {
    dotenv().ok();
    env::var("DATABASE_URL").map_err(|_| DbError::EnvVarNotFound("DATABASE_URL".to_string()))
}

/// Builds the deadpool configuration out of a postgres connection string.
fn create_pool(database_url: &str) -> Result<Pool, DbError> {
    let pg_config = database_url
        .parse::<PgConfig>()
        .map_err(|e| DbError::ParseError(e.to_string()))?;

    let mut cfg = Config::new();
    cfg.user = pg_config.get_user().map(ToString::to_string);
    cfg.password = pg_config
        .get_password()
        .map(|s| String::from_utf8(s.to_vec()))
        .transpose()
        .map_err(|e| DbError::ParseError(e.to_string()))?;
    cfg.dbname = pg_config.get_dbname().map(ToString::to_string);
    cfg.host = pg_config.get_hosts().first().and_then(|host| match host {
        tokio_postgres::config::Host::Tcp(host) => Some(host.to_string()),
        _ => None,
    });
    cfg.port = pg_config.get_ports().first().copied();
    cfg.manager = Some(ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    });

    cfg.create_pool(Some(Runtime::Tokio1), NoTls)
        .map_err(|e| DbError::PoolCreationError(e.to_string()))
}

/// Initializes the connection pool and applies the chat schema.
pub async fn init_db() -> Result<Pool, DbError> {
    let database_url = load_database_url()?;
    let pool = create_pool(&database_url)?;

    let client = pool
        .get()
        .await
        .map_err(|e| DbError::MigrationError(e.to_string()))?;

    apply_migrations(&client)
        .await
        .map_err(DbError::MigrationError)?;

    info!("database pool initialized and chat schema applied");
    Ok(pool)
}
