use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::database::memory::MemoryPersonRepository;
use crate::database::postgres::PgPersonRepository;
use crate::database::repository::PersonRepository;

const CREATE_PEOPLE: &str = r#"
    CREATE TABLE IF NOT EXISTS people (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(200) NOT NULL,
        surname VARCHAR(200) NOT NULL,
        age BIGINT NOT NULL,
        email VARCHAR(200) NOT NULL,
        telephone VARCHAR(200) NOT NULL
    )
"#;

const CREATE_EMAIL_INDEX: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_people_email ON people (email)";

/// Builds the configured person store.
pub struct DatabaseManager;

impl DatabaseManager {
    /// Postgres when a URL is configured, the memory store otherwise.
    pub async fn open(config: &DatabaseConfig) -> Result<Arc<dyn PersonRepository>, sqlx::Error> {
        match &config.url {
            Some(url) => {
                let pool = Self::connect(url, config).await?;
                Self::ensure_schema(&pool).await?;
                Ok(Arc::new(PgPersonRepository::new(pool)))
            }
            None => {
                warn!("DATABASE_URL is not set; persons are kept in memory and lost on exit");
                Ok(Arc::new(MemoryPersonRepository::new()))
            }
        }
    }

    pub async fn connect(url: &str, config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_secs))
            .connect(url)
            .await?;
        info!("Database connection established");
        Ok(pool)
    }

    pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::query(CREATE_PEOPLE).execute(pool).await?;
        sqlx::query(CREATE_EMAIL_INDEX).execute(pool).await?;
        info!("Table people is ready");
        Ok(())
    }
}
