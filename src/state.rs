use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::config::Config;
use crate::entity::schema;
use crate::services::SessionCodec;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Config,
    /// Signs and reads session cookies
    pub sessions: SessionCodec,
}

impl AppState {
    /// Create a new AppState by connecting to the database and creating missing tables
    pub async fn new(config: Config) -> Result<Self, AppStateError> {
        let mut opt = ConnectOptions::new(&config.database_url);
        opt.max_connections(config.database_max_connections)
            .min_connections(1)
            .sqlx_logging(true);

        let db = Database::connect(opt)
            .await
            .map_err(|e| AppStateError::Database(e.to_string()))?;

        schema::create_tables(&db)
            .await
            .map_err(|e| AppStateError::Schema(e.to_string()))?;

        Ok(Self::with_connection(db, config))
    }

    /// Build state around an existing connection
    pub fn with_connection(db: DatabaseConnection, config: Config) -> Self {
        let sessions = SessionCodec::new(&config);
        Self {
            db,
            config,
            sessions,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error("Database connection error: {0}")]
    Database(String),

    #[error("Schema setup error: {0}")]
    Schema(String),
}
