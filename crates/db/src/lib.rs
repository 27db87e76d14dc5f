use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

pub mod entities;
pub mod models;

pub use sea_orm::{ConnectionTrait, DbErr};

pub type DbPool = DatabaseConnection;

#[derive(Clone)]
pub struct DBService {
    pub pool: DbPool,
}

impl DBService {
    /// Connects to the store behind `database_url` and brings its schema up to date.
    pub async fn new(database_url: &str) -> Result<DBService, DbErr> {
        let mut options = ConnectOptions::new(database_url.to_owned());
        options.sqlx_logging(false);
        // Each in-memory SQLite connection is its own database.
        if database_url.contains(":memory:") {
            options.max_connections(1).min_connections(1);
        }

        let pool = Database::connect(options).await?;
        db_migration::Migrator::up(&pool, None).await?;
        tracing::info!(
            backend = ?pool.get_database_backend(),
            "Issue store connected and migrated"
        );
        Ok(DBService { pool })
    }
}
