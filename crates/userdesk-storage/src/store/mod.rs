use anyhow::{Context, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection};
use std::path::Path;

pub mod user;

/// Builds a SQLite connection URL for a database file, creating the file on
/// first use.
pub fn sqlite_url(path: &Path) -> String {
    format!("sqlite://{}?mode=rwc", path.display())
}

/// SeaORM-backed access layer for the `users` table.
///
/// Opened once at startup and shared behind an `Arc`; call [`UserStore::close`]
/// during shutdown to drain the connection pool.
pub struct UserStore {
    pub(crate) db: DatabaseConnection,
}

impl UserStore {
    /// Connects to `db_url` and runs pending migrations.
    ///
    /// - `db_url`: full connection URL, e.g. `sqlite:///data/userdesk.db?mode=rwc`
    /// - `data_dir`: created if missing so that file-backed SQLite URLs can be opened
    pub async fn open(db_url: &str, data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("failed to create data dir {}", data_dir.display()))?;
        let db = Database::connect(db_url)
            .await
            .context("failed to connect to database")?;

        // WAL only applies to SQLite
        if db_url.starts_with("sqlite:") {
            db.execute_unprepared("PRAGMA journal_mode=WAL;").await?;
        }

        Migrator::up(&db, None)
            .await
            .context("failed to run database migrations")?;

        tracing::info!("Initialized user store (SeaORM)");
        Ok(Self { db })
    }

    /// Closes the underlying connection pool.
    pub async fn close(&self) -> Result<()> {
        self.db.clone().close().await?;
        tracing::info!("User store closed");
        Ok(())
    }

    pub(crate) fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}
