use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m001_create_users"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.get_connection().execute_unprepared(UP_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(DOWN_SQL)
            .await?;
        Ok(())
    }
}

// Length limits (name 120, email 160, role 40) are enforced by the
// application validators; SQLite does not enforce VARCHAR widths.
// The `*_lc` columns hold Unicode-lowercased copies for search: SQLite's
// LIKE and NOCASE only fold ASCII.
const UP_SQL: &str = "
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE COLLATE NOCASE,
    role TEXT NOT NULL DEFAULT 'user',
    name_lc TEXT NOT NULL,
    email_lc TEXT NOT NULL,
    role_lc TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_users_created_at ON users(created_at DESC);
";

const DOWN_SQL: &str = "
DROP INDEX IF EXISTS idx_users_created_at;
DROP TABLE IF EXISTS users;
";
