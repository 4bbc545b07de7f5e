use crate::adapter::database_error::DatabaseError;
use sqlx::{MySql, Pool};

const MIGRATIONS: [(&str, &str); 3] = [
    (
        "001_create_users_table",
        include_str!("../../migrations/001_create_users_table.sql"),
    ),
    (
        "002_create_items_table",
        include_str!("../../migrations/002_create_items_table.sql"),
    ),
    (
        "003_create_bookings_table",
        include_str!("../../migrations/003_create_bookings_table.sql"),
    ),
];

/// スキーマの作成を担当する
/// 各スクリプトは CREATE TABLE IF NOT EXISTS なので繰り返し実行できる
pub struct DatabaseMigration {
    pool: Pool<MySql>,
}

impl DatabaseMigration {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    pub async fn run(&self) -> Result<(), DatabaseError> {
        for (name, sql) in MIGRATIONS {
            tracing::info!(migration = name, "running migration");
            sqlx::query(sql)
                .execute(&self.pool)
                .await
                .map_err(|e| DatabaseError::MigrationError(format!("{} failed: {}", name, e)))?;
        }
        tracing::info!(count = MIGRATIONS.len(), "all migrations completed");
        Ok(())
    }
}
