use crate::adapter::database_error::DatabaseError;
use crate::domain::model::UserId;
use crate::domain::port::{RepositoryError, UserDirectory};
use async_trait::async_trait;
use sqlx::{MySql, Pool};

/// usersテーブルを参照するユーザーディレクトリ
#[derive(Clone)]
pub struct MySqlUserDirectory {
    pool: Pool<MySql>,
}

impl MySqlUserDirectory {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for MySqlUserDirectory {
    async fn exists(&self, user_id: UserId) -> Result<bool, RepositoryError> {
        let found = sqlx::query("SELECT id FROM users WHERE id = ?")
            .bind(user_id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::query("ユーザーの確認に失敗しました", e))?;
        Ok(found.is_some())
    }
}
