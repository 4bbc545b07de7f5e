use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{Item, ItemId, UserId};
use crate::domain::port::{ItemCatalog, RepositoryError};
use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, Pool, Row};

/// itemsテーブルを参照するアイテムカタログ
#[derive(Clone)]
pub struct MySqlItemCatalog {
    pool: Pool<MySql>,
}

impl MySqlItemCatalog {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

fn item_from_row(row: &MySqlRow) -> Result<Item, RepositoryError> {
    let mapping = |e: sqlx::Error| RepositoryError::from(DatabaseError::MappingError(e.to_string()));
    Ok(Item::new(
        ItemId::new(row.try_get("id").map_err(mapping)?),
        UserId::new(row.try_get("owner_id").map_err(mapping)?),
        row.try_get("available").map_err(mapping)?,
    ))
}

#[async_trait]
impl ItemCatalog for MySqlItemCatalog {
    async fn exists(&self, item_id: ItemId) -> Result<bool, RepositoryError> {
        let found = sqlx::query("SELECT id FROM items WHERE id = ?")
            .bind(item_id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::query("アイテムの確認に失敗しました", e))?;
        Ok(found.is_some())
    }

    async fn find_by_id(&self, item_id: ItemId) -> Result<Option<Item>, RepositoryError> {
        let row = sqlx::query("SELECT id, owner_id, available FROM items WHERE id = ?")
            .bind(item_id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::query("アイテムの取得に失敗しました", e))?;
        row.as_ref().map(item_from_row).transpose()
    }

    async fn find_excluding_owner(
        &self,
        requester_id: UserId,
        item_id: ItemId,
    ) -> Result<Option<Item>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, owner_id, available
            FROM items
            WHERE id = ? AND owner_id <> ?
            "#,
        )
        .bind(item_id.value())
        .bind(requester_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::query("アイテムの取得に失敗しました", e))?;
        row.as_ref().map(item_from_row).transpose()
    }
}
