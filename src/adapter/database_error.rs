use crate::domain::port::RepositoryError;

/// データベース操作で発生するエラー
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),
    #[error("Database query error: {0}")]
    QueryError(String),
    /// 取得した行をドメインモデルに戻せない
    #[error("Database row mapping error: {0}")]
    MappingError(String),
    #[error("Migration error: {0}")]
    MigrationError(String),
}

impl DatabaseError {
    /// sqlx のエラーをクエリ失敗として包む
    pub fn query(context: &str, err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                DatabaseError::ConnectionError(format!("{}: {}", context, err))
            }
            other => DatabaseError::QueryError(format!("{}: {}", context, other)),
        }
    }
}

impl From<DatabaseError> for RepositoryError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::ConnectionError(msg) => RepositoryError::ConnectionFailed(msg),
            DatabaseError::QueryError(msg) | DatabaseError::MigrationError(msg) => {
                RepositoryError::OperationFailed(msg)
            }
            DatabaseError::MappingError(msg) => RepositoryError::FetchFailed(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_to_repository_error() {
        assert_eq!(
            RepositoryError::from(DatabaseError::ConnectionError("down".to_string())),
            RepositoryError::ConnectionFailed("down".to_string())
        );
        assert_eq!(
            RepositoryError::from(DatabaseError::MappingError("bad status".to_string())),
            RepositoryError::FetchFailed("bad status".to_string())
        );
    }

    #[test]
    fn test_pool_timeout_is_connection_error() {
        let err = DatabaseError::query("find booking", sqlx::Error::PoolTimedOut);
        assert!(matches!(err, DatabaseError::ConnectionError(_)));
        let err = DatabaseError::query("find booking", sqlx::Error::RowNotFound);
        assert!(matches!(err, DatabaseError::QueryError(_)));
    }
}
