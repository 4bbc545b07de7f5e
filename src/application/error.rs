use crate::domain::error::DomainError;
use crate::domain::port::RepositoryError;

/// アプリケーション層のエラー型
/// 呼び出し側が区別すべき種類（不正リクエスト・未検出・権限なし）と
/// 下位層の失敗をラップする
#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    /// ドメインエラー（ビジネスルール違反）
    #[error("Domain error: {0}")]
    DomainError(#[from] DomainError),
    /// リポジトリエラー（永続化の失敗）
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
    /// エンティティが見つからない、または呼び出し元から見えない
    #[error("Not found: {0}")]
    NotFound(String),
    /// 操作が許可されていない
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
}

impl ApplicationError {
    /// 不正リクエストとして扱うべきか
    pub fn is_bad_request(&self) -> bool {
        matches!(self, ApplicationError::DomainError(_))
    }
}
