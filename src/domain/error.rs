/// ドメイン層のエラー型
/// ビジネスルール違反を表現する
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// 無効な予約期間（例: 開始日時が終了日時以降、過去の日時）
    #[error("Invalid booking period: {0}")]
    InvalidPeriod(String),
    /// 無効な予約状態遷移（例: 承認済みの予約を再度承認しようとした）
    #[error("Invalid booking state: {0}")]
    InvalidBookingState(String),
    /// 未知の状態フィルタ名
    #[error("Unknown state: {0}")]
    UnknownState(String),
    /// 無効なページングパラメータ
    #[error("Incorrect page parameters: {0}")]
    InvalidPage(String),
    /// 無効な値
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
