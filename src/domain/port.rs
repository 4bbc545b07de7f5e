// 出力ポート
// ドメイン層が外部に依存する機能をトレイトとして定義
// アダプター層でこれらのトレイトを実装する

use crate::domain::model::{
    Booking, BookingId, BookingQuery, BookingStatus, Item, ItemId, NewBooking, UserId,
};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use uuid::Uuid;

/// ログレベル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

/// ロガートレイト
/// ログ出力を抽象化するポート
pub trait Logger: Send + Sync {
    /// 指定レベルでログを出力
    fn log(
        &self,
        level: LogLevel,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );

    /// デバッグレベルのログを出力
    fn debug(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    ) {
        self.log(LogLevel::Debug, component, message, correlation_id, context);
    }

    /// 情報レベルのログを出力
    fn info(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    ) {
        self.log(LogLevel::Info, component, message, correlation_id, context);
    }

    /// 警告レベルのログを出力
    fn warn(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    ) {
        self.log(LogLevel::Warning, component, message, correlation_id, context);
    }

    /// エラーレベルのログを出力
    fn error(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    ) {
        self.log(LogLevel::Error, component, message, correlation_id, context);
    }
}

/// 時計トレイト
/// 時間条件の基準となる「現在時刻」を抽象化する
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// リポジトリエラー型
/// リポジトリ操作で発生するエラーを表現する
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[allow(clippy::enum_variant_names)]
pub enum RepositoryError {
    /// データベース接続に失敗
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    /// 操作に失敗
    #[error("Operation failed: {0}")]
    OperationFailed(String),
    /// データの取得に失敗
    #[error("Fetch failed: {0}")]
    FetchFailed(String),
}

/// 予約リポジトリトレイト
/// 予約の永続化と一覧問い合わせを抽象化する
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// 新しい予約を保存し、採番済みの予約を返す
    ///
    /// # Arguments
    /// * `booking` - 保存する予約
    ///
    /// # Returns
    /// * `Ok(Booking)` - IDが採番された予約
    /// * `Err(RepositoryError)` - 保存失敗
    async fn create(&self, booking: &NewBooking) -> Result<Booking, RepositoryError>;

    /// 予約IDで予約を検索する
    async fn find_by_id(&self, booking_id: BookingId) -> Result<Option<Booking>, RepositoryError>;

    /// 指定ユーザーが所有するアイテムに対する予約をIDで検索する
    ///
    /// # Returns
    /// * `Ok(None)` - 予約が存在しない、または所有者が異なる
    async fn find_by_owner_and_id(
        &self,
        owner_id: UserId,
        booking_id: BookingId,
    ) -> Result<Option<Booking>, RepositoryError>;

    /// 予約ステータスを条件付きで更新する
    /// 現在のステータスが `expected` の場合のみ `next` に書き換える
    ///
    /// # Returns
    /// * `Ok(true)` - 更新した
    /// * `Ok(false)` - ステータスが既に変わっていたため更新しなかった
    async fn update_status(
        &self,
        booking_id: BookingId,
        expected: BookingStatus,
        next: BookingStatus,
    ) -> Result<bool, RepositoryError>;

    /// 問い合わせ条件に一致する予約を取得する
    /// 並び順とページングは `BookingQuery` に従う
    async fn find_by_query(&self, query: &BookingQuery) -> Result<Vec<Booking>, RepositoryError>;

    /// アイテムの直近の予約（now より前に開始した中で最も遅いもの）を取得する
    async fn find_last_for_item(
        &self,
        item_id: ItemId,
        now: NaiveDateTime,
    ) -> Result<Option<Booking>, RepositoryError>;

    /// アイテムの次の予約（now より後に開始する WAITING / APPROVED の中で最も早いもの）を取得する
    async fn find_next_for_item(
        &self,
        item_id: ItemId,
        now: NaiveDateTime,
    ) -> Result<Option<Booking>, RepositoryError>;

    /// 指定ユーザーがアイテムを借り終えた承認済み予約を持つか
    async fn has_completed_booking(
        &self,
        booker_id: UserId,
        item_id: ItemId,
        now: NaiveDateTime,
    ) -> Result<bool, RepositoryError>;
}

/// ユーザーディレクトリトレイト
/// ユーザーの存在確認を提供する外部コラボレーター
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn exists(&self, user_id: UserId) -> Result<bool, RepositoryError>;
}

/// アイテムカタログトレイト
/// アイテムの存在確認・所有者・貸出可否を提供する外部コラボレーター
#[async_trait]
pub trait ItemCatalog: Send + Sync {
    /// アイテムが存在するか
    async fn exists(&self, item_id: ItemId) -> Result<bool, RepositoryError>;

    /// アイテムをIDで取得する
    async fn find_by_id(&self, item_id: ItemId) -> Result<Option<Item>, RepositoryError>;

    /// 要求者が所有者でない場合に限りアイテムを取得する
    ///
    /// # Returns
    /// * `Ok(None)` - アイテムが存在しない、または要求者自身が所有者
    async fn find_excluding_owner(
        &self,
        requester_id: UserId,
        item_id: ItemId,
    ) -> Result<Option<Item>, RepositoryError>;
}
