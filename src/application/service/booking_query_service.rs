use super::{ensure_user_exists, log_context};
use crate::application::ApplicationError;
use crate::domain::model::{
    Booking, BookingId, BookingQuery, BookingScope, BookingState, ItemId, PageRequest, UserId,
};
use crate::domain::port::{BookingRepository, Clock, ItemCatalog, Logger, UserDirectory};
use std::sync::Arc;
use uuid::Uuid;

const COMPONENT: &str = "BookingQueryService";

/// 予約クエリサービス
/// 読み取り専用の予約操作を提供する
pub struct BookingQueryService {
    booking_repository: Arc<dyn BookingRepository>,
    user_directory: Arc<dyn UserDirectory>,
    item_catalog: Arc<dyn ItemCatalog>,
    clock: Arc<dyn Clock>,
    logger: Arc<dyn Logger>,
}

impl BookingQueryService {
    /// 新しい予約クエリサービスを作成
    pub fn new(
        booking_repository: Arc<dyn BookingRepository>,
        user_directory: Arc<dyn UserDirectory>,
        item_catalog: Arc<dyn ItemCatalog>,
        clock: Arc<dyn Clock>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            booking_repository,
            user_directory,
            item_catalog,
            clock,
            logger,
        }
    }

    /// 予約IDで予約を取得
    /// 借り手とアイテム所有者以外には存在しないものとして扱う
    ///
    /// # Returns
    /// * `Ok(Booking)` - 閲覧可能な予約
    /// * `Err(ApplicationError::NotFound)` - 予約が存在しない、または閲覧権限がない
    pub async fn get_booking_by_id(
        &self,
        user_id: UserId,
        booking_id: BookingId,
    ) -> Result<Booking, ApplicationError> {
        self.logger.debug(
            COMPONENT,
            "Request for get booking",
            None,
            log_context(&[
                ("user_id", user_id.to_string()),
                ("booking_id", booking_id.to_string()),
            ]),
        );

        ensure_user_exists(self.user_directory.as_ref(), user_id).await?;

        self.booking_repository
            .find_by_id(booking_id)
            .await?
            .filter(|booking| booking.is_visible_to(user_id))
            .ok_or_else(|| {
                ApplicationError::NotFound(format!("Booking with id {} not found", booking_id))
            })
    }

    /// 借り手として行った予約を状態フィルタで取得
    ///
    /// # Arguments
    /// * `user_id` - 借り手のユーザーID
    /// * `state` - 状態フィルタ名（未指定・空はALL）
    /// * `from` - 0始まりのオフセット（ページ境界に切り捨て）
    /// * `size` - ページサイズ
    pub async fn list_by_state(
        &self,
        user_id: UserId,
        state: Option<&str>,
        from: Option<i64>,
        size: Option<i64>,
    ) -> Result<Vec<Booking>, ApplicationError> {
        self.list(BookingScope::Booker(user_id), user_id, state, from, size)
            .await
    }

    /// 所有するアイテムに対する予約を状態フィルタで取得
    pub async fn list_by_owner_and_state(
        &self,
        owner_id: UserId,
        state: Option<&str>,
        from: Option<i64>,
        size: Option<i64>,
    ) -> Result<Vec<Booking>, ApplicationError> {
        self.list(BookingScope::Owner(owner_id), owner_id, state, from, size)
            .await
    }

    async fn list(
        &self,
        scope: BookingScope,
        user_id: UserId,
        state: Option<&str>,
        from: Option<i64>,
        size: Option<i64>,
    ) -> Result<Vec<Booking>, ApplicationError> {
        let correlation_id = Uuid::new_v4();
        self.logger.info(
            COMPONENT,
            "Request for get bookings by state",
            Some(correlation_id),
            log_context(&[
                ("scope", format!("{:?}", scope)),
                ("state", state.unwrap_or("").to_string()),
                ("from", format!("{:?}", from)),
                ("size", format!("{:?}", size)),
            ]),
        );

        ensure_user_exists(self.user_directory.as_ref(), user_id).await?;

        let parsed = BookingState::parse(state)
            .and_then(|state| PageRequest::from_offset(from, size).map(|page| (state, page)));
        let (state, page) = parsed.map_err(|e| {
            self.logger.warn(
                COMPONENT,
                "Rejected booking list request",
                Some(correlation_id),
                log_context(&[("reason", e.to_string())]),
            );
            e
        })?;

        // 基準時刻はリクエストごとに一度だけ取得する
        let query = BookingQuery::new(scope, state, page, self.clock.now());
        let bookings = self.booking_repository.find_by_query(&query).await?;

        self.logger.debug(
            COMPONENT,
            "Bookings fetched",
            Some(correlation_id),
            log_context(&[("count", bookings.len().to_string())]),
        );
        Ok(bookings)
    }

    /// アイテムの直近の予約を取得（所有者のみ）
    pub async fn last_booking_for_item(
        &self,
        owner_id: UserId,
        item_id: ItemId,
    ) -> Result<Option<Booking>, ApplicationError> {
        self.ensure_item_owner(owner_id, item_id).await?;
        Ok(self
            .booking_repository
            .find_last_for_item(item_id, self.clock.now())
            .await?)
    }

    /// アイテムの次の予約を取得（所有者のみ）
    pub async fn next_booking_for_item(
        &self,
        owner_id: UserId,
        item_id: ItemId,
    ) -> Result<Option<Booking>, ApplicationError> {
        self.ensure_item_owner(owner_id, item_id).await?;
        Ok(self
            .booking_repository
            .find_next_for_item(item_id, self.clock.now())
            .await?)
    }

    /// ユーザーがアイテムにコメントできるか確認する
    /// 承認済みで終了した予約を持つ借り手のみ許可する
    pub async fn ensure_can_comment(
        &self,
        user_id: UserId,
        item_id: ItemId,
    ) -> Result<(), ApplicationError> {
        ensure_user_exists(self.user_directory.as_ref(), user_id).await?;
        if !self.item_catalog.exists(item_id).await? {
            return Err(ApplicationError::NotFound(format!(
                "Item with id {} not found",
                item_id
            )));
        }

        let completed = self
            .booking_repository
            .has_completed_booking(user_id, item_id, self.clock.now())
            .await?;
        if !completed {
            self.logger.warn(
                COMPONENT,
                "Comment attempt without completed booking",
                None,
                log_context(&[
                    ("user_id", user_id.to_string()),
                    ("item_id", item_id.to_string()),
                ]),
            );
            return Err(ApplicationError::PermissionDenied(
                "You have no access to this operation".to_string(),
            ));
        }
        Ok(())
    }

    async fn ensure_item_owner(
        &self,
        owner_id: UserId,
        item_id: ItemId,
    ) -> Result<(), ApplicationError> {
        ensure_user_exists(self.user_directory.as_ref(), owner_id).await?;
        match self.item_catalog.find_by_id(item_id).await? {
            Some(item) if item.is_owned_by(owner_id) => Ok(()),
            _ => Err(ApplicationError::NotFound(format!(
                "Item with id {} not found",
                item_id
            ))),
        }
    }
}
