use crate::application::ApplicationError;
use crate::domain::model::{Booking, BookingId, BookingPeriod, ItemId, NewBooking, UserId};
use crate::domain::port::{BookingRepository, Clock, ItemCatalog, Logger, UserDirectory};
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

mod booking_query_service;
#[cfg(test)]
pub(crate) mod test_support;

pub use booking_query_service::BookingQueryService;

const COMPONENT: &str = "BookingApplicationService";

/// ユーザーが存在することを確認する
pub(crate) async fn ensure_user_exists(
    user_directory: &dyn UserDirectory,
    user_id: UserId,
) -> Result<(), ApplicationError> {
    if !user_directory.exists(user_id).await? {
        return Err(ApplicationError::NotFound(format!(
            "User with id {} not found",
            user_id
        )));
    }
    Ok(())
}

/// ログ用のコンテキストを組み立てるヘルパー関数
pub(crate) fn log_context(pairs: &[(&str, String)]) -> Option<HashMap<String, String>> {
    Some(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect(),
    )
}

/// 予約アプリケーションサービス
/// 予約の作成と、所有者による承認・却下を担当する
pub struct BookingApplicationService {
    booking_repository: Arc<dyn BookingRepository>,
    user_directory: Arc<dyn UserDirectory>,
    item_catalog: Arc<dyn ItemCatalog>,
    clock: Arc<dyn Clock>,
    logger: Arc<dyn Logger>,
}

impl BookingApplicationService {
    /// 新しいアプリケーションサービスを作成
    ///
    /// # Arguments
    /// * `booking_repository` - 予約リポジトリ
    /// * `user_directory` - ユーザーの存在確認
    /// * `item_catalog` - アイテムの存在・所有者・貸出可否の確認
    /// * `clock` - 現在時刻
    /// * `logger` - ロガー
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

    /// 新しい予約を作成
    ///
    /// 検証順序:
    /// 1. 期間（未指定・長さ0・逆転・過去はBadRequest）
    /// 2. 借り手の存在
    /// 3. アイテムの存在
    /// 4. 借り手以外が所有するアイテムであること、貸出可能であること
    ///
    /// # Arguments
    /// * `booker_id` - 借り手のユーザーID
    /// * `item_id` - アイテムID
    /// * `start` - 開始日時
    /// * `end` - 終了日時
    ///
    /// # Returns
    /// * `Ok(Booking)` - WAITINGで作成された予約
    /// * `Err(ApplicationError)` - 作成失敗
    pub async fn create_booking(
        &self,
        booker_id: UserId,
        item_id: ItemId,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Booking, ApplicationError> {
        let correlation_id = Uuid::new_v4();
        self.logger.info(
            COMPONENT,
            "Request for booking item",
            Some(correlation_id),
            log_context(&[
                ("user_id", booker_id.to_string()),
                ("item_id", item_id.to_string()),
            ]),
        );

        let now = self.clock.now();
        let period = BookingPeriod::new_upcoming(start, end, now).map_err(|e| {
            self.logger.warn(
                COMPONENT,
                "Wrong dates in booking request",
                Some(correlation_id),
                log_context(&[("reason", e.to_string())]),
            );
            e
        })?;

        ensure_user_exists(self.user_directory.as_ref(), booker_id).await?;

        if !self.item_catalog.exists(item_id).await? {
            return Err(ApplicationError::NotFound(format!(
                "Item with id {} not found",
                item_id
            )));
        }

        // 所有者自身による予約は「見つからない」として扱う
        let item = self
            .item_catalog
            .find_excluding_owner(booker_id, item_id)
            .await?
            .ok_or_else(|| {
                ApplicationError::NotFound(format!("Item with id {} not found", item_id))
            })?;

        if !item.is_available() {
            self.logger.warn(
                COMPONENT,
                "Item is not available for booking",
                Some(correlation_id),
                log_context(&[("item_id", item_id.to_string())]),
            );
            return Err(ApplicationError::PermissionDenied(
                "Item is not available".to_string(),
            ));
        }

        let booking = self
            .booking_repository
            .create(&NewBooking::request(period, &item, booker_id))
            .await?;

        self.logger.info(
            COMPONENT,
            "Booking created",
            Some(correlation_id),
            log_context(&[
                ("booking_id", booking.id().to_string()),
                ("status", booking.status().to_string()),
            ]),
        );
        Ok(booking)
    }

    /// 所有者が予約を承認・却下する
    ///
    /// # Arguments
    /// * `owner_id` - 操作するユーザーID（アイテムの所有者であること）
    /// * `booking_id` - 予約ID
    /// * `approve` - trueなら承認、falseなら却下
    ///
    /// # Returns
    /// * `Ok(Booking)` - 更新後の予約
    /// * `Err(ApplicationError::NotFound)` - 予約が存在しない、または所有者でない
    /// * `Err(ApplicationError::DomainError)` - WAITING以外からの遷移
    pub async fn update_booking(
        &self,
        owner_id: UserId,
        booking_id: BookingId,
        approve: bool,
    ) -> Result<Booking, ApplicationError> {
        let correlation_id = Uuid::new_v4();
        self.logger.info(
            COMPONENT,
            if approve {
                "Request for approving booking"
            } else {
                "Request for rejecting booking"
            },
            Some(correlation_id),
            log_context(&[
                ("user_id", owner_id.to_string()),
                ("booking_id", booking_id.to_string()),
            ]),
        );

        ensure_user_exists(self.user_directory.as_ref(), owner_id).await?;

        // 存在しない場合と所有者でない場合を区別しない
        let mut booking = self
            .booking_repository
            .find_by_owner_and_id(owner_id, booking_id)
            .await?
            .ok_or_else(|| {
                ApplicationError::NotFound(format!("Booking with id {} not found", booking_id))
            })?;

        let expected = booking.status();
        let next = booking.decide(approve).map_err(|e| {
            self.logger.warn(
                COMPONENT,
                "Invalid booking status transition",
                Some(correlation_id),
                log_context(&[
                    ("booking_id", booking_id.to_string()),
                    ("current_status", expected.to_string()),
                ]),
            );
            e
        })?;

        let updated = self
            .booking_repository
            .update_status(booking_id, expected, next)
            .await?;
        if !updated {
            // 並行する判断が先に反映された
            self.logger.warn(
                COMPONENT,
                "Booking status changed concurrently",
                Some(correlation_id),
                log_context(&[("booking_id", booking_id.to_string())]),
            );
            return Err(crate::domain::error::DomainError::InvalidBookingState(
                "Status of booking is already set".to_string(),
            )
            .into());
        }

        self.logger.info(
            COMPONENT,
            "Booking status updated",
            Some(correlation_id),
            log_context(&[
                ("booking_id", booking_id.to_string()),
                ("status", next.to_string()),
            ]),
        );
        Ok(booking)
    }
}
