use crate::domain::error::DomainError;
use crate::domain::model::{BookingId, BookingPeriod, BookingStatus, Item, ItemId, UserId};

/// 永続化前の予約
/// IDはストアが採番するため持たない。ステータスは常にWAITINGで作成される
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    period: BookingPeriod,
    item_id: ItemId,
    item_owner_id: UserId,
    booker_id: UserId,
}

impl NewBooking {
    /// 借り手からの予約リクエストを作成
    ///
    /// # Arguments
    /// * `period` - 予約期間
    /// * `item` - 予約対象のアイテム（借り手以外が所有していること）
    /// * `booker_id` - 借り手のユーザーID
    pub fn request(period: BookingPeriod, item: &Item, booker_id: UserId) -> Self {
        Self {
            period,
            item_id: item.id(),
            item_owner_id: item.owner_id(),
            booker_id,
        }
    }

    pub fn period(&self) -> BookingPeriod {
        self.period
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn item_owner_id(&self) -> UserId {
        self.item_owner_id
    }

    pub fn booker_id(&self) -> UserId {
        self.booker_id
    }

    /// 初期ステータス
    pub fn status(&self) -> BookingStatus {
        BookingStatus::Waiting
    }

    /// ストアが採番したIDで予約集約に変換する
    pub fn into_booking(self, id: BookingId) -> Booking {
        Booking {
            id,
            period: self.period,
            item_id: self.item_id,
            item_owner_id: self.item_owner_id,
            booker_id: self.booker_id,
            status: BookingStatus::Waiting,
        }
    }
}

/// Booking集約
/// 予約のライフサイクル（WAITING → APPROVED / REJECTED）を管理する
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    id: BookingId,
    period: BookingPeriod,
    item_id: ItemId,
    item_owner_id: UserId,
    booker_id: UserId,
    status: BookingStatus,
}

impl Booking {
    /// データベースから取得したデータで予約を再構築
    pub fn reconstruct(
        id: BookingId,
        period: BookingPeriod,
        item_id: ItemId,
        item_owner_id: UserId,
        booker_id: UserId,
        status: BookingStatus,
    ) -> Self {
        Self {
            id,
            period,
            item_id,
            item_owner_id,
            booker_id,
            status,
        }
    }

    pub fn id(&self) -> BookingId {
        self.id
    }

    pub fn period(&self) -> BookingPeriod {
        self.period
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    /// 予約対象アイテムの所有者ID
    pub fn item_owner_id(&self) -> UserId {
        self.item_owner_id
    }

    /// 借り手のユーザーID
    pub fn booker_id(&self) -> UserId {
        self.booker_id
    }

    pub fn status(&self) -> BookingStatus {
        self.status
    }

    /// 指定ユーザーが閲覧できるか（借り手またはアイテム所有者のみ）
    pub fn is_visible_to(&self, user_id: UserId) -> bool {
        self.booker_id == user_id || self.item_owner_id == user_id
    }

    /// 所有者の判断を適用する
    ///
    /// # Arguments
    /// * `approve` - trueなら承認、falseなら却下
    ///
    /// # Returns
    /// * `Ok(BookingStatus)` - 遷移後のステータス
    /// * `Err(DomainError::InvalidBookingState)` - WAITING以外からの遷移
    pub fn decide(&mut self, approve: bool) -> Result<BookingStatus, DomainError> {
        let next = Self::next_status(self.status, approve)?;
        self.status = next;
        Ok(next)
    }

    /// 状態遷移表
    /// APPROVED / REJECTED は終端状態で、そこからの遷移はすべて拒否する
    pub fn next_status(current: BookingStatus, approve: bool) -> Result<BookingStatus, DomainError> {
        if current.is_terminal() {
            let already_set = matches!(
                (current, approve),
                (BookingStatus::Approved, true) | (BookingStatus::Rejected, false)
            );
            return Err(DomainError::InvalidBookingState(if already_set {
                "Status of booking is already set".to_string()
            } else {
                format!("Booking in status {} can no longer be changed", current)
            }));
        }
        Ok(if approve {
            BookingStatus::Approved
        } else {
            BookingStatus::Rejected
        })
    }
}
