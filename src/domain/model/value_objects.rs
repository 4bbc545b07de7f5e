use crate::domain::error::DomainError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use std::fmt;

/// 予約の一意識別子（ストアが採番する）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BookingId(i64);

impl BookingId {
    /// 数値から BookingId を作成
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// 内部の数値を取得
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ユーザーの一意識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(i64);

impl UserId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// アイテムの一意識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(i64);

impl ItemId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 予約ステータス
/// WAITING から APPROVED / REJECTED のいずれかへ一度だけ遷移する
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    /// 所有者の判断待ち
    Waiting,
    /// 承認済み（終端状態）
    Approved,
    /// 却下済み（終端状態）
    Rejected,
}

impl BookingStatus {
    /// 文字列からステータスを作成
    pub fn from_string(s: &str) -> Result<Self, DomainError> {
        match s {
            "WAITING" => Ok(BookingStatus::Waiting),
            "APPROVED" => Ok(BookingStatus::Approved),
            "REJECTED" => Ok(BookingStatus::Rejected),
            _ => Err(DomainError::InvalidValue(format!(
                "無効な予約ステータス: {}",
                s
            ))),
        }
    }

    /// 終端状態かどうか
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BookingStatus::Waiting)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BookingStatus::Waiting => "WAITING",
            BookingStatus::Approved => "APPROVED",
            BookingStatus::Rejected => "REJECTED",
        };
        write!(f, "{}", s)
    }
}

/// 予約期間を表す値オブジェクト
/// 常に start < end を満たす
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPeriod {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl BookingPeriod {
    /// 開始・終了日時から期間を作成
    /// 長さ0や逆転した区間は作成できない
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, DomainError> {
        if start == end {
            return Err(DomainError::InvalidPeriod(
                "start and end of booking are equal".to_string(),
            ));
        }
        if end < start {
            return Err(DomainError::InvalidPeriod(
                "end of booking is before its start".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    /// 新規予約用の期間を作成
    /// 両端が未指定でなく、かつ now より厳密に未来である必要がある
    pub fn new_upcoming(
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
        now: NaiveDateTime,
    ) -> Result<Self, DomainError> {
        let (start, end) = match (start, end) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                return Err(DomainError::InvalidPeriod(
                    "start and end of booking are required".to_string(),
                ))
            }
        };
        let period = Self::new(start, end)?;
        if start <= now || end <= now {
            return Err(DomainError::InvalidPeriod(
                "booking must start and end in the future".to_string(),
            ));
        }
        Ok(period)
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// now 時点で開始前か
    pub fn is_future(&self, now: NaiveDateTime) -> bool {
        self.start > now
    }

    /// now 時点で終了済みか
    pub fn is_past(&self, now: NaiveDateTime) -> bool {
        self.end < now
    }

    /// now 時点で進行中か（start <= now < end）
    pub fn is_current(&self, now: NaiveDateTime) -> bool {
        self.start <= now && self.end > now
    }
}
