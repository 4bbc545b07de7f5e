use crate::domain::error::DomainError;
use crate::domain::model::{Booking, BookingStatus, UserId};
use chrono::NaiveDateTime;
use std::cmp::Ordering;
use std::fmt;

/// 一覧取得時の状態フィルタ
/// 文字列は境界で一度だけ解釈し、以降はこの列挙型で扱う
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingState {
    All,
    Waiting,
    Rejected,
    Future,
    Past,
    Current,
}

impl BookingState {
    pub const ALL_STATES: [BookingState; 6] = [
        BookingState::All,
        BookingState::Waiting,
        BookingState::Rejected,
        BookingState::Future,
        BookingState::Past,
        BookingState::Current,
    ];

    /// 文字列から状態フィルタを作成
    /// 未指定・空文字・空白のみはALLとして扱う。大文字小文字は区別する
    pub fn parse(state: Option<&str>) -> Result<Self, DomainError> {
        let state = match state {
            Some(s) if !s.trim().is_empty() => s,
            _ => return Ok(BookingState::All),
        };
        match state {
            "ALL" => Ok(BookingState::All),
            "WAITING" => Ok(BookingState::Waiting),
            "REJECTED" => Ok(BookingState::Rejected),
            "FUTURE" => Ok(BookingState::Future),
            "PAST" => Ok(BookingState::Past),
            "CURRENT" => Ok(BookingState::Current),
            other => Err(DomainError::UnknownState(other.to_string())),
        }
    }

    /// now 時点で予約がこのフィルタに該当するか
    pub fn matches(&self, booking: &Booking, now: NaiveDateTime) -> bool {
        let period = booking.period();
        match self {
            BookingState::All => true,
            BookingState::Waiting => booking.status() == BookingStatus::Waiting,
            BookingState::Rejected => booking.status() == BookingStatus::Rejected,
            BookingState::Future => period.is_future(now),
            BookingState::Past => period.is_past(now),
            BookingState::Current => period.is_current(now),
        }
    }

    /// このフィルタの並び順
    /// CURRENTのみID昇順、それ以外は開始日時の降順
    pub fn order(&self) -> BookingOrder {
        match self {
            BookingState::Current => BookingOrder::IdAsc,
            _ => BookingOrder::StartDesc,
        }
    }
}

impl fmt::Display for BookingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BookingState::All => "ALL",
            BookingState::Waiting => "WAITING",
            BookingState::Rejected => "REJECTED",
            BookingState::Future => "FUTURE",
            BookingState::Past => "PAST",
            BookingState::Current => "CURRENT",
        };
        write!(f, "{}", s)
    }
}

/// 一覧の並び順
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingOrder {
    /// 開始日時の降順（同時刻はID昇順）
    StartDesc,
    /// ID昇順（作成順）
    IdAsc,
}

impl BookingOrder {
    pub fn compare(&self, a: &Booking, b: &Booking) -> Ordering {
        match self {
            BookingOrder::StartDesc => b
                .period()
                .start()
                .cmp(&a.period().start())
                .then_with(|| a.id().cmp(&b.id())),
            BookingOrder::IdAsc => a.id().cmp(&b.id()),
        }
    }
}

/// 一覧の対象範囲
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingScope {
    /// 借り手として行った予約
    Booker(UserId),
    /// 所有するアイテムに対する予約
    Owner(UserId),
}

impl BookingScope {
    pub fn contains(&self, booking: &Booking) -> bool {
        match self {
            BookingScope::Booker(user_id) => booking.booker_id() == *user_id,
            BookingScope::Owner(user_id) => booking.item_owner_id() == *user_id,
        }
    }
}

/// ページ指定
/// from はページ境界に切り捨てる（page = from / size）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    size: u64,
}

impl PageRequest {
    /// from / size からページ指定を作成
    /// 指定された値は片方だけでも検証する
    ///
    /// # Returns
    /// * `Ok(None)` - いずれかが未指定（ページングしない）
    /// * `Ok(Some(PageRequest))` - ページング指定
    /// * `Err(DomainError::InvalidPage)` - from < 0 または size <= 0
    pub fn from_offset(from: Option<i64>, size: Option<i64>) -> Result<Option<Self>, DomainError> {
        let invalid_from = from.is_some_and(|from| from < 0);
        let invalid_size = size.is_some_and(|size| size <= 0);
        if invalid_from || invalid_size {
            return Err(DomainError::InvalidPage(format!(
                "from={:?}, size={:?}",
                from, size
            )));
        }
        let (from, size) = match (from, size) {
            (Some(from), Some(size)) => (from, size),
            _ => return Ok(None),
        };
        Ok(Some(Self {
            page: (from / size) as u64,
            size: size as u64,
        }))
    }

    /// 0始まりのページ番号
    pub fn page(&self) -> u64 {
        self.page
    }

    /// ページサイズ（LIMIT）
    pub fn size(&self) -> u64 {
        self.size
    }

    /// 先頭からのオフセット（OFFSET）
    pub fn offset(&self) -> u64 {
        self.page * self.size
    }
}

/// 予約ストアへの一覧問い合わせ
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BookingQuery {
    pub scope: BookingScope,
    pub state: BookingState,
    pub page: Option<PageRequest>,
    /// 時間条件の基準時刻
    pub now: NaiveDateTime,
}

impl BookingQuery {
    pub fn new(
        scope: BookingScope,
        state: BookingState,
        page: Option<PageRequest>,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            scope,
            state,
            page,
            now,
        }
    }

    /// 予約のコレクションに問い合わせを適用する
    /// 絞り込み → 並べ替え → ページ切り出しの順に評価する
    pub fn select<'a, I>(&self, bookings: I) -> Vec<Booking>
    where
        I: IntoIterator<Item = &'a Booking>,
    {
        let mut selected: Vec<Booking> = bookings
            .into_iter()
            .filter(|b| self.scope.contains(b) && self.state.matches(b, self.now))
            .cloned()
            .collect();
        let order = self.state.order();
        selected.sort_by(|a, b| order.compare(a, b));

        match self.page {
            Some(page) => selected
                .into_iter()
                .skip(page.offset() as usize)
                .take(page.size() as usize)
                .collect(),
            None => selected,
        }
    }
}
