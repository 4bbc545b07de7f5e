// テスト用のモック実装

use crate::domain::model::{
    Booking, BookingId, BookingPeriod, BookingQuery, BookingStatus, Item, ItemId, NewBooking,
    UserId,
};
use crate::domain::port::{
    BookingRepository, Clock, ItemCatalog, LogLevel, Logger, RepositoryError, UserDirectory,
};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub const RENTER: UserId = UserId::new(1);
pub const OWNER: UserId = UserId::new(2);
pub const STRANGER: UserId = UserId::new(3);
pub const ITEM: ItemId = ItemId::new(10);
pub const UNAVAILABLE_ITEM: ItemId = ItemId::new(11);

pub struct MockBookingRepository {
    bookings: Mutex<Vec<Booking>>,
}

impl MockBookingRepository {
    pub fn new() -> Self {
        Self {
            bookings: Mutex::new(Vec::new()),
        }
    }

    pub fn insert(&self, booking: Booking) {
        self.bookings.lock().unwrap().push(booking);
    }

    pub fn count(&self) -> usize {
        self.bookings.lock().unwrap().len()
    }

    pub fn status_of(&self, booking_id: BookingId) -> Option<BookingStatus> {
        self.bookings
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id() == booking_id)
            .map(|b| b.status())
    }
}

#[async_trait]
impl BookingRepository for MockBookingRepository {
    async fn create(&self, booking: &NewBooking) -> Result<Booking, RepositoryError> {
        let mut bookings = self.bookings.lock().unwrap();
        let next_id = bookings.iter().map(|b| b.id().value()).max().unwrap_or(0) + 1;
        let created = booking.clone().into_booking(BookingId::new(next_id));
        bookings.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, booking_id: BookingId) -> Result<Option<Booking>, RepositoryError> {
        let bookings = self.bookings.lock().unwrap();
        Ok(bookings.iter().find(|b| b.id() == booking_id).cloned())
    }

    async fn find_by_owner_and_id(
        &self,
        owner_id: UserId,
        booking_id: BookingId,
    ) -> Result<Option<Booking>, RepositoryError> {
        let bookings = self.bookings.lock().unwrap();
        Ok(bookings
            .iter()
            .find(|b| b.id() == booking_id && b.item_owner_id() == owner_id)
            .cloned())
    }

    async fn update_status(
        &self,
        booking_id: BookingId,
        expected: BookingStatus,
        next: BookingStatus,
    ) -> Result<bool, RepositoryError> {
        let mut bookings = self.bookings.lock().unwrap();
        match bookings
            .iter_mut()
            .find(|b| b.id() == booking_id && b.status() == expected)
        {
            Some(booking) => {
                *booking = Booking::reconstruct(
                    booking.id(),
                    booking.period(),
                    booking.item_id(),
                    booking.item_owner_id(),
                    booking.booker_id(),
                    next,
                );
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_by_query(&self, query: &BookingQuery) -> Result<Vec<Booking>, RepositoryError> {
        let bookings = self.bookings.lock().unwrap();
        Ok(query.select(bookings.iter()))
    }

    async fn find_last_for_item(
        &self,
        item_id: ItemId,
        now: NaiveDateTime,
    ) -> Result<Option<Booking>, RepositoryError> {
        let bookings = self.bookings.lock().unwrap();
        Ok(bookings
            .iter()
            .filter(|b| b.item_id() == item_id && b.period().start() < now)
            // start DESC, id ASC
            .min_by_key(|b| (Reverse(b.period().start()), b.id().value()))
            .cloned())
    }

    async fn find_next_for_item(
        &self,
        item_id: ItemId,
        now: NaiveDateTime,
    ) -> Result<Option<Booking>, RepositoryError> {
        let bookings = self.bookings.lock().unwrap();
        Ok(bookings
            .iter()
            .filter(|b| {
                b.item_id() == item_id
                    && b.period().start() > now
                    && b.status() != BookingStatus::Rejected
            })
            .min_by_key(|b| (b.period().start(), b.id().value()))
            .cloned())
    }

    async fn has_completed_booking(
        &self,
        booker_id: UserId,
        item_id: ItemId,
        now: NaiveDateTime,
    ) -> Result<bool, RepositoryError> {
        let bookings = self.bookings.lock().unwrap();
        Ok(bookings.iter().any(|b| {
            b.booker_id() == booker_id
                && b.item_id() == item_id
                && b.status() == BookingStatus::Approved
                && b.period().is_past(now)
        }))
    }
}

pub struct MockUserDirectory {
    users: HashSet<UserId>,
}

impl MockUserDirectory {
    pub fn with_users(users: &[UserId]) -> Self {
        Self {
            users: users.iter().copied().collect(),
        }
    }
}

#[async_trait]
impl UserDirectory for MockUserDirectory {
    async fn exists(&self, user_id: UserId) -> Result<bool, RepositoryError> {
        Ok(self.users.contains(&user_id))
    }
}

pub struct MockItemCatalog {
    items: HashMap<ItemId, Item>,
}

impl MockItemCatalog {
    pub fn with_items(items: Vec<Item>) -> Self {
        Self {
            items: items.into_iter().map(|i| (i.id(), i)).collect(),
        }
    }
}

#[async_trait]
impl ItemCatalog for MockItemCatalog {
    async fn exists(&self, item_id: ItemId) -> Result<bool, RepositoryError> {
        Ok(self.items.contains_key(&item_id))
    }

    async fn find_by_id(&self, item_id: ItemId) -> Result<Option<Item>, RepositoryError> {
        Ok(self.items.get(&item_id).cloned())
    }

    async fn find_excluding_owner(
        &self,
        requester_id: UserId,
        item_id: ItemId,
    ) -> Result<Option<Item>, RepositoryError> {
        Ok(self
            .items
            .get(&item_id)
            .filter(|i| !i.is_owned_by(requester_id))
            .cloned())
    }
}

pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// 出力されたメッセージを記録するロガー
pub struct RecordingLogger {
    entries: Mutex<Vec<(LogLevel, String)>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl Logger for RecordingLogger {
    fn log(
        &self,
        level: LogLevel,
        _component: &str,
        message: &str,
        _correlation_id: Option<Uuid>,
        _context: Option<HashMap<String, String>>,
    ) {
        self.entries.lock().unwrap().push((level, message.to_string()));
    }
}

/// 利用者3人（借り手・所有者・第三者）とアイテム2つ（貸出可・不可）を持つ標準構成
pub struct Fixture {
    pub bookings: Arc<MockBookingRepository>,
    pub users: Arc<MockUserDirectory>,
    pub items: Arc<MockItemCatalog>,
    pub clock: Arc<FixedClock>,
    pub logger: Arc<RecordingLogger>,
}

impl Fixture {
    pub fn new() -> Self {
        let now = NaiveDate::from_ymd_opt(2030, 6, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        Self {
            bookings: Arc::new(MockBookingRepository::new()),
            users: Arc::new(MockUserDirectory::with_users(&[RENTER, OWNER, STRANGER])),
            items: Arc::new(MockItemCatalog::with_items(vec![
                Item::new(ITEM, OWNER, true),
                Item::new(UNAVAILABLE_ITEM, OWNER, false),
            ])),
            clock: Arc::new(FixedClock(now)),
            logger: Arc::new(RecordingLogger::new()),
        }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.0
    }

    /// 借り手による ITEM の予約を直接登録する（時間は now からの相対時間）
    pub fn seed(&self, id: i64, start_hours: i64, end_hours: i64, status: BookingStatus) -> BookingId {
        let booking_id = BookingId::new(id);
        let period = BookingPeriod::new(
            self.now() + Duration::hours(start_hours),
            self.now() + Duration::hours(end_hours),
        )
        .unwrap();
        self.bookings.insert(Booking::reconstruct(
            booking_id, period, ITEM, OWNER, RENTER, status,
        ));
        booking_id
    }

    /// 開始前のWAITING予約を登録する
    pub async fn seed_future_booking(&self) -> BookingId {
        let period = BookingPeriod::new(
            self.now() + Duration::days(1),
            self.now() + Duration::days(10),
        )
        .unwrap();
        let item = self.items.find_by_id(ITEM).await.unwrap().unwrap();
        self.bookings
            .create(&NewBooking::request(period, &item, RENTER))
            .await
            .unwrap()
            .id()
    }
}
