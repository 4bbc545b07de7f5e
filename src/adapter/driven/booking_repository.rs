use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{
    Booking, BookingId, BookingOrder, BookingPeriod, BookingQuery, BookingScope, BookingState,
    BookingStatus, ItemId, NewBooking, UserId,
};
use crate::domain::port::{BookingRepository, RepositoryError};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, Pool, QueryBuilder, Row};

/// 予約とアイテム所有者を結合して取得する共通のSELECT句
const SELECT_BOOKINGS: &str = r#"
    SELECT b.id, b.start_date, b.end_date, b.item_id, b.booker_id, b.status,
           i.owner_id AS item_owner_id
    FROM bookings b
    JOIN items i ON i.id = b.item_id
"#;

/// MySQL予約リポジトリ
#[derive(Clone)]
pub struct MySqlBookingRepository {
    pool: Pool<MySql>,
}

impl MySqlBookingRepository {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    async fn fetch_optional(
        &self,
        context: &str,
        builder: &mut QueryBuilder<'_, MySql>,
    ) -> Result<Option<Booking>, RepositoryError> {
        let row = builder
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::query(context, e))?;
        row.map(|row| booking_from_row(&row)).transpose()
    }
}

/// 行から予約を復元する
fn booking_from_row(row: &MySqlRow) -> Result<Booking, RepositoryError> {
    let mapping = |e: sqlx::Error| DatabaseError::MappingError(e.to_string());

    let start: NaiveDateTime = row.try_get("start_date").map_err(mapping)?;
    let end: NaiveDateTime = row.try_get("end_date").map_err(mapping)?;
    let period = BookingPeriod::new(start, end)
        .map_err(|e| DatabaseError::MappingError(format!("予約期間が不正です: {}", e)))?;

    let status: String = row.try_get("status").map_err(mapping)?;
    let status = BookingStatus::from_string(&status)
        .map_err(|e| DatabaseError::MappingError(e.to_string()))?;

    Ok(Booking::reconstruct(
        BookingId::new(row.try_get("id").map_err(mapping)?),
        period,
        ItemId::new(row.try_get("item_id").map_err(mapping)?),
        UserId::new(row.try_get("item_owner_id").map_err(mapping)?),
        UserId::new(row.try_get("booker_id").map_err(mapping)?),
        status,
    ))
}

/// 一覧問い合わせをSQLに組み立てる
fn build_query(query: &BookingQuery) -> QueryBuilder<'static, MySql> {
    let mut builder = QueryBuilder::new(SELECT_BOOKINGS);

    match query.scope {
        BookingScope::Booker(user_id) => builder.push(" WHERE b.booker_id = ").push_bind(user_id.value()),
        BookingScope::Owner(user_id) => builder.push(" WHERE i.owner_id = ").push_bind(user_id.value()),
    };

    let now = query.now;
    match query.state {
        BookingState::All => {}
        BookingState::Waiting => {
            builder
                .push(" AND b.status = ")
                .push_bind(BookingStatus::Waiting.to_string());
        }
        BookingState::Rejected => {
            builder
                .push(" AND b.status = ")
                .push_bind(BookingStatus::Rejected.to_string());
        }
        BookingState::Future => {
            builder.push(" AND b.start_date > ").push_bind(now);
        }
        BookingState::Past => {
            builder.push(" AND b.end_date < ").push_bind(now);
        }
        BookingState::Current => {
            builder
                .push(" AND b.start_date <= ")
                .push_bind(now)
                .push(" AND b.end_date > ")
                .push_bind(now);
        }
    }

    builder.push(match query.state.order() {
        BookingOrder::StartDesc => " ORDER BY b.start_date DESC, b.id ASC",
        BookingOrder::IdAsc => " ORDER BY b.id ASC",
    });

    if let Some(page) = query.page {
        builder
            .push(" LIMIT ")
            .push_bind(page.size())
            .push(" OFFSET ")
            .push_bind(page.offset());
    }
    builder
}

#[async_trait]
impl BookingRepository for MySqlBookingRepository {
    async fn create(&self, booking: &NewBooking) -> Result<Booking, RepositoryError> {
        let period = booking.period();
        let result = sqlx::query(
            r#"
            INSERT INTO bookings (start_date, end_date, item_id, booker_id, status)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(period.start())
        .bind(period.end())
        .bind(booking.item_id().value())
        .bind(booking.booker_id().value())
        .bind(booking.status().to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::query("予約の保存に失敗しました", e))?;

        let id = i64::try_from(result.last_insert_id())
            .map_err(|e| DatabaseError::MappingError(format!("採番されたIDが不正です: {}", e)))?;
        Ok(booking.clone().into_booking(BookingId::new(id)))
    }

    async fn find_by_id(&self, booking_id: BookingId) -> Result<Option<Booking>, RepositoryError> {
        let mut builder = QueryBuilder::new(SELECT_BOOKINGS);
        builder.push(" WHERE b.id = ").push_bind(booking_id.value());
        self.fetch_optional("予約の取得に失敗しました", &mut builder)
            .await
    }

    async fn find_by_owner_and_id(
        &self,
        owner_id: UserId,
        booking_id: BookingId,
    ) -> Result<Option<Booking>, RepositoryError> {
        let mut builder = QueryBuilder::new(SELECT_BOOKINGS);
        builder
            .push(" WHERE b.id = ")
            .push_bind(booking_id.value())
            .push(" AND i.owner_id = ")
            .push_bind(owner_id.value());
        self.fetch_optional("予約の取得に失敗しました", &mut builder)
            .await
    }

    async fn update_status(
        &self,
        booking_id: BookingId,
        expected: BookingStatus,
        next: BookingStatus,
    ) -> Result<bool, RepositoryError> {
        // 行ロックの下で現在値を比較するので、競合した側は0行更新になる
        let result = sqlx::query("UPDATE bookings SET status = ? WHERE id = ? AND status = ?")
            .bind(next.to_string())
            .bind(booking_id.value())
            .bind(expected.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::query("予約ステータスの更新に失敗しました", e))?;
        Ok(result.rows_affected() == 1)
    }

    async fn find_by_query(&self, query: &BookingQuery) -> Result<Vec<Booking>, RepositoryError> {
        let rows = build_query(query)
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::query("予約一覧の取得に失敗しました", e))?;
        rows.iter().map(booking_from_row).collect()
    }

    async fn find_last_for_item(
        &self,
        item_id: ItemId,
        now: NaiveDateTime,
    ) -> Result<Option<Booking>, RepositoryError> {
        let mut builder = QueryBuilder::new(SELECT_BOOKINGS);
        builder
            .push(" WHERE b.item_id = ")
            .push_bind(item_id.value())
            .push(" AND b.start_date < ")
            .push_bind(now)
            .push(" ORDER BY b.start_date DESC, b.id ASC LIMIT 1");
        self.fetch_optional("直近の予約の取得に失敗しました", &mut builder)
            .await
    }

    async fn find_next_for_item(
        &self,
        item_id: ItemId,
        now: NaiveDateTime,
    ) -> Result<Option<Booking>, RepositoryError> {
        let mut builder = QueryBuilder::new(SELECT_BOOKINGS);
        builder
            .push(" WHERE b.item_id = ")
            .push_bind(item_id.value())
            .push(" AND b.start_date > ")
            .push_bind(now)
            .push(" AND b.status <> ")
            .push_bind(BookingStatus::Rejected.to_string())
            .push(" ORDER BY b.start_date ASC, b.id ASC LIMIT 1");
        self.fetch_optional("次の予約の取得に失敗しました", &mut builder)
            .await
    }

    async fn has_completed_booking(
        &self,
        booker_id: UserId,
        item_id: ItemId,
        now: NaiveDateTime,
    ) -> Result<bool, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS completed
            FROM bookings
            WHERE booker_id = ? AND item_id = ? AND status = ? AND end_date < ?
            "#,
        )
        .bind(booker_id.value())
        .bind(item_id.value())
        .bind(BookingStatus::Approved.to_string())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::query("利用履歴の確認に失敗しました", e))?;

        let completed: i64 = row
            .try_get("completed")
            .map_err(|e| DatabaseError::MappingError(e.to_string()))?;
        Ok(completed != 0)
    }
}
