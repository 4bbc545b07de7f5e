use proptest::prelude::*;
use shareit_booking::domain::model::{
    Booking, BookingId, BookingPeriod, BookingQuery, BookingScope, BookingState, BookingStatus,
    ItemId, PageRequest, UserId,
};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::collections::HashSet;

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2030, 1, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn status_strategy() -> impl Strategy<Value = BookingStatus> {
    prop_oneof![
        Just(BookingStatus::Waiting),
        Just(BookingStatus::Approved),
        Just(BookingStatus::Rejected),
    ]
}

/// 開始オフセット（時間）と長さ（時間）から予約を生成する
/// 終了時刻が now ちょうどになる予約はどの時間フィルタにも属さないので除く
fn bookings_strategy(max: usize) -> impl Strategy<Value = Vec<Booking>> {
    prop::collection::vec((-500i64..500, 1i64..200, status_strategy()), 0..max)
        .prop_map(|specs| {
            specs
                .into_iter()
                .filter(|(start, len, _)| start + len != 0)
                .enumerate()
                .map(|(index, (start, len, status))| {
                    let start = now() + Duration::hours(start);
                    Booking::reconstruct(
                        BookingId::new(index as i64 + 1),
                        BookingPeriod::new(start, start + Duration::hours(len)).unwrap(),
                        ItemId::new(10),
                        UserId::new(2),
                        UserId::new(1),
                        status,
                    )
                })
                .collect()
        })
}

fn ids(bookings: &[Booking]) -> Vec<i64> {
    bookings.iter().map(|b| b.id().value()).collect()
}

fn query(state: BookingState, page: Option<PageRequest>) -> BookingQuery {
    BookingQuery::new(BookingScope::Booker(UserId::new(1)), state, page, now())
}

proptest! {
    /// PAST / CURRENT / FUTURE は ALL を重複なく覆う
    #[test]
    fn test_time_filters_partition_all(bookings in bookings_strategy(40)) {
        let all: HashSet<i64> = ids(&query(BookingState::All, None).select(&bookings)).into_iter().collect();
        let past = ids(&query(BookingState::Past, None).select(&bookings));
        let current = ids(&query(BookingState::Current, None).select(&bookings));
        let future = ids(&query(BookingState::Future, None).select(&bookings));

        let mut union = HashSet::new();
        for id in past.iter().chain(current.iter()).chain(future.iter()) {
            prop_assert!(union.insert(*id), "booking {} matched two time filters", id);
        }
        prop_assert_eq!(union, all);
    }

    /// CURRENT は start <= now < end を満たす予約そのもの
    #[test]
    fn test_current_matches_open_interval(bookings in bookings_strategy(40)) {
        let current: HashSet<i64> = ids(&query(BookingState::Current, None).select(&bookings)).into_iter().collect();
        let expected: HashSet<i64> = bookings
            .iter()
            .filter(|b| b.period().start() <= now() && now() < b.period().end())
            .map(|b| b.id().value())
            .collect();
        prop_assert_eq!(current, expected);
    }

    /// ページ境界に揃った from で取得したページは互いに素で、結合すると全件になる
    #[test]
    fn test_aligned_pages_are_disjoint_and_complete(
        bookings in bookings_strategy(30),
        size in 1i64..8,
    ) {
        let everything = ids(&query(BookingState::All, None).select(&bookings));

        let mut collected = Vec::new();
        let mut from = 0i64;
        loop {
            let page = PageRequest::from_offset(Some(from), Some(size)).unwrap();
            let chunk = ids(&query(BookingState::All, page).select(&bookings));
            prop_assert!(chunk.len() as i64 <= size);
            if chunk.is_empty() {
                break;
            }
            collected.extend(chunk);
            from += size;
        }
        prop_assert_eq!(collected, everything);
    }

    /// from はページ境界に切り捨てられる
    #[test]
    fn test_page_offset_snaps_down(from in 0i64..10_000, size in 1i64..100) {
        let page = PageRequest::from_offset(Some(from), Some(size)).unwrap().unwrap();
        prop_assert_eq!(page.offset() as i64, (from / size) * size);
        prop_assert!(page.offset() as i64 <= from);
        prop_assert!(from - (page.offset() as i64) < size);
    }

    /// 負の from や正でない size は拒否される
    #[test]
    fn test_invalid_page_values_are_rejected(from in -100i64..0, size in -100i64..=0) {
        prop_assert!(PageRequest::from_offset(Some(from), Some(10)).is_err());
        prop_assert!(PageRequest::from_offset(Some(0), Some(size)).is_err());
    }

    /// 期間は start < end の場合に限り作成できる
    #[test]
    fn test_period_requires_start_before_end(start in -1000i64..1000, end in -1000i64..1000) {
        let result = BookingPeriod::new(now() + Duration::minutes(start), now() + Duration::minutes(end));
        prop_assert_eq!(result.is_ok(), start < end);
    }

    /// WAITING 以外からの遷移はすべて拒否される
    #[test]
    fn test_only_waiting_bookings_can_be_decided(status in status_strategy(), approve in any::<bool>()) {
        let result = Booking::next_status(status, approve);
        if status == BookingStatus::Waiting {
            let expected = if approve { BookingStatus::Approved } else { BookingStatus::Rejected };
            prop_assert_eq!(result.unwrap(), expected);
        } else {
            prop_assert!(result.is_err());
        }
    }

    /// 状態名は完全一致のみ受け付ける
    #[test]
    fn test_state_parsing_is_exact(name in "[A-Za-z_-]{1,12}") {
        let known = BookingState::ALL_STATES.iter().any(|s| s.to_string() == name);
        prop_assert_eq!(BookingState::parse(Some(name.as_str())).is_ok(), known);
    }
}
