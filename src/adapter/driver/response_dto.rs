use crate::domain::model::Booking;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 予約のレスポンスDTO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingResponse {
    pub id: i64,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub status: String,
    pub booker: BookerResponse,
    pub item: BookedItemResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookerResponse {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedItemResponse {
    pub id: i64,
    pub owner_id: i64,
}

impl BookingResponse {
    pub fn from_booking(booking: &Booking) -> Self {
        Self {
            id: booking.id().value(),
            start: booking.period().start(),
            end: booking.period().end(),
            status: booking.status().to_string(),
            booker: BookerResponse {
                id: booking.booker_id().value(),
            },
            item: BookedItemResponse {
                id: booking.item_id().value(),
                owner_id: booking.item_owner_id().value(),
            },
        }
    }
}
