// ドメインモデル（エンティティと値オブジェクト）

mod value_objects;
mod booking;
mod item;
mod query;

pub use value_objects::{
    BookingId, UserId, ItemId,
    BookingStatus,
    BookingPeriod,
};

pub use booking::{Booking, NewBooking};
pub use item::Item;
pub use query::{BookingOrder, BookingQuery, BookingScope, BookingState, PageRequest};
