// 駆動される側アダプター（ポートの実装）

mod booking_repository;
mod item_catalog;
mod system_clock;
mod tracing_logger;
mod user_directory;

pub use booking_repository::MySqlBookingRepository;
pub use item_catalog::MySqlItemCatalog;
pub use system_clock::SystemClock;
pub use tracing_logger::TracingLogger;
pub use user_directory::MySqlUserDirectory;
