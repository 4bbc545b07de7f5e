use shareit_booking::adapter::driven::{
    MySqlBookingRepository, MySqlItemCatalog, MySqlUserDirectory, SystemClock, TracingLogger,
};
use shareit_booking::adapter::driver::rest_api::{create_router, AppState};
use shareit_booking::adapter::{DatabaseConfig, DatabaseMigration, ServerConfig};
use shareit_booking::application::service::{BookingApplicationService, BookingQueryService};
use shareit_booking::domain::port::{
    BookingRepository, Clock, ItemCatalog, Logger, UserDirectory,
};

use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .envファイルから環境変数を読み込む
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,shareit_booking=debug,sqlx=warn")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = DatabaseConfig::from_env()?;
    let server = ServerConfig::from_env()?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        database = %config.database,
        "database configuration loaded"
    );

    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.connection_string())
        .await?;

    DatabaseMigration::new(pool.clone()).run().await?;

    let booking_repository: Arc<dyn BookingRepository> =
        Arc::new(MySqlBookingRepository::new(pool.clone()));
    let user_directory: Arc<dyn UserDirectory> = Arc::new(MySqlUserDirectory::new(pool.clone()));
    let item_catalog: Arc<dyn ItemCatalog> = Arc::new(MySqlItemCatalog::new(pool));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let logger: Arc<dyn Logger> = Arc::new(TracingLogger::new());

    let booking_service = BookingApplicationService::new(
        booking_repository.clone(),
        user_directory.clone(),
        item_catalog.clone(),
        clock.clone(),
        logger.clone(),
    );
    let booking_query_service = BookingQueryService::new(
        booking_repository,
        user_directory,
        item_catalog,
        clock,
        logger,
    );

    let app_state = AppState {
        booking_service: Arc::new(booking_service),
        booking_query_service: Arc::new(booking_query_service),
    };

    let app = create_router()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(app_state);

    let addr = server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "booking service listening");

    axum::serve(listener, app).await?;

    Ok(())
}
