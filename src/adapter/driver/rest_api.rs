use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequestParts, Path, Query, State,
    },
    http::{request::Parts, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::adapter::driver::request_dto::{
    BookingsQueryParams, CreateBookingRequest, UpdateBookingParams,
};
use crate::adapter::driver::response_dto::BookingResponse;
use crate::application::service::{BookingApplicationService, BookingQueryService};
use crate::application::ApplicationError;
use crate::domain::error::DomainError;
use crate::domain::model::{BookingId, ItemId, UserId};

/// 操作するユーザーを示すヘッダー
pub const USER_ID_HEADER: &str = "X-Sharer-User-Id";

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    fn response(status: StatusCode, error: impl Into<String>, code: &str) -> ApiFailure {
        (
            status,
            Json(ApiError {
                error: error.into(),
                code: code.to_string(),
            }),
        )
    }
}

type ApiFailure = (StatusCode, Json<ApiError>);
type ApiResult<T> = Result<T, ApiFailure>;

#[derive(Clone)]
pub struct AppState {
    pub booking_service: Arc<BookingApplicationService>,
    pub booking_query_service: Arc<BookingQueryService>,
}

/// ヘッダーから取り出した操作ユーザー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharerUserId(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for SharerUserId
where
    S: Send + Sync,
{
    type Rejection = ApiFailure;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts.headers.get(USER_ID_HEADER).ok_or_else(|| {
            ApiError::response(
                StatusCode::BAD_REQUEST,
                format!("Header {} is required", USER_ID_HEADER),
                "MISSING_HEADER",
            )
        })?;

        raw.to_str()
            .ok()
            .and_then(|value| value.trim().parse::<i64>().ok())
            .map(|id| SharerUserId(UserId::new(id)))
            .ok_or_else(|| {
                ApiError::response(
                    StatusCode::BAD_REQUEST,
                    format!("Header {} must be a numeric user id", USER_ID_HEADER),
                    "INVALID_HEADER",
                )
            })
    }
}

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/bookings", get(get_bookings).post(create_booking))
        .route("/bookings/owner", get(get_owner_bookings))
        .route(
            "/bookings/:booking_id",
            get(get_booking_by_id).patch(update_booking),
        )
        .route("/items/:item_id/bookings/last", get(get_last_booking))
        .route("/items/:item_id/bookings/next", get(get_next_booking))
        .route(
            "/items/:item_id/comment-eligibility",
            get(check_comment_eligibility),
        )
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "shareit-booking",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

fn invalid_query(rejection: QueryRejection) -> ApiFailure {
    ApiError::response(
        StatusCode::BAD_REQUEST,
        rejection.body_text(),
        "INVALID_PARAMETER",
    )
}

fn invalid_path(rejection: PathRejection) -> ApiFailure {
    ApiError::response(StatusCode::BAD_REQUEST, rejection.body_text(), "INVALID_PATH")
}

async fn create_booking(
    State(state): State<AppState>,
    SharerUserId(user_id): SharerUserId,
    body: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<BookingResponse>)> {
    let Json(request) = body.map_err(|rejection| {
        ApiError::response(StatusCode::BAD_REQUEST, rejection.body_text(), "INVALID_BODY")
    })?;

    let booking = state
        .booking_service
        .create_booking(
            user_id,
            ItemId::new(request.item_id),
            request.start,
            request.end,
        )
        .await
        .map_err(map_application_error)?;

    Ok((
        StatusCode::CREATED,
        Json(BookingResponse::from_booking(&booking)),
    ))
}

async fn update_booking(
    State(state): State<AppState>,
    SharerUserId(user_id): SharerUserId,
    path: Result<Path<i64>, PathRejection>,
    params: Result<Query<UpdateBookingParams>, QueryRejection>,
) -> ApiResult<Json<BookingResponse>> {
    let Path(booking_id) = path.map_err(invalid_path)?;
    let Query(params) = params.map_err(invalid_query)?;

    let booking = state
        .booking_service
        .update_booking(user_id, BookingId::new(booking_id), params.approved)
        .await
        .map_err(map_application_error)?;

    Ok(Json(BookingResponse::from_booking(&booking)))
}

async fn get_booking_by_id(
    State(state): State<AppState>,
    SharerUserId(user_id): SharerUserId,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<BookingResponse>> {
    let Path(booking_id) = path.map_err(invalid_path)?;
    let booking = state
        .booking_query_service
        .get_booking_by_id(user_id, BookingId::new(booking_id))
        .await
        .map_err(map_application_error)?;

    Ok(Json(BookingResponse::from_booking(&booking)))
}

async fn get_bookings(
    State(state): State<AppState>,
    SharerUserId(user_id): SharerUserId,
    params: Result<Query<BookingsQueryParams>, QueryRejection>,
) -> ApiResult<Json<Vec<BookingResponse>>> {
    let Query(params) = params.map_err(invalid_query)?;

    let bookings = state
        .booking_query_service
        .list_by_state(user_id, params.state.as_deref(), params.from, params.size)
        .await
        .map_err(map_application_error)?;

    Ok(Json(
        bookings.iter().map(BookingResponse::from_booking).collect(),
    ))
}

async fn get_owner_bookings(
    State(state): State<AppState>,
    SharerUserId(owner_id): SharerUserId,
    params: Result<Query<BookingsQueryParams>, QueryRejection>,
) -> ApiResult<Json<Vec<BookingResponse>>> {
    let Query(params) = params.map_err(invalid_query)?;

    let bookings = state
        .booking_query_service
        .list_by_owner_and_state(owner_id, params.state.as_deref(), params.from, params.size)
        .await
        .map_err(map_application_error)?;

    Ok(Json(
        bookings.iter().map(BookingResponse::from_booking).collect(),
    ))
}

async fn get_last_booking(
    State(state): State<AppState>,
    SharerUserId(owner_id): SharerUserId,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Option<BookingResponse>>> {
    let Path(item_id) = path.map_err(invalid_path)?;
    let booking = state
        .booking_query_service
        .last_booking_for_item(owner_id, ItemId::new(item_id))
        .await
        .map_err(map_application_error)?;

    Ok(Json(booking.as_ref().map(BookingResponse::from_booking)))
}

async fn get_next_booking(
    State(state): State<AppState>,
    SharerUserId(owner_id): SharerUserId,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Option<BookingResponse>>> {
    let Path(item_id) = path.map_err(invalid_path)?;
    let booking = state
        .booking_query_service
        .next_booking_for_item(owner_id, ItemId::new(item_id))
        .await
        .map_err(map_application_error)?;

    Ok(Json(booking.as_ref().map(BookingResponse::from_booking)))
}

async fn check_comment_eligibility(
    State(state): State<AppState>,
    SharerUserId(user_id): SharerUserId,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(item_id) = path.map_err(invalid_path)?;
    state
        .booking_query_service
        .ensure_can_comment(user_id, ItemId::new(item_id))
        .await
        .map_err(map_application_error)?;

    Ok(StatusCode::NO_CONTENT)
}

// アプリケーションエラーをHTTPエラーにマッピング
fn map_application_error(err: ApplicationError) -> ApiFailure {
    match err {
        ApplicationError::DomainError(domain_err) => {
            let code = domain_error_code(&domain_err);
            ApiError::response(StatusCode::BAD_REQUEST, domain_err.to_string(), code)
        }
        ApplicationError::NotFound(msg) => {
            ApiError::response(StatusCode::NOT_FOUND, msg, "NOT_FOUND")
        }
        ApplicationError::PermissionDenied(msg) => {
            ApiError::response(StatusCode::BAD_REQUEST, msg, "PERMISSION_DENIED")
        }
        ApplicationError::RepositoryError(repo_err) => {
            tracing::error!(error = %repo_err, "repository failure while handling request");
            ApiError::response(
                StatusCode::INTERNAL_SERVER_ERROR,
                repo_err.to_string(),
                "REPOSITORY_ERROR",
            )
        }
    }
}

fn domain_error_code(err: &DomainError) -> &'static str {
    match err {
        DomainError::InvalidPeriod(_) => "INVALID_PERIOD",
        DomainError::InvalidBookingState(_) => "INVALID_BOOKING_STATE",
        DomainError::UnknownState(_) => "UNKNOWN_STATE",
        DomainError::InvalidPage(_) => "INVALID_PAGE",
        DomainError::InvalidValue(_) => "INVALID_VALUE",
    }
}
