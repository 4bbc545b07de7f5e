use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// 予約作成用のリクエストDTO
/// 日時の妥当性はドメイン側で検証するため、未指定も受け付ける
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    #[serde(rename = "itemId")]
    pub item_id: i64,
}

/// 予約一覧取得用のクエリパラメータ
#[derive(Debug, Default, Deserialize)]
pub struct BookingsQueryParams {
    pub state: Option<String>,
    pub from: Option<i64>,
    pub size: Option<i64>,
}

/// 予約の承認・却下用のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct UpdateBookingParams {
    pub approved: bool,
}
