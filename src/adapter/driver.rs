// 駆動する側アダプター（HTTP API）

pub mod request_dto;
pub mod response_dto;
pub mod rest_api;
