//! 路径参数提取器
//!
//! 路径中的 ID 必须是正整数，否则直接返回 400。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn parse_positive_id(raw: Option<&str>, name: &str) -> Result<i64, actix_web::Error> {
    match raw.and_then(|s| s.parse::<i64>().ok()) {
        Some(id) if id > 0 => Ok(id),
        _ => {
            let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                format!("Invalid path parameter '{name}': expected a positive integer"),
            ));
            Err(InternalError::from_response(format!("invalid {name}"), response).into())
        }
    }
}

/// 路径参数 `{id}`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafeIDI64(pub i64);

impl FromRequest for SafeIDI64 {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(parse_positive_id(req.match_info().get("id"), "id").map(SafeIDI64))
    }
}
