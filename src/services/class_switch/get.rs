use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassSwitchService;
use crate::errors::{AttendSysError, Result};
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, auth::UserContext, class_switch::entities::ClassSwitchRequest};
use crate::services::error_response;
use crate::storage::Storage;

/// 申请双方或管理员可查看
pub async fn get_request(
    storage: &Arc<dyn Storage>,
    ctx: &UserContext,
    request_id: i64,
) -> Result<ClassSwitchRequest> {
    let found = storage
        .get_switch_request_by_id(request_id)
        .await?
        .ok_or_else(|| AttendSysError::not_found(format!("switch request {request_id} not found")))?;

    if ctx.is_admin() || found.involves(ctx.user_id) {
        Ok(found)
    } else {
        Err(AttendSysError::authorization(
            "only the teachers involved or an admin can view this request",
        ))
    }
}

pub async fn get_switch_request(
    service: &ClassSwitchService,
    request: &HttpRequest,
    request_id: i64,
) -> ActixResult<HttpResponse> {
    let ctx = match RequireJWT::extract_user_context(request) {
        Ok(ctx) => ctx,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = match service.get_storage(request) {
        Ok(storage) => storage,
        Err(resp) => return Ok(resp),
    };

    match get_request(&storage, &ctx, request_id).await {
        Ok(found) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            found,
            "Switch request retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
