use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::NotificationService;
use crate::errors::Result;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    auth::UserContext,
    notifications::{requests::NotificationListQuery, responses::NotificationListResponse},
};
use crate::services::error_response;
use crate::storage::Storage;

/// 发给本人或本人角色的通知，最新的在前
pub async fn list_for_user(
    storage: &Arc<dyn Storage>,
    ctx: &UserContext,
    query: NotificationListQuery,
) -> Result<NotificationListResponse> {
    storage
        .list_notifications_with_pagination(ctx.user_id, &ctx.role, query)
        .await
}

pub async fn list_notifications(
    service: &NotificationService,
    request: &HttpRequest,
    query: NotificationListQuery,
) -> ActixResult<HttpResponse> {
    let ctx = match RequireJWT::extract_user_context(request) {
        Ok(ctx) => ctx,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = match service.get_storage(request) {
        Ok(storage) => storage,
        Err(resp) => return Ok(resp),
    };

    match list_for_user(&storage, &ctx, query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Notifications retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
