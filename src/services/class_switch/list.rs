use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassSwitchService;
use crate::errors::{AttendSysError, Result};
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    auth::UserContext,
    class_switch::{
        entities::{ClassSwitchRequest, SwitchStatus},
        requests::{SwitchRequestListQuery, SwitchRequestQueryParams},
        responses::SwitchRequestListResponse,
    },
    users::entities::UserRole,
};
use crate::services::error_response;
use crate::storage::Storage;

/// 教师只能看到自己参与的申请，管理员看到全部；最新的在前
pub async fn list_requests(
    storage: &Arc<dyn Storage>,
    ctx: &UserContext,
    status: Option<SwitchStatus>,
) -> Result<Vec<ClassSwitchRequest>> {
    ctx.require_any_role(UserRole::staff_roles())?;

    let participant_id = match ctx.role {
        UserRole::Admin => None,
        _ => Some(ctx.user_id),
    };

    storage
        .list_switch_requests(SwitchRequestListQuery {
            participant_id,
            status,
        })
        .await
}

fn parse_status_filter(params: &SwitchRequestQueryParams) -> Result<Option<SwitchStatus>> {
    match params.status.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<SwitchStatus>()
            .map(Some)
            .map_err(AttendSysError::validation),
    }
}

pub async fn list_switch_requests(
    service: &ClassSwitchService,
    request: &HttpRequest,
    params: SwitchRequestQueryParams,
) -> ActixResult<HttpResponse> {
    let ctx = match RequireJWT::extract_user_context(request) {
        Ok(ctx) => ctx,
        Err(e) => return Ok(error_response(&e)),
    };
    let status = match parse_status_filter(&params) {
        Ok(status) => status,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = match service.get_storage(request) {
        Ok(storage) => storage,
        Err(resp) => return Ok(resp),
    };

    match list_requests(&storage, &ctx, status).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SwitchRequestListResponse { items },
            "Switch requests retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
