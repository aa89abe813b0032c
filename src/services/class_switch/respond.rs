//! 目标教师响应调课申请
//!
//! 拒绝：pending → rejected，无通知。
//! 接受：pending → accepted → completed 在同一条条件更新里落库，随后通知管理员，
//! 通知写入成功后再标记 `admin_notified`。申请不会停留在 accepted。
//! 通知或标记失败都不会回滚状态迁移。
//! 并发响应中落败的一方得到 InvalidState。

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info, warn};

use super::ClassSwitchService;
use crate::errors::{AttendSysError, Result};
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    auth::UserContext,
    class_switch::{
        entities::{ClassSwitchRequest, SwitchAction, SwitchEvent},
        requests::{RespondSwitchRequest, SwitchTransition},
        responses::RespondOutcome,
    },
    notifications::{
        entities::{DispatchOutcome, Recipient},
        requests::CreateNotificationRequest,
    },
    users::entities::UserRole,
};
use crate::services::{NotificationDispatcher, error_response};
use crate::storage::Storage;

pub const NOTIFICATION_REFERENCE_TYPE: &str = "class_switch";

pub async fn respond_to_request(
    storage: &Arc<dyn Storage>,
    ctx: &UserContext,
    request_id: i64,
    action: SwitchAction,
) -> Result<RespondOutcome> {
    let current = storage
        .get_switch_request_by_id(request_id)
        .await?
        .ok_or_else(|| AttendSysError::not_found(format!("switch request {request_id} not found")))?;

    if current.target_teacher_id != ctx.user_id {
        return Err(AttendSysError::authorization(
            "only the target teacher can respond to this request",
        ));
    }

    let next = current.status.transition(action.event())?;
    let accepted = action == SwitchAction::Accept;
    let settled = if accepted {
        next.transition(SwitchEvent::Complete)?
    } else {
        next
    };

    let answered = apply(
        storage,
        request_id,
        SwitchTransition::new(current.status, settled).with_target_teacher_accepted(accepted),
    )
    .await?;
    info!(
        "Switch request {} {} by teacher {}",
        request_id, answered.status, ctx.user_id
    );

    if !accepted {
        return Ok(RespondOutcome {
            request: answered,
            notification: DispatchOutcome::NotRequired,
        });
    }

    let notification = NotificationDispatcher::new(storage.clone())
        .notify(completion_notice(storage, ctx, &answered).await)
        .await;

    let request = if notification.is_delivered() {
        mark_admin_notified(storage, answered).await
    } else {
        answered
    };
    info!(
        "Switch request {} completed, admin notified: {}",
        request_id, request.admin_notified
    );

    Ok(RespondOutcome {
        request,
        notification,
    })
}

async fn apply(
    storage: &Arc<dyn Storage>,
    request_id: i64,
    transition: SwitchTransition,
) -> Result<ClassSwitchRequest> {
    storage
        .transition_switch_request(request_id, transition)
        .await?
        .ok_or_else(|| {
            warn!(
                "Switch request {} was no longer {} when applying transition to {}",
                request_id, transition.from, transition.to
            );
            AttendSysError::invalid_state(format!(
                "switch request {request_id} is no longer {}",
                transition.from
            ))
        })
}

// 标记失败只记录日志，申请保持 completed
async fn mark_admin_notified(
    storage: &Arc<dyn Storage>,
    completed: ClassSwitchRequest,
) -> ClassSwitchRequest {
    let flag = SwitchTransition::new(completed.status, completed.status).with_admin_notified(true);
    match storage.transition_switch_request(completed.id, flag).await {
        Ok(Some(updated)) => updated,
        Ok(None) => {
            error!(
                "Switch request {} left {} before admin_notified could be recorded",
                completed.id, completed.status
            );
            completed
        }
        Err(e) => {
            error!(
                "Failed to record admin notification for switch request {}: {}",
                completed.id, e
            );
            completed
        }
    }
}

/// 发给管理员的完成通知，文案里带上双方教师姓名与日期
async fn completion_notice(
    storage: &Arc<dyn Storage>,
    ctx: &UserContext,
    request: &ClassSwitchRequest,
) -> CreateNotificationRequest {
    let requester = teacher_name(storage, request.requester_teacher_id).await;
    let target = teacher_name(storage, request.target_teacher_id).await;
    let requester_class = class_label(storage, request.requester_class_id).await;
    let target_class = class_label(storage, request.target_class_id).await;

    CreateNotificationRequest {
        title: "Class switch completed".to_string(),
        message: format!(
            "{requester} and {target} have agreed to switch {requester_class} and {target_class} on {}.",
            request.switch_date.format("%Y-%m-%d")
        ),
        sender_id: ctx.user_id,
        recipient: Recipient::Role(UserRole::Admin),
        reference_type: Some(NOTIFICATION_REFERENCE_TYPE.to_string()),
        reference_id: Some(request.id),
    }
}

// 查不到姓名时退回到 ID，不影响通知
async fn teacher_name(storage: &Arc<dyn Storage>, teacher_id: i64) -> String {
    match storage.get_user_by_id(teacher_id).await {
        Ok(Some(user)) => user.full_name,
        _ => format!("teacher #{teacher_id}"),
    }
}

async fn class_label(storage: &Arc<dyn Storage>, class_id: i64) -> String {
    match storage.get_class_by_id(class_id).await {
        Ok(Some(class)) => class.label(),
        _ => format!("class #{class_id}"),
    }
}

pub async fn respond_switch_request(
    service: &ClassSwitchService,
    request: &HttpRequest,
    request_id: i64,
    body: RespondSwitchRequest,
) -> ActixResult<HttpResponse> {
    let ctx = match RequireJWT::extract_user_context(request) {
        Ok(ctx) => ctx,
        Err(e) => return Ok(error_response(&e)),
    };
    let action = match body.action.as_deref() {
        Some(raw) => match raw.parse::<SwitchAction>() {
            Ok(action) => action,
            Err(e) => return Ok(error_response(&e)),
        },
        None => {
            return Ok(error_response(&AttendSysError::missing_field(
                "action is required",
            )));
        }
    };
    let storage = match service.get_storage(request) {
        Ok(storage) => storage,
        Err(resp) => return Ok(resp),
    };

    match respond_to_request(&storage, &ctx, request_id, action).await {
        Ok(outcome) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            outcome,
            "Switch request updated successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
