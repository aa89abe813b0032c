use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::NaiveDate;
use tracing::info;

use super::{ClassSwitchService, validate::validate_create};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    auth::UserContext,
    class_switch::{entities::ClassSwitchRequest, requests::CreateSwitchRequest},
};
use crate::services::error_response;
use crate::storage::Storage;

/// 校验后持久化一条 pending 申请
pub async fn create_request(
    storage: &Arc<dyn Storage>,
    ctx: &UserContext,
    input: CreateSwitchRequest,
    today: NaiveDate,
) -> Result<ClassSwitchRequest> {
    let validated = validate_create(storage, ctx, &input, today).await?;
    let created = storage.create_switch_request(validated).await?;

    info!(
        "Switch request {} created by teacher {}: class {} -> class {} on {}",
        created.id,
        created.requester_teacher_id,
        created.requester_class_id,
        created.target_class_id,
        created.switch_date
    );
    Ok(created)
}

pub async fn create_switch_request(
    service: &ClassSwitchService,
    request: &HttpRequest,
    input: CreateSwitchRequest,
) -> ActixResult<HttpResponse> {
    let ctx = match RequireJWT::extract_user_context(request) {
        Ok(ctx) => ctx,
        Err(e) => return Ok(error_response(&e)),
    };
    let storage = match service.get_storage(request) {
        Ok(storage) => storage,
        Err(resp) => return Ok(resp),
    };

    let today = AppConfig::get().local_today();
    match create_request(&storage, &ctx, input, today).await {
        Ok(created) => Ok(HttpResponse::Created().json(ApiResponse::success(
            created,
            "Switch request created successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::class_switch::entities::{SwitchAction, SwitchStatus};
    use crate::services::class_switch::fixture::*;
    use crate::services::class_switch::respond::respond_to_request;

    #[tokio::test]
    async fn test_valid_request_is_created_pending() {
        let f = fixture();

        let created = create_request(&f.storage, &teacher(A), input(C1, B, C2, tomorrow()), today())
            .await
            .unwrap();

        assert_eq!(created.status, SwitchStatus::Pending);
        assert_eq!(created.requester_teacher_id, A);
        assert_eq!(created.target_teacher_id, B);
        assert!(!created.target_teacher_accepted);
        assert!(!created.admin_notified);
        assert_eq!(created.reason.as_deref(), Some("field trip"));
    }

    #[tokio::test]
    async fn test_today_is_not_a_past_date() {
        let f = fixture();
        let created = create_request(&f.storage, &teacher(A), input(C1, B, C2, today()), today())
            .await
            .unwrap();
        assert_eq!(created.switch_date, today());
    }

    #[tokio::test]
    async fn test_second_request_before_response_is_duplicate() {
        let f = fixture();

        create_request(&f.storage, &teacher(A), input(C1, B, C2, tomorrow()), today())
            .await
            .unwrap();
        let err = create_request(&f.storage, &teacher(A), input(C1, B, C2, tomorrow()), today())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E016");
        assert_eq!(f.memory.requests().len(), 1);

        // 其他班级或日期不受影响
        create_request(&f.storage, &teacher(A), input(C1, B, C3, tomorrow()), today())
            .await
            .unwrap();
        create_request(&f.storage, &teacher(A), input(C1, B, C2, today()), today())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_rejected_or_completed_requests_do_not_block() {
        let f = fixture();

        let first = create_request(&f.storage, &teacher(A), input(C1, B, C2, tomorrow()), today())
            .await
            .unwrap();
        respond_to_request(&f.storage, &teacher(B), first.id, SwitchAction::Reject)
            .await
            .unwrap();

        let second = create_request(&f.storage, &teacher(A), input(C1, B, C2, tomorrow()), today())
            .await
            .unwrap();
        respond_to_request(&f.storage, &teacher(B), second.id, SwitchAction::Accept)
            .await
            .unwrap();

        let third = create_request(&f.storage, &teacher(A), input(C1, B, C2, tomorrow()), today())
            .await
            .unwrap();
        assert_eq!(third.status, SwitchStatus::Pending);
    }
}
