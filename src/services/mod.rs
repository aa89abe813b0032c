pub mod auth;
pub mod class_switch;
pub mod classes;
pub mod notifications;

pub use auth::AuthGate;
pub use class_switch::ClassSwitchService;
pub use classes::ClassService;
pub use notifications::{NotificationDispatcher, NotificationService};

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, http::StatusCode};
use tracing::error;

use crate::errors::AttendSysError;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 从 app_data 中取出存储实例
pub(crate) fn storage_from_request(request: &HttpRequest) -> Result<Arc<dyn Storage>, HttpResponse> {
    request
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            error!("Storage not found in app data");
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "Storage is not configured",
            ))
        })
}

/// 业务错误到 HTTP 状态码与业务错误码的映射
pub(crate) fn error_status(err: &AttendSysError) -> (StatusCode, ErrorCode) {
    match err {
        AttendSysError::Authentication(_) => (StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized),
        AttendSysError::Authorization(_) => (StatusCode::FORBIDDEN, ErrorCode::Forbidden),
        AttendSysError::MissingField(_) => {
            (StatusCode::BAD_REQUEST, ErrorCode::SwitchMissingField)
        }
        AttendSysError::PastDate(_) => (StatusCode::BAD_REQUEST, ErrorCode::SwitchPastDate),
        AttendSysError::InvalidTarget(_) => {
            (StatusCode::BAD_REQUEST, ErrorCode::SwitchInvalidTarget)
        }
        AttendSysError::InvalidState(_) => {
            (StatusCode::BAD_REQUEST, ErrorCode::SwitchInvalidState)
        }
        AttendSysError::Validation(_) | AttendSysError::DateParse(_) => {
            (StatusCode::BAD_REQUEST, ErrorCode::BadRequest)
        }
        AttendSysError::DuplicateRequest(_) => (StatusCode::CONFLICT, ErrorCode::SwitchDuplicate),
        AttendSysError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NotFound),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalServerError,
        ),
    }
}

pub(crate) fn error_response(err: &AttendSysError) -> HttpResponse {
    let (status, code) = error_status(err);
    if status.is_server_error() {
        if err.is_dependency_failure() {
            error!("Data store unavailable: {}", err);
        } else {
            error!("Request failed: {}", err);
        }
        // 不向调用方暴露数据库细节
        return HttpResponse::build(status).json(ApiResponse::error_empty(
            code,
            format!("{} ({})", err.error_type(), err.code()),
        ));
    }
    HttpResponse::build(status).json(ApiResponse::error_empty(code, err.message()))
}
