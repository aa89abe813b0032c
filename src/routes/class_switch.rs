use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::class_switch::requests::{
    CreateSwitchRequest, RespondSwitchRequest, SwitchRequestQueryParams,
};
use crate::models::users::entities::UserRole;
use crate::services::ClassSwitchService;
use crate::utils::SafeIDI64;

// 懒加载的全局 CLASS_SWITCH_SERVICE 实例
static CLASS_SWITCH_SERVICE: Lazy<ClassSwitchService> = Lazy::new(ClassSwitchService::new_lazy);

// HTTP处理程序
pub async fn list_switch_requests(
    req: HttpRequest,
    query: web::Query<SwitchRequestQueryParams>,
) -> ActixResult<HttpResponse> {
    CLASS_SWITCH_SERVICE
        .list_switch_requests(&req, query.into_inner())
        .await
}

pub async fn create_switch_request(
    req: HttpRequest,
    body: web::Json<CreateSwitchRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SWITCH_SERVICE
        .create_switch_request(&req, body.into_inner())
        .await
}

pub async fn get_switch_request(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    CLASS_SWITCH_SERVICE.get_switch_request(&req, id.0).await
}

pub async fn respond_switch_request(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<RespondSwitchRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SWITCH_SERVICE
        .respond_switch_request(&req, id.0, body.into_inner())
        .await
}

// 配置路由
//
// 创建与响应的角色检查在服务层按校验顺序进行
pub fn configure_class_switch_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/class-switch-requests")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_switch_requests)
                            // 教师查看自己参与的申请，管理员查看全部
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    )
                    .route(web::post().to(create_switch_request)),
            )
            .service(
                web::resource("/{id}").route(
                    web::get()
                        .to(get_switch_request)
                        .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                ),
            )
            .service(
                web::resource("/{id}/respond").route(web::post().to(respond_switch_request)),
            ),
    );
}
