/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <JWT_TOKEN>`，通过 [`AuthGate`] 解析出调用方的
 * [`UserContext`] 并放入请求扩展，供后续处理程序使用。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::{web, App, HttpRequest, HttpResponse};
 * use crate::middlewares::RequireJWT;
 *
 * App::new().service(
 *     web::scope("/api")
 *         .wrap(RequireJWT)
 *         .route("/protected", web::get().to(handler)),
 * );
 *
 * async fn handler(req: HttpRequest) -> HttpResponse {
 *     match RequireJWT::extract_user_context(&req) {
 *         Ok(ctx) => HttpResponse::Ok().json(ctx),
 *         Err(_) => HttpResponse::Unauthorized().finish(),
 *     }
 * }
 * ```
 *
 * ## 认证流程
 *
 * 1. 提取 Bearer 令牌
 * 2. 校验签名、过期时间与 token 类型
 * 3. 从存储加载用户，以存储中的角色为准（结果按 token 缓存）
 * 4. 失败返回 401；存储不可用返回 500
 */

use crate::errors::{AttendSysError, Result};
use crate::models::{ErrorCode, auth::UserContext};
use crate::services::{AuthGate, error_status};
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, error, info};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

// 辅助函数：提取 Bearer 令牌
fn bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(|s| s.to_string())
}

async fn resolve_context(req: &ServiceRequest) -> Result<UserContext> {
    let gate = req
        .app_data::<actix_web::web::Data<AuthGate>>()
        .ok_or_else(|| AttendSysError::database_config("AuthGate not found in app data"))?
        .get_ref()
        .clone();

    gate.resolve(bearer_token(req).as_deref()).await
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::result::Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match resolve_context(&req).await {
                Ok(ctx) => {
                    debug!("JWT authentication successful for ID: {}", ctx.user_id);
                    req.extensions_mut().insert(ctx);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    let (status, code) = error_status(&err);
                    let message = if status.is_server_error() {
                        error!("Authentication unavailable for {}: {}", req.path(), err);
                        "Authentication is temporarily unavailable".to_string()
                    } else {
                        info!(
                            "JWT authentication failed for request to {}: {}",
                            req.path(),
                            err
                        );
                        format!("Unauthorized: {}", err.message())
                    };
                    Ok(req.into_response(
                        create_error_response(status, code, &message).map_into_right_body(),
                    ))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取用户信息
impl RequireJWT {
    /// 从请求扩展中提取调用方身份
    /// 此函数应该在应用了RequireJWT中间件的路由处理程序中使用
    pub fn extract_user_context(req: &actix_web::HttpRequest) -> Result<UserContext> {
        req.extensions()
            .get::<UserContext>()
            .cloned()
            .ok_or_else(|| AttendSysError::authentication("authentication required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::{Storage, test_support::MemoryStorage};
    use crate::utils::jwt::{ACCESS_TOKEN_TYPE, JwtUtils};
    use actix_web::{App, HttpRequest, HttpResponse, test, web};
    use std::sync::Arc;

    const SECRET: &str = "middleware-secret";

    async fn whoami(req: HttpRequest) -> HttpResponse {
        match RequireJWT::extract_user_context(&req) {
            Ok(ctx) => HttpResponse::Ok().json(ctx),
            Err(_) => HttpResponse::InternalServerError().finish(),
        }
    }

    #[actix_web::test]
    async fn test_context_is_injected_or_rejected() {
        let memory = MemoryStorage::new();
        memory.add_user(7, UserRole::Teacher);
        let storage: Arc<dyn Storage> = Arc::new(memory);
        let gate = AuthGate::new(SECRET, storage);

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(gate))
                .service(
                    web::scope("/api")
                        .wrap(RequireJWT)
                        .route("/me", web::get().to(whoami)),
                ),
        )
        .await;

        let token = JwtUtils::generate_token_with_expiry(
            SECRET,
            7,
            "teacher",
            ACCESS_TOKEN_TYPE,
            chrono::Duration::minutes(5),
        )
        .unwrap();

        let req = test::TestRequest::get()
            .uri("/api/me")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let ctx: UserContext = test::call_and_read_body_json(&app, req).await;
        assert_eq!(ctx, UserContext::new(7, UserRole::Teacher));

        let req = test::TestRequest::get().uri("/api/me").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
