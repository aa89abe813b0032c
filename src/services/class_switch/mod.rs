pub mod create;
pub mod get;
pub mod list;
pub mod respond;
pub mod validate;


use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::class_switch::requests::{
    CreateSwitchRequest, RespondSwitchRequest, SwitchRequestQueryParams,
};
use crate::storage::Storage;

pub struct ClassSwitchService {
    storage: Option<Arc<dyn Storage>>,
}

impl ClassSwitchService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(
        &self,
        request: &HttpRequest,
    ) -> Result<Arc<dyn Storage>, HttpResponse> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => crate::services::storage_from_request(request),
        }
    }

    // 获取调课申请列表
    pub async fn list_switch_requests(
        &self,
        request: &HttpRequest,
        params: SwitchRequestQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_switch_requests(self, request, params).await
    }

    // 发起调课申请
    pub async fn create_switch_request(
        &self,
        request: &HttpRequest,
        input: CreateSwitchRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_switch_request(self, request, input).await
    }

    // 获取单个调课申请
    pub async fn get_switch_request(
        &self,
        request: &HttpRequest,
        request_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_switch_request(self, request, request_id).await
    }

    // 接受或拒绝调课申请
    pub async fn respond_switch_request(
        &self,
        request: &HttpRequest,
        request_id: i64,
        body: RespondSwitchRequest,
    ) -> ActixResult<HttpResponse> {
        respond::respond_switch_request(self, request, request_id, body).await
    }
}

#[cfg(test)]
pub(crate) mod fixture {
    //! 调课业务测试的公共数据：
    //! 教师 A(1) 负责 C1(10)，教师 B(2) 负责 C2(20)、C3(21)，教师 D(4) 负责 C4(40)，管理员 3，学生 5

    use std::sync::Arc;

    use chrono::{Days, NaiveDate};

    use crate::models::{
        auth::UserContext, class_switch::requests::CreateSwitchRequest, users::entities::UserRole,
    };
    use crate::storage::{Storage, test_support::MemoryStorage};

    pub const A: i64 = 1;
    pub const B: i64 = 2;
    pub const ADMIN: i64 = 3;
    pub const D: i64 = 4;
    pub const STUDENT: i64 = 5;
    pub const C1: i64 = 10;
    pub const C2: i64 = 20;
    pub const C3: i64 = 21;
    pub const C4: i64 = 40;

    pub fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    pub fn tomorrow() -> NaiveDate {
        today().checked_add_days(Days::new(1)).unwrap()
    }

    pub fn yesterday() -> NaiveDate {
        today().checked_sub_days(Days::new(1)).unwrap()
    }

    pub fn teacher(id: i64) -> UserContext {
        UserContext::new(id, UserRole::Teacher)
    }

    pub fn admin() -> UserContext {
        UserContext::new(ADMIN, UserRole::Admin)
    }

    pub fn student() -> UserContext {
        UserContext::new(STUDENT, UserRole::Student)
    }

    pub struct Fixture {
        pub memory: Arc<MemoryStorage>,
        pub storage: Arc<dyn Storage>,
    }

    pub fn fixture() -> Fixture {
        let memory = Arc::new(MemoryStorage::new());
        memory.add_user(A, UserRole::Teacher);
        memory.add_user(B, UserRole::Teacher);
        memory.add_user(ADMIN, UserRole::Admin);
        memory.add_user(D, UserRole::Teacher);
        memory.add_user(STUDENT, UserRole::Student);
        memory.add_class(C1, A);
        memory.add_class(C2, B);
        memory.add_class(C3, B);
        memory.add_class(C4, D);
        let storage: Arc<dyn Storage> = memory.clone();
        Fixture { memory, storage }
    }

    pub fn input(
        requester_class_id: i64,
        target_teacher_id: i64,
        target_class_id: i64,
        date: NaiveDate,
    ) -> CreateSwitchRequest {
        CreateSwitchRequest {
            requester_class_id: Some(requester_class_id),
            target_teacher_id: Some(target_teacher_id),
            target_class_id: Some(target_class_id),
            switch_date: Some(date.format("%Y-%m-%d").to_string()),
            reason: Some("field trip".to_string()),
        }
    }
}
