//! 实体存储层
//!
//! `Storage` 是业务层唯一依赖的持久化接口。用户与班级只读，
//! 调课申请与通知由本服务写入。

use std::sync::Arc;

use chrono::NaiveDate;

use crate::models::{
    class_switch::{
        entities::ClassSwitchRequest,
        requests::{NewClassSwitchRequest, SwitchRequestListQuery, SwitchTransition},
    },
    classes::{entities::Class, requests::ClassListQuery, responses::ClassListResponse},
    notifications::{
        entities::Notification,
        requests::{CreateNotificationRequest, NotificationListQuery},
        responses::NotificationListResponse,
    },
    users::entities::{User, UserRole},
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[cfg(test)]
pub(crate) mod test_support;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户（只读）
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;

    /// 班级（只读）
    // 通过ID获取班级信息
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    // 列出班级
    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse>;

    /// 调课申请
    // 创建 pending 状态的申请；同一组合已有活跃申请时返回 DuplicateRequest
    async fn create_switch_request(
        &self,
        request: NewClassSwitchRequest,
    ) -> Result<ClassSwitchRequest>;
    // 通过ID获取申请
    async fn get_switch_request_by_id(&self, id: i64) -> Result<Option<ClassSwitchRequest>>;
    // 查找同一组合下处于 pending / accepted 的申请
    async fn find_active_switch_request(
        &self,
        requester_class_id: i64,
        target_class_id: i64,
        switch_date: NaiveDate,
    ) -> Result<Option<ClassSwitchRequest>>;
    // 条件迁移：仅当当前状态等于 transition.from 时更新，否则返回 None
    async fn transition_switch_request(
        &self,
        id: i64,
        transition: SwitchTransition,
    ) -> Result<Option<ClassSwitchRequest>>;
    // 列出申请，按创建时间倒序
    async fn list_switch_requests(
        &self,
        query: SwitchRequestListQuery,
    ) -> Result<Vec<ClassSwitchRequest>>;

    /// 通知
    // 创建通知
    async fn create_notification(&self, request: CreateNotificationRequest)
    -> Result<Notification>;
    // 列出发给该用户或其角色的通知
    async fn list_notifications_with_pagination(
        &self,
        user_id: i64,
        role: &UserRole,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
