use serde::Deserialize;

use super::entities::Recipient;
use crate::models::PaginationQuery;

/// 创建通知请求（存储层）
#[derive(Debug, Clone, PartialEq)]
pub struct CreateNotificationRequest {
    pub title: String,
    pub message: String,
    pub sender_id: i64,
    pub recipient: Recipient,
    pub reference_type: Option<String>,
    pub reference_id: Option<i64>,
}

/// 通知列表查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationListQuery {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
}
