use serde::{Deserialize, Serialize};

use crate::models::users::entities::UserRole;

/// 通知接收方：按角色广播或发给指定用户
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Recipient {
    Role(UserRole),
    User(i64),
}

/// 通知
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: i64,
    pub title: String,
    pub message: String,
    pub sender_id: i64,
    pub recipient_role: Option<UserRole>,
    pub recipient_user_id: Option<i64>,
    // 关联对象，如 ("class_switch", 申请ID)
    pub reference_type: Option<String>,
    pub reference_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Notification {
    pub fn recipient(&self) -> Option<Recipient> {
        match (&self.recipient_user_id, &self.recipient_role) {
            (Some(user_id), _) => Some(Recipient::User(*user_id)),
            (None, Some(role)) => Some(Recipient::Role(role.clone())),
            (None, None) => None,
        }
    }
}

/// 尽力而为的通知副作用结果
///
/// 通知失败不会回滚触发它的状态迁移，但结果会如实返回给调用方。
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DispatchOutcome {
    NotRequired,
    Delivered { notification: Notification },
    Failed { reason: String },
}

impl DispatchOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DispatchOutcome::Delivered { .. })
    }
}
