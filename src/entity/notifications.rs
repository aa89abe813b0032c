//! 通知实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub sender_id: i64,
    pub recipient_role: Option<String>,
    pub recipient_user_id: Option<i64>,
    pub reference_type: Option<String>,
    pub reference_id: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_notification(self) -> crate::models::notifications::entities::Notification {
        use crate::models::notifications::entities::Notification;
        use crate::models::users::entities::UserRole;
        use chrono::{DateTime, Utc};

        Notification {
            id: self.id,
            title: self.title,
            message: self.message,
            sender_id: self.sender_id,
            recipient_role: self
                .recipient_role
                .and_then(|r| r.parse::<UserRole>().ok()),
            recipient_user_id: self.recipient_user_id,
            reference_type: self.reference_type,
            reference_id: self.reference_id,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
