//! 调课申请实体

use sea_orm::entity::prelude::*;

use crate::errors::AttendSysError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "class_switch_requests")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub requester_teacher_id: i64,
    pub requester_class_id: i64,
    pub target_teacher_id: i64,
    pub target_class_id: i64,
    pub switch_date: String,
    pub reason: Option<String>,
    pub status: String,
    pub target_teacher_accepted: bool,
    pub admin_notified: bool,
    // 活跃（pending/accepted）时为组合键，终态置空；列上有唯一索引
    #[sea_orm(unique)]
    pub active_slot: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::RequesterTeacherId",
        to = "super::users::Column::Id"
    )]
    RequesterTeacher,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::TargetTeacherId",
        to = "super::users::Column::Id"
    )]
    TargetTeacher,
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_switch_request(
        self,
    ) -> crate::errors::Result<crate::models::class_switch::entities::ClassSwitchRequest> {
        use crate::models::class_switch::entities::{ClassSwitchRequest, SwitchStatus};
        use chrono::{DateTime, NaiveDate, Utc};

        let switch_date = NaiveDate::parse_from_str(&self.switch_date, "%Y-%m-%d")?;
        let status = self.status.parse::<SwitchStatus>().map_err(|e| {
            AttendSysError::database_operation(format!("switch request {}: {e}", self.id))
        })?;

        Ok(ClassSwitchRequest {
            id: self.id,
            requester_teacher_id: self.requester_teacher_id,
            requester_class_id: self.requester_class_id,
            target_teacher_id: self.target_teacher_id,
            target_class_id: self.target_class_id,
            switch_date,
            reason: self.reason,
            status,
            target_teacher_accepted: self.target_teacher_accepted,
            admin_notified: self.admin_notified,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        })
    }
}
