//! 调课申请存储操作
//!
//! 重复申请由 `active_slot` 唯一索引在数据库层兜底；状态迁移使用
//! `UPDATE ... WHERE id = ? AND status = ?` 条件更新，并发响应只有一个会成功。

use super::SeaOrmStorage;
use crate::entity::class_switch_requests::{ActiveModel, Column, Entity as SwitchRequests};
use crate::errors::{AttendSysError, Result};
use crate::models::class_switch::{
    entities::{ClassSwitchRequest, SwitchStatus, active_slot_key},
    requests::{NewClassSwitchRequest, SwitchRequestListQuery, SwitchTransition},
};
use chrono::NaiveDate;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};
use tracing::debug;

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
        || err.to_string().contains("UNIQUE constraint failed")
}

impl SeaOrmStorage {
    /// 创建调课申请（pending）
    pub async fn create_switch_request_impl(
        &self,
        req: NewClassSwitchRequest,
    ) -> Result<ClassSwitchRequest> {
        let now = chrono::Utc::now().timestamp();
        let slot = active_slot_key(req.requester_class_id, req.target_class_id, req.switch_date);

        let model = ActiveModel {
            requester_teacher_id: Set(req.requester_teacher_id),
            requester_class_id: Set(req.requester_class_id),
            target_teacher_id: Set(req.target_teacher_id),
            target_class_id: Set(req.target_class_id),
            switch_date: Set(req.switch_date.format("%Y-%m-%d").to_string()),
            reason: Set(req.reason),
            status: Set(SwitchStatus::Pending.to_string()),
            target_teacher_accepted: Set(false),
            admin_notified: Set(false),
            active_slot: Set(Some(slot.clone())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                debug!("Active switch request slot {} already taken", slot);
                AttendSysError::duplicate_request(
                    "a pending or accepted request already exists for these classes on this date",
                )
            } else {
                AttendSysError::database_operation(format!("创建调课申请失败: {e}"))
            }
        })?;

        result.into_switch_request()
    }

    /// 通过 ID 获取调课申请
    pub async fn get_switch_request_by_id_impl(
        &self,
        id: i64,
    ) -> Result<Option<ClassSwitchRequest>> {
        let result = SwitchRequests::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AttendSysError::database_operation(format!("查询调课申请失败: {e}")))?;

        result.map(|m| m.into_switch_request()).transpose()
    }

    /// 查找同一组合下的活跃申请
    pub async fn find_active_switch_request_impl(
        &self,
        requester_class_id: i64,
        target_class_id: i64,
        switch_date: NaiveDate,
    ) -> Result<Option<ClassSwitchRequest>> {
        let slot = active_slot_key(requester_class_id, target_class_id, switch_date);

        let result = SwitchRequests::find()
            .filter(Column::ActiveSlot.eq(slot))
            .one(&self.db)
            .await
            .map_err(|e| AttendSysError::database_operation(format!("查询调课申请失败: {e}")))?;

        result.map(|m| m.into_switch_request()).transpose()
    }

    /// 条件状态迁移
    pub async fn transition_switch_request_impl(
        &self,
        id: i64,
        transition: SwitchTransition,
    ) -> Result<Option<ClassSwitchRequest>> {
        let now = chrono::Utc::now().timestamp();

        let mut update = SwitchRequests::update_many()
            .col_expr(Column::Status, Expr::value(transition.to.to_string()))
            .col_expr(Column::UpdatedAt, Expr::value(now));

        if let Some(accepted) = transition.target_teacher_accepted {
            update = update.col_expr(Column::TargetTeacherAccepted, Expr::value(accepted));
        }

        if let Some(notified) = transition.admin_notified {
            update = update.col_expr(Column::AdminNotified, Expr::value(notified));
        }

        // 进入终态后释放唯一名额
        if !transition.to.occupies_slot() {
            update = update.col_expr(Column::ActiveSlot, Expr::value(Option::<String>::None));
        }

        let result = update
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(transition.from.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| AttendSysError::database_operation(format!("更新调课申请失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_switch_request_by_id_impl(id).await
    }

    /// 列出调课申请，最新的在前
    pub async fn list_switch_requests_impl(
        &self,
        query: SwitchRequestListQuery,
    ) -> Result<Vec<ClassSwitchRequest>> {
        let mut select = SwitchRequests::find();

        if let Some(user_id) = query.participant_id {
            select = select.filter(
                Condition::any()
                    .add(Column::RequesterTeacherId.eq(user_id))
                    .add(Column::TargetTeacherId.eq(user_id)),
            );
        }

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let models = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| AttendSysError::database_operation(format!("查询调课申请列表失败: {e}")))?;

        models
            .into_iter()
            .map(|m| m.into_switch_request())
            .collect()
    }
}
