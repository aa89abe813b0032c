use chrono::NaiveDate;
use serde::Deserialize;

use super::entities::SwitchStatus;

// 创建调课申请（来自HTTP请求）
//
// 字段均为可选，缺失由校验器统一报告为 MissingField，而不是 JSON 解析错误。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSwitchRequest {
    pub requester_class_id: Option<i64>,
    pub target_teacher_id: Option<i64>,
    pub target_class_id: Option<i64>,
    // YYYY-MM-DD
    pub switch_date: Option<String>,
    pub reason: Option<String>,
}

// 响应调课申请
#[derive(Debug, Clone, Deserialize)]
pub struct RespondSwitchRequest {
    pub action: Option<String>,
}

// 调课申请列表查询参数（来自HTTP请求）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SwitchRequestQueryParams {
    pub status: Option<String>,
}

// 调课申请列表查询（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct SwitchRequestListQuery {
    // 仅返回该用户作为申请方或目标方的申请；None 表示全部
    pub participant_id: Option<i64>,
    pub status: Option<SwitchStatus>,
}

/// 通过校验、待持久化的调课申请
#[derive(Debug, Clone, PartialEq)]
pub struct NewClassSwitchRequest {
    pub requester_teacher_id: i64,
    pub requester_class_id: i64,
    pub target_teacher_id: i64,
    pub target_class_id: i64,
    pub switch_date: NaiveDate,
    pub reason: Option<String>,
}

/// 一次条件状态迁移：仅当当前状态为 `from` 时生效
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwitchTransition {
    pub from: SwitchStatus,
    pub to: SwitchStatus,
    pub target_teacher_accepted: Option<bool>,
    pub admin_notified: Option<bool>,
}

impl SwitchTransition {
    pub fn new(from: SwitchStatus, to: SwitchStatus) -> Self {
        Self {
            from,
            to,
            target_teacher_accepted: None,
            admin_notified: None,
        }
    }

    pub fn with_target_teacher_accepted(mut self, accepted: bool) -> Self {
        self.target_teacher_accepted = Some(accepted);
        self
    }

    pub fn with_admin_notified(mut self, notified: bool) -> Self {
        self.admin_notified = Some(notified);
        self
    }
}
