use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{AttendSysError, Result};

/// 调课申请的生命周期状态
///
/// pending → accepted → completed，或 pending → rejected。
/// rejected 与 completed 为终态。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SwitchStatus {
    Pending,
    Accepted,
    Rejected,
    Completed,
}

/// 驱动状态迁移的事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchEvent {
    Accept,
    Reject,
    Complete,
}

impl SwitchStatus {
    pub const PENDING: &'static str = "pending";
    pub const ACCEPTED: &'static str = "accepted";
    pub const REJECTED: &'static str = "rejected";
    pub const COMPLETED: &'static str = "completed";

    /// 状态迁移表，非法迁移返回 InvalidState
    pub fn transition(self, event: SwitchEvent) -> Result<SwitchStatus> {
        match (self, event) {
            (SwitchStatus::Pending, SwitchEvent::Accept) => Ok(SwitchStatus::Accepted),
            (SwitchStatus::Pending, SwitchEvent::Reject) => Ok(SwitchStatus::Rejected),
            (SwitchStatus::Accepted, SwitchEvent::Complete) => Ok(SwitchStatus::Completed),
            (status, event) => Err(AttendSysError::invalid_state(format!(
                "cannot apply {event:?} to a request in {status} state"
            ))),
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SwitchStatus::Rejected | SwitchStatus::Completed)
    }

    /// pending / accepted 的申请占用同一组合的唯一名额
    pub fn occupies_slot(self) -> bool {
        !self.is_terminal()
    }
}

impl std::fmt::Display for SwitchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SwitchStatus::Pending => SwitchStatus::PENDING,
            SwitchStatus::Accepted => SwitchStatus::ACCEPTED,
            SwitchStatus::Rejected => SwitchStatus::REJECTED,
            SwitchStatus::Completed => SwitchStatus::COMPLETED,
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for SwitchStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            SwitchStatus::PENDING => Ok(SwitchStatus::Pending),
            SwitchStatus::ACCEPTED => Ok(SwitchStatus::Accepted),
            SwitchStatus::REJECTED => Ok(SwitchStatus::Rejected),
            SwitchStatus::COMPLETED => Ok(SwitchStatus::Completed),
            _ => Err(format!("Invalid switch status: {s}")),
        }
    }
}

/// 目标教师的响应动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchAction {
    Accept,
    Reject,
}

impl SwitchAction {
    pub fn event(self) -> SwitchEvent {
        match self {
            SwitchAction::Accept => SwitchEvent::Accept,
            SwitchAction::Reject => SwitchEvent::Reject,
        }
    }
}

impl std::str::FromStr for SwitchAction {
    type Err = AttendSysError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "accept" => Ok(SwitchAction::Accept),
            "reject" => Ok(SwitchAction::Reject),
            other => Err(AttendSysError::validation(format!(
                "invalid action '{other}', expected accept or reject"
            ))),
        }
    }
}

/// 调课申请
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassSwitchRequest {
    pub id: i64,
    pub requester_teacher_id: i64,
    pub requester_class_id: i64,
    pub target_teacher_id: i64,
    pub target_class_id: i64,
    pub switch_date: NaiveDate,
    pub reason: Option<String>,
    pub status: SwitchStatus,
    pub target_teacher_accepted: bool,
    pub admin_notified: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl ClassSwitchRequest {
    /// 是否为申请方或目标方
    pub fn involves(&self, user_id: i64) -> bool {
        self.requester_teacher_id == user_id || self.target_teacher_id == user_id
    }
}

/// 同一 (发起班级, 目标班级, 日期) 组合的唯一键
pub fn active_slot_key(
    requester_class_id: i64,
    target_class_id: i64,
    switch_date: NaiveDate,
) -> String {
    format!(
        "{requester_class_id}:{target_class_id}:{}",
        switch_date.format("%Y-%m-%d")
    )
}
