use serde::Serialize;

use super::entities::ClassSwitchRequest;
use crate::models::notifications::entities::DispatchOutcome;

// 调课申请列表响应（按创建时间倒序）
#[derive(Debug, Serialize)]
pub struct SwitchRequestListResponse {
    pub items: Vec<ClassSwitchRequest>,
}

/// 响应操作的结果：主流程结果与通知副作用结果分开呈现
#[derive(Debug, Clone, Serialize)]
pub struct RespondOutcome {
    pub request: ClassSwitchRequest,
    pub notification: DispatchOutcome,
}
