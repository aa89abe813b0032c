use serde::{Deserialize, Serialize};

use crate::errors::{AttendSysError, Result};
use crate::models::users::entities::UserRole;

/// 已解析的调用方身份
///
/// 由鉴权网关根据 Bearer 令牌生成，注入到每个业务操作中。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserContext {
    pub user_id: i64,
    pub role: UserRole,
}

impl UserContext {
    pub fn new(user_id: i64, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// 要求调用方具有指定角色，否则返回 Authorization 错误
    pub fn require_role(&self, role: &UserRole) -> Result<&Self> {
        if &self.role == role {
            Ok(self)
        } else {
            Err(AttendSysError::authorization(format!(
                "this operation requires the {role} role"
            )))
        }
    }

    /// 要求调用方具有任一角色
    pub fn require_any_role(&self, roles: &[&UserRole]) -> Result<&Self> {
        if roles.iter().any(|r| **r == self.role) {
            Ok(self)
        } else {
            Err(AttendSysError::authorization(format!(
                "role {} is not allowed to perform this operation",
                self.role
            )))
        }
    }
}
