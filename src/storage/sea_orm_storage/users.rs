//! 用户存储操作（只读）

use super::SeaOrmStorage;
use crate::entity::users::Entity as Users;
use crate::errors::{AttendSysError, Result};
use crate::models::users::entities::User;
use sea_orm::EntityTrait;

impl SeaOrmStorage {
    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AttendSysError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }
}
