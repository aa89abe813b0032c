use crate::models::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;
use serde::Deserialize;

// 班级查询参数（来自HTTP请求）
#[derive(Debug, Deserialize)]
pub struct ClassQueryParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub teacher_id: Option<i64>,
}

// 班级列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct ClassListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub teacher_id: Option<i64>,
}
