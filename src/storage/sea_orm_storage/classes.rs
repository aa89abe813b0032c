//! 班级存储操作（只读）

use super::SeaOrmStorage;
use crate::entity::classes::{Column, Entity as Classes};
use crate::errors::{AttendSysError, Result};
use crate::models::{
    PaginationInfo,
    classes::{entities::Class, requests::ClassListQuery, responses::ClassListResponse},
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

impl SeaOrmStorage {
    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| AttendSysError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 分页列出班级
    pub async fn list_classes_with_pagination_impl(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Classes::find();

        // 教师筛选
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }

        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| AttendSysError::database_operation(format!("查询班级总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| AttendSysError::database_operation(format!("查询班级页数失败: {e}")))?;

        let classes = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| AttendSysError::database_operation(format!("查询班级列表失败: {e}")))?;

        Ok(ClassListResponse {
            items: classes.into_iter().map(|m| m.into_class()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixture::setup;
    use crate::models::classes::requests::ClassListQuery;
    use crate::storage::Storage;

    #[tokio::test]
    async fn test_get_class_by_id() {
        let storage = setup().await;

        let class = storage.get_class_by_id(11).await.unwrap().unwrap();
        assert!(class.is_owned_by(2));
        assert!(storage.get_class_by_id(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_classes_filters_by_teacher() {
        let storage = setup().await;

        let resp = storage
            .list_classes_with_pagination(ClassListQuery {
                teacher_id: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(resp.pagination.total, 2);
        // 最新创建的在前
        assert_eq!(resp.items[0].id, 12);
        assert_eq!(resp.items[1].id, 11);
    }
}
