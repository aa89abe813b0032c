use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::errors::Result;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    classes::{
        requests::{ClassListQuery, ClassQueryParams},
        responses::ClassListResponse,
    },
};
use crate::services::error_response;
use crate::storage::Storage;

/// 只读的班级列表，供教师挑选目标班级
pub async fn list_all(
    storage: &Arc<dyn Storage>,
    query: ClassQueryParams,
) -> Result<ClassListResponse> {
    let list_query = ClassListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        teacher_id: query.teacher_id,
    };
    storage.list_classes_with_pagination(list_query).await
}

pub async fn list_classes(
    service: &ClassService,
    request: &HttpRequest,
    query: ClassQueryParams,
) -> ActixResult<HttpResponse> {
    if let Err(e) = RequireJWT::extract_user_context(request) {
        return Ok(error_response(&e));
    }
    let storage = match service.get_storage(request) {
        Ok(storage) => storage,
        Err(resp) => return Ok(resp),
    };

    match list_all(&storage, query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Class list retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaginationQuery;
    use crate::storage::test_support::MemoryStorage;

    #[tokio::test]
    async fn test_teacher_filter() {
        let memory = MemoryStorage::new();
        memory.add_class(10, 1);
        memory.add_class(11, 2);
        memory.add_class(12, 2);
        let storage: Arc<dyn Storage> = Arc::new(memory);

        let all = list_all(
            &storage,
            ClassQueryParams {
                pagination: PaginationQuery::default(),
                teacher_id: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(all.items.len(), 3);

        let owned = list_all(
            &storage,
            ClassQueryParams {
                pagination: PaginationQuery::default(),
                teacher_id: Some(2),
            },
        )
        .await
        .unwrap();
        assert!(owned.items.iter().all(|c| c.teacher_id == 2));
        assert_eq!(owned.items.len(), 2);
    }
}
