pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::classes::requests::ClassQueryParams;
use crate::storage::Storage;

pub struct ClassService {
    storage: Option<Arc<dyn Storage>>,
}

impl ClassService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(
        &self,
        request: &HttpRequest,
    ) -> Result<Arc<dyn Storage>, HttpResponse> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => crate::services::storage_from_request(request),
        }
    }

    // 获取班级列表
    pub async fn list_classes(
        &self,
        request: &HttpRequest,
        query: ClassQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_classes(self, request, query).await
    }
}
