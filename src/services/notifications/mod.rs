pub mod dispatcher;
pub mod list;

pub use dispatcher::NotificationDispatcher;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::notifications::requests::NotificationListQuery;
use crate::storage::Storage;

pub struct NotificationService {
    storage: Option<Arc<dyn Storage>>,
}

impl NotificationService {
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

    // 获取当前用户的通知列表
    pub async fn list_notifications(
        &self,
        request: &HttpRequest,
        query: NotificationListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_notifications(self, request, query).await
    }
}
