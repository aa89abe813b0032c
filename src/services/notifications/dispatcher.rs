//! 通知分发
//!
//! 尽力而为：写入失败只记录日志，不向调用方抛错，但以 [`DispatchOutcome`] 如实返回结果。

use std::sync::Arc;

use tracing::{error, info};

use crate::models::notifications::{
    entities::DispatchOutcome, requests::CreateNotificationRequest,
};
use crate::storage::Storage;

#[derive(Clone)]
pub struct NotificationDispatcher {
    storage: Arc<dyn Storage>,
}

impl NotificationDispatcher {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn notify(&self, request: CreateNotificationRequest) -> DispatchOutcome {
        let recipient = request.recipient.clone();
        match self.storage.create_notification(request).await {
            Ok(notification) => {
                info!(
                    "Notification {} dispatched to {:?}",
                    notification.id, recipient
                );
                DispatchOutcome::Delivered { notification }
            }
            Err(e) => {
                error!("Failed to dispatch notification to {:?}: {}", recipient, e);
                DispatchOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::notifications::entities::Recipient;
    use crate::models::users::entities::UserRole;
    use crate::storage::test_support::MemoryStorage;

    fn request() -> CreateNotificationRequest {
        CreateNotificationRequest {
            title: "Class switch completed".to_string(),
            message: "done".to_string(),
            sender_id: 2,
            recipient: Recipient::Role(UserRole::Admin),
            reference_type: None,
            reference_id: None,
        }
    }

    #[tokio::test]
    async fn test_delivered() {
        let storage = Arc::new(MemoryStorage::new());
        let dispatcher = NotificationDispatcher::new(storage.clone());

        let outcome = dispatcher.notify(request()).await;
        assert!(outcome.is_delivered());
        assert_eq!(storage.notifications().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_is_reported_not_raised() {
        let storage = Arc::new(MemoryStorage::new());
        storage.fail_notifications(true);
        let dispatcher = NotificationDispatcher::new(storage.clone());

        let outcome = dispatcher.notify(request()).await;
        assert!(matches!(outcome, DispatchOutcome::Failed { .. }));
        assert!(storage.notifications().is_empty());
    }
}
