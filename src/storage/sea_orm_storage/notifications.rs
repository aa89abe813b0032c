//! 通知存储操作

use super::SeaOrmStorage;
use crate::entity::notifications::{ActiveModel, Column, Entity as Notifications};
use crate::errors::{AttendSysError, Result};
use crate::models::{
    PaginationInfo,
    notifications::{
        entities::{Notification, Recipient},
        requests::{CreateNotificationRequest, NotificationListQuery},
        responses::NotificationListResponse,
    },
    users::entities::UserRole,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 创建通知
    pub async fn create_notification_impl(
        &self,
        req: CreateNotificationRequest,
    ) -> Result<Notification> {
        let now = chrono::Utc::now().timestamp();

        let (recipient_role, recipient_user_id) = match req.recipient {
            Recipient::Role(role) => (Some(role.to_string()), None),
            Recipient::User(user_id) => (None, Some(user_id)),
        };

        let model = ActiveModel {
            title: Set(req.title),
            message: Set(req.message),
            sender_id: Set(req.sender_id),
            recipient_role: Set(recipient_role),
            recipient_user_id: Set(recipient_user_id),
            reference_type: Set(req.reference_type),
            reference_id: Set(req.reference_id),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| AttendSysError::database_operation(format!("创建通知失败: {e}")))?;

        Ok(result.into_notification())
    }

    /// 列出发给用户本人或其角色的通知（分页）
    pub async fn list_notifications_with_pagination_impl(
        &self,
        user_id: i64,
        role: &UserRole,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse> {
        let (page, size) = query.pagination.normalized();

        let select = Notifications::find()
            .filter(
                Condition::any()
                    .add(Column::RecipientUserId.eq(user_id))
                    .add(Column::RecipientRole.eq(role.to_string())),
            )
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| AttendSysError::database_operation(format!("查询通知总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| AttendSysError::database_operation(format!("查询通知页数失败: {e}")))?;

        let notifications = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| AttendSysError::database_operation(format!("查询通知列表失败: {e}")))?;

        Ok(NotificationListResponse {
            items: notifications
                .into_iter()
                .map(|m| m.into_notification())
                .collect(),
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
    use crate::models::{
        PaginationQuery,
        notifications::{
            entities::Recipient,
            requests::{CreateNotificationRequest, NotificationListQuery},
        },
        users::entities::UserRole,
    };
    use crate::storage::Storage;

    #[tokio::test]
    async fn test_notifications_by_user_and_role() {
        let storage = setup().await;

        storage
            .create_notification(CreateNotificationRequest {
                title: "Class switch request".to_string(),
                message: "Alice asks to switch".to_string(),
                sender_id: 1,
                recipient: Recipient::User(2),
                reference_type: Some("class_switch".to_string()),
                reference_id: Some(1),
            })
            .await
            .unwrap();
        let broadcast = storage
            .create_notification(CreateNotificationRequest {
                title: "Class switch confirmed".to_string(),
                message: "Bob accepted".to_string(),
                sender_id: 2,
                recipient: Recipient::Role(UserRole::Admin),
                reference_type: Some("class_switch".to_string()),
                reference_id: Some(1),
            })
            .await
            .unwrap();
        assert_eq!(broadcast.recipient(), Some(Recipient::Role(UserRole::Admin)));

        let bob = storage
            .list_notifications_with_pagination(2, &UserRole::Teacher, NotificationListQuery::default())
            .await
            .unwrap();
        assert_eq!(bob.items.len(), 1);
        assert_eq!(bob.items[0].recipient_user_id, Some(2));

        let carol = storage
            .list_notifications_with_pagination(3, &UserRole::Admin, NotificationListQuery::default())
            .await
            .unwrap();
        assert_eq!(carol.items.len(), 1);
        assert_eq!(carol.items[0].id, broadcast.id);

        let alice = storage
            .list_notifications_with_pagination(
                1,
                &UserRole::Teacher,
                NotificationListQuery {
                    pagination: PaginationQuery { page: 1, size: 5 },
                },
            )
            .await
            .unwrap();
        assert!(alice.items.is_empty());
        assert_eq!(alice.pagination.total, 0);
    }
}
