//! 业务层测试使用的内存存储

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use super::Storage;
use crate::errors::{AttendSysError, Result};
use crate::models::{
    PaginationInfo,
    class_switch::{
        entities::{ClassSwitchRequest, SwitchStatus},
        requests::{NewClassSwitchRequest, SwitchRequestListQuery, SwitchTransition},
    },
    classes::{entities::Class, requests::ClassListQuery, responses::ClassListResponse},
    notifications::{
        entities::{Notification, Recipient},
        requests::{CreateNotificationRequest, NotificationListQuery},
        responses::NotificationListResponse,
    },
    users::entities::{User, UserRole},
};

#[derive(Default)]
pub(crate) struct MemoryStorage {
    users: Mutex<Vec<User>>,
    classes: Mutex<Vec<Class>>,
    requests: Mutex<Vec<ClassSwitchRequest>>,
    notifications: Mutex<Vec<Notification>>,
    fail_notifications: AtomicBool,
    fail_transitions_from: Mutex<Option<SwitchStatus>>,
}

impl MemoryStorage {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_user(&self, id: i64, role: UserRole) -> User {
        let user = User {
            id,
            full_name: format!("user{id}"),
            email: format!("user{id}@school.test"),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.users.lock().unwrap().push(user.clone());
        user
    }

    pub(crate) fn add_class(&self, id: i64, teacher_id: i64) -> Class {
        let class = Class {
            id,
            teacher_id,
            course: "Grade 9".to_string(),
            semester: "2026 Fall".to_string(),
            subject: format!("subject{id}"),
            room_number: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.classes.lock().unwrap().push(class.clone());
        class
    }

    /// 之后的通知写入全部失败
    pub(crate) fn fail_notifications(&self, fail: bool) {
        self.fail_notifications.store(fail, Ordering::SeqCst);
    }

    /// 之后所有从 `status` 出发的状态迁移都返回存储错误；None 恢复正常
    pub(crate) fn fail_transitions_from(&self, status: Option<SwitchStatus>) {
        *self.fail_transitions_from.lock().unwrap() = status;
    }

    pub(crate) fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    pub(crate) fn requests(&self) -> Vec<ClassSwitchRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn slot_taken(
        requests: &[ClassSwitchRequest],
        requester_class_id: i64,
        target_class_id: i64,
        switch_date: NaiveDate,
    ) -> Option<&ClassSwitchRequest> {
        requests.iter().find(|r| {
            r.requester_class_id == requester_class_id
                && r.target_class_id == target_class_id
                && r.switch_date == switch_date
                && r.status.occupies_slot()
        })
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        Ok(self
            .classes
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == class_id)
            .cloned())
    }

    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        let items: Vec<Class> = self
            .classes
            .lock()
            .unwrap()
            .iter()
            .filter(|c| query.teacher_id.is_none_or(|t| c.teacher_id == t))
            .cloned()
            .collect();
        let total = items.len() as i64;
        Ok(ClassListResponse {
            items,
            pagination: PaginationInfo {
                page: 1,
                page_size: total.max(1),
                total,
                total_pages: 1,
            },
        })
    }

    async fn create_switch_request(
        &self,
        request: NewClassSwitchRequest,
    ) -> Result<ClassSwitchRequest> {
        let mut requests = self.requests.lock().unwrap();
        if Self::slot_taken(
            &requests,
            request.requester_class_id,
            request.target_class_id,
            request.switch_date,
        )
        .is_some()
        {
            return Err(AttendSysError::duplicate_request("slot taken"));
        }

        let now = Utc::now();
        let created = ClassSwitchRequest {
            id: requests.len() as i64 + 1,
            requester_teacher_id: request.requester_teacher_id,
            requester_class_id: request.requester_class_id,
            target_teacher_id: request.target_teacher_id,
            target_class_id: request.target_class_id,
            switch_date: request.switch_date,
            reason: request.reason,
            status: SwitchStatus::Pending,
            target_teacher_accepted: false,
            admin_notified: false,
            created_at: now,
            updated_at: now,
        };
        requests.push(created.clone());
        Ok(created)
    }

    async fn get_switch_request_by_id(&self, id: i64) -> Result<Option<ClassSwitchRequest>> {
        Ok(self
            .requests
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn find_active_switch_request(
        &self,
        requester_class_id: i64,
        target_class_id: i64,
        switch_date: NaiveDate,
    ) -> Result<Option<ClassSwitchRequest>> {
        let requests = self.requests.lock().unwrap();
        Ok(
            Self::slot_taken(&requests, requester_class_id, target_class_id, switch_date)
                .cloned(),
        )
    }

    async fn transition_switch_request(
        &self,
        id: i64,
        transition: SwitchTransition,
    ) -> Result<Option<ClassSwitchRequest>> {
        if *self.fail_transitions_from.lock().unwrap() == Some(transition.from) {
            return Err(AttendSysError::database_operation("request store offline"));
        }

        let mut requests = self.requests.lock().unwrap();
        let Some(request) = requests
            .iter_mut()
            .find(|r| r.id == id && r.status == transition.from)
        else {
            return Ok(None);
        };

        request.status = transition.to;
        if let Some(accepted) = transition.target_teacher_accepted {
            request.target_teacher_accepted = accepted;
        }
        if let Some(notified) = transition.admin_notified {
            request.admin_notified = notified;
        }
        request.updated_at = Utc::now();
        Ok(Some(request.clone()))
    }

    async fn list_switch_requests(
        &self,
        query: SwitchRequestListQuery,
    ) -> Result<Vec<ClassSwitchRequest>> {
        let mut items: Vec<ClassSwitchRequest> = self
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| query.participant_id.is_none_or(|u| r.involves(u)))
            .filter(|r| query.status.is_none_or(|s| r.status == s))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(items)
    }

    async fn create_notification(
        &self,
        request: CreateNotificationRequest,
    ) -> Result<Notification> {
        if self.fail_notifications.load(Ordering::SeqCst) {
            return Err(AttendSysError::database_operation("notification store offline"));
        }

        let mut notifications = self.notifications.lock().unwrap();
        let (recipient_role, recipient_user_id) = match request.recipient {
            Recipient::Role(role) => (Some(role), None),
            Recipient::User(user_id) => (None, Some(user_id)),
        };
        let created = Notification {
            id: notifications.len() as i64 + 1,
            title: request.title,
            message: request.message,
            sender_id: request.sender_id,
            recipient_role,
            recipient_user_id,
            reference_type: request.reference_type,
            reference_id: request.reference_id,
            created_at: Utc::now(),
        };
        notifications.push(created.clone());
        Ok(created)
    }

    async fn list_notifications_with_pagination(
        &self,
        user_id: i64,
        role: &UserRole,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse> {
        let (page, size) = query.pagination.normalized();
        let mut items: Vec<Notification> = self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|n| {
                n.recipient_user_id == Some(user_id) || n.recipient_role.as_ref() == Some(role)
            })
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = items.len() as i64;
        let items = items
            .into_iter()
            .skip(((page - 1) * size) as usize)
            .take(size as usize)
            .collect();
        Ok(NotificationListResponse {
            items,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total,
                total_pages: (total + size as i64 - 1) / size as i64,
            },
        })
    }
}
