//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod class_switch_requests;
mod classes;
mod notifications;
mod users;

use crate::config::AppConfig;
use crate::errors::{AttendSysError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(
            &config.database.url,
            config.database.pool_size,
            config.database.timeout,
        )
        .await
    }

    /// 连接数据库并运行迁移
    pub async fn connect(url: &str, pool_size: u32, timeout_secs: u64) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, pool_size, timeout_secs).await?
        } else {
            Self::connect_generic(&db_url, pool_size, timeout_secs).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| AttendSysError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（文件库启用 WAL + pragma 优化）
    async fn connect_sqlite(
        url: &str,
        pool_size: u32,
        timeout_secs: u64,
    ) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        // 内存库每个连接都是独立的数据库，只能使用单连接
        let in_memory = url.contains(":memory:");

        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| AttendSysError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5));

        if !in_memory {
            opt = opt
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .pragma("cache_size", "-64000")
                .pragma("temp_store", "memory")
                .pragma("wal_autocheckpoint", "1000");
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { pool_size })
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(timeout_secs))
            .idle_timeout(if in_memory {
                None
            } else {
                Some(Duration::from_secs(300))
            })
            .max_lifetime(if in_memory {
                None
            } else {
                Some(Duration::from_secs(1800))
            })
            .connect_with(opt)
            .await
            .map_err(|e| AttendSysError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(
        url: &str,
        pool_size: u32,
        timeout_secs: u64,
    ) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(timeout_secs))
            .acquire_timeout(Duration::from_secs(timeout_secs))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| AttendSysError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(AttendSysError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    class_switch::{
        entities::ClassSwitchRequest,
        requests::{NewClassSwitchRequest, SwitchRequestListQuery, SwitchTransition},
    },
    classes::{entities::Class, requests::ClassListQuery, responses::ClassListResponse},
    notifications::{
        entities::Notification,
        requests::{CreateNotificationRequest, NotificationListQuery},
        responses::NotificationListResponse,
    },
    users::entities::{User, UserRole},
};
use crate::storage::Storage;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    // 班级模块
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        self.list_classes_with_pagination_impl(query).await
    }

    // 调课申请模块
    async fn create_switch_request(
        &self,
        request: NewClassSwitchRequest,
    ) -> Result<ClassSwitchRequest> {
        self.create_switch_request_impl(request).await
    }

    async fn get_switch_request_by_id(&self, id: i64) -> Result<Option<ClassSwitchRequest>> {
        self.get_switch_request_by_id_impl(id).await
    }

    async fn find_active_switch_request(
        &self,
        requester_class_id: i64,
        target_class_id: i64,
        switch_date: NaiveDate,
    ) -> Result<Option<ClassSwitchRequest>> {
        self.find_active_switch_request_impl(requester_class_id, target_class_id, switch_date)
            .await
    }

    async fn transition_switch_request(
        &self,
        id: i64,
        transition: SwitchTransition,
    ) -> Result<Option<ClassSwitchRequest>> {
        self.transition_switch_request_impl(id, transition).await
    }

    async fn list_switch_requests(
        &self,
        query: SwitchRequestListQuery,
    ) -> Result<Vec<ClassSwitchRequest>> {
        self.list_switch_requests_impl(query).await
    }

    // 通知模块
    async fn create_notification(
        &self,
        request: CreateNotificationRequest,
    ) -> Result<Notification> {
        self.create_notification_impl(request).await
    }

    async fn list_notifications_with_pagination(
        &self,
        user_id: i64,
        role: &UserRole,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse> {
        self.list_notifications_with_pagination_impl(user_id, role, query)
            .await
    }
}

#[cfg(test)]
pub(super) mod fixture {
    //! 内存 SQLite，已迁移并写入用户 1-4 与班级 10-12

    use super::SeaOrmStorage;
    use crate::entity::{classes, users};
    use crate::models::{class_switch::requests::NewClassSwitchRequest, users::entities::UserRole};
    use chrono::NaiveDate;
    use sea_orm::{ActiveModelTrait, Set};

    pub async fn setup() -> SeaOrmStorage {
        let storage = SeaOrmStorage::connect(":memory:", 1, 5).await.unwrap();

        for (id, name, role) in [
            (1, "Alice", UserRole::Teacher),
            (2, "Bob", UserRole::Teacher),
            (3, "Carol", UserRole::Admin),
            (4, "Dave", UserRole::Student),
        ] {
            users::ActiveModel {
                id: Set(id),
                full_name: Set(name.to_string()),
                email: Set(format!("{}@school.test", name.to_lowercase())),
                role: Set(role.to_string()),
                created_at: Set(0),
                updated_at: Set(0),
            }
            .insert(&storage.db)
            .await
            .unwrap();
        }

        for (id, teacher_id, subject) in [(10, 1, "Math"), (11, 2, "Physics"), (12, 2, "Chemistry")] {
            classes::ActiveModel {
                id: Set(id),
                teacher_id: Set(teacher_id),
                course: Set("Grade 9".to_string()),
                semester: Set("2026 Fall".to_string()),
                subject: Set(subject.to_string()),
                room_number: Set(None),
                created_at: Set(id),
                updated_at: Set(id),
            }
            .insert(&storage.db)
            .await
            .unwrap();
        }

        storage
    }

    pub fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 11, d).unwrap()
    }

    pub fn new_request(target_class_id: i64, day: u32) -> NewClassSwitchRequest {
        NewClassSwitchRequest {
            requester_teacher_id: 1,
            requester_class_id: 10,
            target_teacher_id: 2,
            target_class_id,
            switch_date: date(day),
            reason: Some("conference".to_string()),
        }
    }
}
