//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。
//! 调课流程的错误分类（未认证、越权、缺字段、过期日期、重复申请、目标无效、
//! 状态不符）与基础设施错误共用同一个枚举。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_attendsys_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum AttendSysError {
            $($variant(String),)*
        }

        impl AttendSysError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(AttendSysError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(AttendSysError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(AttendSysError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl AttendSysError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        AttendSysError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_attendsys_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    DateParse("E011", "Date Parse Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
    MissingField("E014", "Missing Field"),
    PastDate("E015", "Past Date"),
    DuplicateRequest("E016", "Duplicate Request"),
    InvalidTarget("E017", "Invalid Target"),
    InvalidState("E018", "Invalid State"),
}

impl AttendSysError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 数据存储不可用（对应依赖失败），调用方需要感知
    pub fn is_dependency_failure(&self) -> bool {
        matches!(
            self,
            AttendSysError::DatabaseConnection(_)
                | AttendSysError::DatabaseOperation(_)
                | AttendSysError::CacheConnection(_)
        )
    }
}

impl fmt::Display for AttendSysError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for AttendSysError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for AttendSysError {
    fn from(err: sea_orm::DbErr) -> Self {
        AttendSysError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for AttendSysError {
    fn from(err: serde_json::Error) -> Self {
        AttendSysError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for AttendSysError {
    fn from(err: chrono::ParseError) -> Self {
        AttendSysError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AttendSysError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AttendSysError::cache_connection("test").code(), "E001");
        assert_eq!(AttendSysError::database_config("test").code(), "E003");
        assert_eq!(AttendSysError::validation("test").code(), "E007");
        assert_eq!(AttendSysError::authentication("test").code(), "E012");
        assert_eq!(AttendSysError::duplicate_request("test").code(), "E016");
        assert_eq!(AttendSysError::invalid_state("test").code(), "E018");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            AttendSysError::past_date("test").error_type(),
            "Past Date"
        );
        assert_eq!(
            AttendSysError::invalid_target("test").error_type(),
            "Invalid Target"
        );
    }

    #[test]
    fn test_error_message() {
        let err = AttendSysError::missing_field("switch_date is required");
        assert_eq!(err.message(), "switch_date is required");
    }

    #[test]
    fn test_format_simple() {
        let err = AttendSysError::authorization("only classes assigned to you");
        let formatted = err.format_simple();
        assert!(formatted.contains("Authorization Error"));
        assert!(formatted.contains("only classes assigned to you"));
    }

    #[test]
    fn test_dependency_failure_classification() {
        assert!(AttendSysError::database_operation("db down").is_dependency_failure());
        assert!(!AttendSysError::invalid_state("already completed").is_dependency_failure());
    }
}
