pub mod auth;
pub mod class_switch;
pub mod classes;
pub mod common;
pub mod notifications;
pub mod users;

pub use common::error_code::ErrorCode;
pub use common::pagination::{PaginationInfo, PaginationQuery};
pub use common::response::ApiResponse;

