/// 业务错误码
///
/// 0 表示成功；1xxx 通用错误，4xxx 调课申请，5xxx 服务端错误。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,

    SwitchMissingField = 4001,
    SwitchPastDate = 4002,
    SwitchDuplicate = 4003,
    SwitchInvalidTarget = 4004,
    SwitchInvalidState = 4005,

    InternalServerError = 5000,
}
