pub mod attempts;
pub mod common;
pub mod quizzes;
pub mod users;

pub use common::response::ApiResponse;

// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

// API 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1xxx
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    RateLimitExceeded = 1029,

    // 测验相关 3xxx
    QuizNotFound = 3000,
    QuizAlreadyExists = 3001,
    QuizValidationFailed = 3002,
    QuizCreationFailed = 3003,
    QuizDeleteFailed = 3004,
    QuizPermissionDenied = 3005,

    // 作答相关 4xxx
    AttemptLimitExceeded = 4000,
    AttemptConflict = 4001,
    AttemptNotFound = 4002,
    AttemptPermissionDenied = 4003,

    // 服务器错误 5xxx
    InternalServerError = 5000,
}
