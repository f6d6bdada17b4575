pub mod attempts;
pub mod quizzes;
pub mod system;

pub use attempts::AttemptService;
pub use quizzes::QuizService;
pub use system::SystemService;

use actix_web::{HttpRequest, HttpResponse, web};
use tracing::error;

use crate::config::{AppConfig, QuizConfig};
use crate::errors::QuizHubError;
use crate::middlewares::RequireJWT;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};

/// 不同资源在错误响应中使用的业务错误码
#[derive(Debug, Clone, Copy)]
pub(crate) struct ErrorCodes {
    pub not_found: ErrorCode,
    pub forbidden: ErrorCode,
    pub failed: ErrorCode,
}

impl ErrorCodes {
    pub const QUIZ: Self = Self {
        not_found: ErrorCode::QuizNotFound,
        forbidden: ErrorCode::QuizPermissionDenied,
        failed: ErrorCode::InternalServerError,
    };

    pub const ATTEMPT: Self = Self {
        not_found: ErrorCode::AttemptNotFound,
        forbidden: ErrorCode::AttemptPermissionDenied,
        failed: ErrorCode::InternalServerError,
    };

    pub fn with_failed(self, failed: ErrorCode) -> Self {
        Self { failed, ..self }
    }
}

/// 将业务错误转换为 HTTP 响应
pub(crate) fn error_response(err: &QuizHubError, codes: ErrorCodes) -> HttpResponse {
    let message = err.message().to_string();
    match err {
        QuizHubError::Validation(_) => HttpResponse::BadRequest().json(
            ApiResponse::error_empty(ErrorCode::QuizValidationFailed, message),
        ),
        QuizHubError::DuplicateTitle(_) => HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::QuizAlreadyExists, message),
        ),
        QuizHubError::NotFound(_) => {
            HttpResponse::NotFound().json(ApiResponse::error_empty(codes.not_found, message))
        }
        QuizHubError::Conflict(_) => HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::AttemptConflict,
            message,
        )),
        QuizHubError::AttemptLimitExceeded(_) => HttpResponse::Conflict().json(
            ApiResponse::error_empty(ErrorCode::AttemptLimitExceeded, message),
        ),
        QuizHubError::Authentication(_) => HttpResponse::Unauthorized()
            .json(ApiResponse::error_empty(ErrorCode::Unauthorized, message)),
        QuizHubError::Authorization(_) => {
            HttpResponse::Forbidden().json(ApiResponse::error_empty(codes.forbidden, message))
        }
        _ => {
            error!("{}", err.format_simple());
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                codes.failed,
                "Internal server error",
            ))
        }
    }
}

/// 取得 RequireJWT 放入请求扩展的当前用户
pub(crate) fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user",
        ))
    })
}

/// 测验策略：优先使用 app data 中注入的配置
pub(crate) fn quiz_policy(request: &HttpRequest) -> QuizConfig {
    request
        .app_data::<web::Data<QuizConfig>>()
        .map(|policy| policy.get_ref().clone())
        .unwrap_or_else(|| AppConfig::get().quiz.clone())
}
