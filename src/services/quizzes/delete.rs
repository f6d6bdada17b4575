use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::QuizService;
use crate::errors::{QuizHubError, Result};
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{ErrorCodes, current_user, error_response};
use crate::storage::Storage;

/// 删除测验，仅创建者或管理员可操作
pub async fn delete_quiz_as(storage: &dyn Storage, user: &User, title: &str) -> Result<()> {
    let quiz = storage
        .get_quiz_by_title(title)
        .await?
        .ok_or_else(|| QuizHubError::not_found("Quiz not found"))?;

    if quiz.created_by != user.id && user.role != UserRole::Admin {
        return Err(QuizHubError::authorization(
            "You do not have permission to delete this quiz",
        ));
    }

    if !storage.delete_quiz(quiz.id).await? {
        return Err(QuizHubError::not_found("Quiz not found"));
    }

    info!("Quiz \"{}\" deleted by {}", quiz.title, user.id);
    Ok(())
}

pub async fn delete_quiz(
    service: &QuizService,
    request: &HttpRequest,
    title: String,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match delete_quiz_as(storage.as_ref(), &user, &title).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Quiz deleted successfully"))),
        Err(e) => Ok(error_response(
            &e,
            ErrorCodes::QUIZ.with_failed(ErrorCode::QuizDeleteFailed),
        )),
    }
}
