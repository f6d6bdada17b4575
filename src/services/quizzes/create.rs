use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::QuizService;
use crate::config::QuizConfig;
use crate::errors::{QuizHubError, Result};
use crate::models::quizzes::entities::QuizWithQuestions;
use crate::models::quizzes::form::parse_legacy_quiz_form;
use crate::models::quizzes::requests::CreateQuizRequest;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{ErrorCodes, current_user, error_response, quiz_policy};
use crate::storage::Storage;

/// 校验并创建测验（含题目与选项）
pub async fn create_quiz_as(
    storage: &dyn Storage,
    user: &User,
    quiz_data: &CreateQuizRequest,
    policy: &QuizConfig,
) -> Result<QuizWithQuestions> {
    if !user.role.is_teacher() {
        return Err(QuizHubError::authorization(
            "Only teachers can create quizzes",
        ));
    }

    let new_quiz = quiz_data.to_new_quiz(policy)?;
    let created = storage.create_quiz(user.id, new_quiz).await?;

    info!(
        "Quiz \"{}\" created by {} with {} questions",
        created.quiz.title,
        user.id,
        created.questions.len()
    );
    Ok(created)
}

pub async fn create_quiz(
    service: &QuizService,
    request: &HttpRequest,
    quiz_data: CreateQuizRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);
    let policy = quiz_policy(request);

    match create_quiz_as(storage.as_ref(), &user, &quiz_data, &policy).await {
        Ok(created) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(created, "Quiz created successfully"))),
        // 校验类错误回传原始输入
        Err(e @ QuizHubError::Validation(_)) => Ok(HttpResponse::BadRequest().json(
            ApiResponse::error(ErrorCode::QuizValidationFailed, quiz_data, e.message()),
        )),
        Err(e @ QuizHubError::DuplicateTitle(_)) => Ok(HttpResponse::Conflict().json(
            ApiResponse::error(ErrorCode::QuizAlreadyExists, quiz_data, e.message()),
        )),
        Err(e) => Ok(error_response(
            &e,
            ErrorCodes::QUIZ.with_failed(ErrorCode::QuizCreationFailed),
        )),
    }
}

pub async fn create_quiz_from_form(
    service: &QuizService,
    request: &HttpRequest,
    fields: HashMap<String, String>,
) -> ActixResult<HttpResponse> {
    create_quiz(service, request, parse_legacy_quiz_form(&fields)).await
}
