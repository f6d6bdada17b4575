use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::QuizService;
use crate::config::QuizConfig;
use crate::errors::{QuizHubError, Result};
use crate::models::ApiResponse;
use crate::models::quizzes::responses::{
    QuestionView, QuizDetailView, StudentQuizView, TeacherQuizView,
};
use crate::models::users::entities::User;
use crate::services::attempts::submit::submit_attempt;
use crate::services::{ErrorCodes, current_user, error_response, quiz_policy};
use crate::storage::Storage;

/// 按角色生成测验详情视图
///
/// 教师看到全部作答记录（提交内容被忽略）；学生看到题目和剩余次数，
/// 带提交时先走作答流程，次数用尽时在视图的 error 字段中提示。
pub async fn quiz_detail_for(
    storage: &dyn Storage,
    user: &User,
    title: &str,
    submission: Option<&HashMap<i64, i64>>,
    policy: &QuizConfig,
) -> Result<QuizDetailView> {
    let quiz = storage
        .get_quiz_by_title(title)
        .await?
        .ok_or_else(|| QuizHubError::not_found("Quiz not found"))?;

    if user.role.is_teacher() {
        let attempts = storage.list_quiz_attempts(quiz.id).await?;
        return Ok(QuizDetailView::Teacher(TeacherQuizView { quiz, attempts }));
    }

    let mut last_attempt = None;
    let mut error = None;

    if let Some(selections) = submission {
        match submit_attempt(storage, &quiz, user, selections, policy).await {
            Ok(attempt) => last_attempt = Some(attempt),
            Err(QuizHubError::AttemptLimitExceeded(_)) => {
                info!(
                    "Student {} exceeded attempt limit on quiz {}",
                    user.id, quiz.id
                );
                error = Some(policy.attempt_limit_message());
            }
            Err(e) => return Err(e),
        }
    }

    let attempts_used = storage.count_attempts(quiz.id, user.id).await?;
    let questions = storage
        .get_quiz_questions(quiz.id)
        .await?
        .iter()
        .map(QuestionView::from)
        .collect();

    Ok(QuizDetailView::Student(StudentQuizView {
        quiz,
        questions,
        attempts_used,
        attempts_remaining: policy.remaining_attempts(attempts_used),
        max_attempts: policy.max_attempts,
        last_attempt,
        error,
    }))
}

pub async fn quiz_detail(
    service: &QuizService,
    request: &HttpRequest,
    title: String,
    submission: Option<HashMap<i64, i64>>,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);
    let policy = quiz_policy(request);

    match quiz_detail_for(
        storage.as_ref(),
        &user,
        &title,
        submission.as_ref(),
        &policy,
    )
    .await
    {
        Ok(view) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            view,
            "Quiz retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCodes::QUIZ)),
    }
}
