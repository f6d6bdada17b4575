use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AttemptService;
use crate::errors::{QuizHubError, Result};
use crate::models::ApiResponse;
use crate::models::attempts::entities::NO_ANSWER;
use crate::models::attempts::responses::{AttemptReviewItem, AttemptReviewResponse};
use crate::models::users::entities::User;
use crate::services::{ErrorCodes, current_user, error_response};
use crate::storage::Storage;

/// 逐题列出某次作答的所选选项
///
/// 学生只能查看自己的作答，教师可以查看任意作答
pub async fn attempt_review_for(
    storage: &dyn Storage,
    user: &User,
    title: &str,
    attempt_id: i64,
) -> Result<AttemptReviewResponse> {
    let quiz = storage
        .get_quiz_by_title(title)
        .await?
        .ok_or_else(|| QuizHubError::not_found("Quiz not found"))?;

    let attempt = storage
        .get_attempt_by_id(attempt_id)
        .await?
        .filter(|a| a.quiz_id == quiz.id)
        .ok_or_else(|| QuizHubError::not_found("Attempt not found"))?;

    if !user.role.is_teacher() && attempt.student_id != user.id {
        return Err(QuizHubError::authorization(
            "You can only review your own attempts",
        ));
    }

    let questions = storage.get_quiz_questions(quiz.id).await?;
    let selected: HashMap<i64, i64> = storage
        .list_attempt_answers(attempt.id)
        .await?
        .into_iter()
        .map(|a| (a.question_id, a.choice_id))
        .collect();

    let items = questions
        .iter()
        .map(|question| {
            let choice = selected
                .get(&question.id)
                .and_then(|choice_id| question.find_choice(*choice_id));

            AttemptReviewItem {
                question_id: question.id,
                question_text: question.text.clone(),
                selected_choice: choice
                    .map_or_else(|| NO_ANSWER.to_string(), |c| c.text.clone()),
                is_correct: choice.is_some_and(|c| c.is_correct),
            }
        })
        .collect();

    Ok(AttemptReviewResponse {
        attempt,
        total_questions: questions.len(),
        items,
    })
}

pub async fn review_attempt(
    service: &AttemptService,
    request: &HttpRequest,
    title: String,
    attempt_id: i64,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match attempt_review_for(storage.as_ref(), &user, &title, attempt_id).await {
        Ok(review) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            review,
            "Attempt retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCodes::ATTEMPT)),
    }
}
