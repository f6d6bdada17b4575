use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::QuizService;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::quizzes::requests::QuizListParams;
use crate::models::quizzes::responses::{QuizListItem, QuizListResponse};
use crate::models::users::entities::User;
use crate::services::{ErrorCodes, current_user, error_response};
use crate::storage::Storage;

/// 按标题字母序列出测验，附带当前用户最近一次作答
pub async fn list_quizzes_for(
    storage: &dyn Storage,
    user: &User,
    search: Option<&str>,
) -> Result<QuizListResponse> {
    let quizzes = storage.list_quizzes(search).await?;
    let mut latest = storage.latest_attempts_by_student(user.id).await?;

    let items = quizzes
        .into_iter()
        .map(|quiz| QuizListItem {
            latest_attempt: latest.remove(&quiz.id),
            quiz,
        })
        .collect();

    Ok(QuizListResponse { items })
}

pub async fn list_quizzes(
    service: &QuizService,
    request: &HttpRequest,
    query: QuizListParams,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request);

    match list_quizzes_for(storage.as_ref(), &user, query.search.as_deref()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Quizzes retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e, ErrorCodes::QUIZ)),
    }
}
