use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::config::AppConfig;
use crate::middlewares;
use crate::models::attempts::requests::SubmitAttemptRequest;
use crate::models::quizzes::requests::{CreateQuizRequest, QuizListParams};
use crate::models::users::entities::UserRole;
use crate::services::{AttemptService, QuizService};

// 懒加载的全局 SERVICE 实例
static QUIZ_SERVICE: Lazy<QuizService> = Lazy::new(QuizService::new_lazy);
static ATTEMPT_SERVICE: Lazy<AttemptService> = Lazy::new(AttemptService::new_lazy);

// HTTP处理程序
pub async fn list_quizzes(
    req: HttpRequest,
    query: web::Query<QuizListParams>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.list_quizzes(&req, query.into_inner()).await
}

pub async fn create_quiz(
    req: HttpRequest,
    quiz_data: web::Json<CreateQuizRequest>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.create_quiz(&req, quiz_data.into_inner()).await
}

pub async fn create_quiz_form(
    req: HttpRequest,
    fields: web::Form<HashMap<String, String>>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE
        .create_quiz_from_form(&req, fields.into_inner())
        .await
}

pub async fn get_quiz(req: HttpRequest, title: web::Path<String>) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.get_quiz(&req, title.into_inner()).await
}

pub async fn submit_quiz(
    req: HttpRequest,
    title: web::Path<String>,
    submission: web::Json<SubmitAttemptRequest>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE
        .submit_quiz(&req, title.into_inner(), submission.into_inner())
        .await
}

pub async fn submit_quiz_form(
    req: HttpRequest,
    title: web::Path<String>,
    fields: web::Form<HashMap<String, String>>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE
        .submit_quiz_form(&req, title.into_inner(), fields.into_inner())
        .await
}

pub async fn delete_quiz(req: HttpRequest, title: web::Path<String>) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.delete_quiz(&req, title.into_inner()).await
}

pub async fn review_attempt(
    req: HttpRequest,
    path: web::Path<(String, i64)>,
) -> ActixResult<HttpResponse> {
    let (title, attempt_id) = path.into_inner();
    ATTEMPT_SERVICE.review_attempt(&req, title, attempt_id).await
}

// 配置路由
pub fn configure_quiz_routes(cfg: &mut web::ServiceConfig) {
    let submit_limit = AppConfig::get().quiz.submit_rate_limit;
    configure_quiz_routes_with_limit(cfg, submit_limit);
}

/// 以指定的提交频率限制配置测验路由
pub fn configure_quiz_routes_with_limit(cfg: &mut web::ServiceConfig, submit_limit: u32) {
    cfg.service(
        web::scope("/api/v1/quizzes")
            .wrap(middlewares::RequireJWT)
            .service(
                // 所有用户可查看列表，教师和管理员可创建
                web::resource("").route(web::get().to(list_quizzes)).route(
                    web::post()
                        .to(create_quiz)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            .service(
                web::resource("/form").route(
                    web::post()
                        .to(create_quiz_form)
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            .service(
                web::resource("/{title}/attempts/{attempt_id}")
                    .route(web::get().to(review_attempt)),
            )
            .service(
                web::resource("/{title}/form").route(
                    web::post()
                        .to(submit_quiz_form)
                        .wrap(middlewares::RateLimit::quiz_submission(submit_limit)),
                ),
            )
            .service(
                web::resource("/{title}")
                    .route(web::get().to(get_quiz))
                    .route(
                        web::post()
                            .to(submit_quiz)
                            .wrap(middlewares::RateLimit::quiz_submission(submit_limit)),
                    )
                    // 创建者或管理员，具体归属在服务层校验
                    .route(
                        web::delete()
                            .to(delete_quiz)
                            .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                    ),
            ),
    );
}
