pub mod create;
pub mod delete;
pub mod detail;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;
use std::sync::Arc;

use crate::models::attempts::requests::{SubmitAttemptRequest, parse_legacy_answers};
use crate::models::quizzes::requests::{CreateQuizRequest, QuizListParams};
use crate::storage::Storage;

pub struct QuizService {
    storage: Option<Arc<dyn Storage>>,
}

impl QuizService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 测验列表
    pub async fn list_quizzes(
        &self,
        request: &HttpRequest,
        query: QuizListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_quizzes(self, request, query).await
    }

    // 创建测验
    pub async fn create_quiz(
        &self,
        request: &HttpRequest,
        quiz_data: CreateQuizRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_quiz(self, request, quiz_data).await
    }

    // 旧版表单创建测验
    pub async fn create_quiz_from_form(
        &self,
        request: &HttpRequest,
        fields: HashMap<String, String>,
    ) -> ActixResult<HttpResponse> {
        create::create_quiz_from_form(self, request, fields).await
    }

    // 测验详情（教师报告或学生作答视图）
    pub async fn get_quiz(&self, request: &HttpRequest, title: String) -> ActixResult<HttpResponse> {
        detail::quiz_detail(self, request, title, None).await
    }

    // 提交作答
    pub async fn submit_quiz(
        &self,
        request: &HttpRequest,
        title: String,
        submission: SubmitAttemptRequest,
    ) -> ActixResult<HttpResponse> {
        detail::quiz_detail(self, request, title, Some(submission.selections())).await
    }

    // 旧版表单提交作答
    pub async fn submit_quiz_form(
        &self,
        request: &HttpRequest,
        title: String,
        fields: HashMap<String, String>,
    ) -> ActixResult<HttpResponse> {
        detail::quiz_detail(self, request, title, Some(parse_legacy_answers(&fields))).await
    }

    // 删除测验
    pub async fn delete_quiz(
        &self,
        request: &HttpRequest,
        title: String,
    ) -> ActixResult<HttpResponse> {
        delete::delete_quiz(self, request, title).await
    }
}
