use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{
    attempts::{
        entities::{Attempt, StudentAnswer},
        responses::AttemptWithStudent,
    },
    quizzes::entities::{NewQuiz, Question, Quiz, QuizWithQuestions},
    users::{entities::User, requests::CreateUserRequest},
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（账号开通由外部完成，这里主要供初始化和测试使用）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;

    /// 测验管理方法
    // 在一个事务中写入测验、题目和选项
    async fn create_quiz(&self, created_by: i64, quiz: NewQuiz) -> Result<QuizWithQuestions>;
    // 通过标题获取测验
    async fn get_quiz_by_title(&self, title: &str) -> Result<Option<Quiz>>;
    // 获取测验的题目及选项，按插入顺序
    async fn get_quiz_questions(&self, quiz_id: i64) -> Result<Vec<Question>>;
    // 列出测验，可按标题模糊搜索（不区分大小写）
    async fn list_quizzes(&self, search: Option<&str>) -> Result<Vec<Quiz>>;
    // 删除测验（级联删除题目、选项、作答）
    async fn delete_quiz(&self, quiz_id: i64) -> Result<bool>;

    /// 作答管理方法
    // 统计学生在某测验上的作答次数
    async fn count_attempts(&self, quiz_id: i64, student_id: i64) -> Result<i64>;
    // 检查次数、评分并写入作答及答案
    async fn create_attempt(
        &self,
        quiz_id: i64,
        student_id: i64,
        selections: &HashMap<i64, i64>,
        max_attempts: i32,
    ) -> Result<Attempt>;
    // 列出测验的全部作答记录（最新的在前）
    async fn list_quiz_attempts(&self, quiz_id: i64) -> Result<Vec<AttemptWithStudent>>;
    // 学生在每个测验上的最近一次作答，键为测验ID
    async fn latest_attempts_by_student(&self, student_id: i64) -> Result<HashMap<i64, Attempt>>;
    // 通过ID获取作答
    async fn get_attempt_by_id(&self, attempt_id: i64) -> Result<Option<Attempt>>;
    // 获取某次作答中某题所选选项的文本，未作答返回 "No answer"
    async fn get_student_choice(&self, attempt_id: i64, question_id: i64) -> Result<String>;
    // 列出某次作答的全部答案
    async fn list_attempt_answers(&self, attempt_id: i64) -> Result<Vec<StudentAnswer>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
