use serde::Serialize;
use ts_rs::TS;

use super::entities::{Question, Quiz};
use crate::models::attempts::entities::Attempt;
use crate::models::attempts::responses::AttemptWithStudent;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct QuizListItem {
    pub quiz: Quiz,
    // 当前用户在该测验上的最近一次作答
    pub latest_attempt: Option<Attempt>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct QuizListResponse {
    pub items: Vec<QuizListItem>,
}

/// 学生作答视图中的选项（不含正确标记）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct ChoiceView {
    pub id: i64,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct QuestionView {
    pub id: i64,
    pub text: String,
    pub order: i32,
    pub choices: Vec<ChoiceView>,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id,
            text: question.text.clone(),
            order: question.order,
            choices: question
                .choices
                .iter()
                .map(|c| ChoiceView {
                    id: c.id,
                    text: c.text.clone(),
                })
                .collect(),
        }
    }
}

/// 教师视图：所有学生的作答记录，最新的在前
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct TeacherQuizView {
    pub quiz: Quiz,
    pub attempts: Vec<AttemptWithStudent>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct StudentQuizView {
    pub quiz: Quiz,
    pub questions: Vec<QuestionView>,
    pub attempts_used: i64,
    pub attempts_remaining: i64,
    pub max_attempts: i32,
    // 本次提交产生的作答
    pub last_attempt: Option<Attempt>,
    // 超出作答次数时的提示
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[serde(tag = "view", content = "data", rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub enum QuizDetailView {
    Teacher(TeacherQuizView),
    Student(StudentQuizView),
}
