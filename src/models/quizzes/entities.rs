use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 未填写描述时的默认值
pub const DEFAULT_QUIZ_DESCRIPTION: &str = "No description provided";

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct Quiz {
    // 测验ID
    pub id: i64,
    // 标题（全局唯一）
    pub title: String,
    // 描述
    pub description: String,
    // 创建者ID
    pub created_by: i64,
    // 创建时间
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct Question {
    pub id: i64,
    pub quiz_id: i64,
    pub text: String,
    // 插入顺序，不要求唯一
    pub order: i32,
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct Choice {
    pub id: i64,
    pub question_id: i64,
    pub text: String,
    pub is_correct: bool,
}

/// 测验及其全部题目、选项
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct QuizWithQuestions {
    pub quiz: Quiz,
    pub questions: Vec<Question>,
}

impl Question {
    /// 查找属于本题的选项，不属于本题的 ID 返回 None
    pub fn find_choice(&self, choice_id: i64) -> Option<&Choice> {
        self.choices.iter().find(|c| c.id == choice_id)
    }

    pub fn correct_choice(&self) -> Option<&Choice> {
        self.choices.iter().find(|c| c.is_correct)
    }
}

/// 待写入的测验（已通过校验）
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuiz {
    pub title: String,
    pub description: String,
    pub questions: Vec<NewQuestion>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewQuestion {
    pub text: String,
    pub choices: Vec<NewChoice>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewChoice {
    pub text: String,
    pub is_correct: bool,
}
