use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 未作答题目的占位文本
pub const NO_ANSWER: &str = "No answer";

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attempt.ts")]
pub struct Attempt {
    pub id: i64,
    pub quiz_id: i64,
    pub student_id: i64,
    // 第几次作答，从 1 开始
    pub attempt_number: i32,
    pub score: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attempt.ts")]
pub struct StudentAnswer {
    pub id: i64,
    pub attempt_id: i64,
    pub question_id: i64,
    pub choice_id: i64,
}
