use serde::Serialize;
use ts_rs::TS;

use super::entities::Attempt;

/// 作答记录中展示的学生信息
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attempt.ts")]
pub struct AttemptStudent {
    pub id: i64,
    pub username: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attempt.ts")]
pub struct AttemptWithStudent {
    pub attempt: Attempt,
    pub student: AttemptStudent,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attempt.ts")]
pub struct AttemptReviewItem {
    pub question_id: i64,
    pub question_text: String,
    // 所选选项文本，未作答为 "No answer"
    pub selected_choice: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attempt.ts")]
pub struct AttemptReviewResponse {
    pub attempt: Attempt,
    pub total_questions: usize,
    pub items: Vec<AttemptReviewItem>,
}
