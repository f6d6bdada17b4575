use std::collections::HashMap;

use tracing::info;

use crate::config::QuizConfig;
use crate::errors::{QuizHubError, Result};
use crate::models::attempts::entities::Attempt;
use crate::models::quizzes::entities::Quiz;
use crate::models::users::entities::User;
use crate::storage::Storage;

/// 学生提交一次作答
///
/// 次数检查、评分与写入由存储层在同一事务中完成
pub async fn submit_attempt(
    storage: &dyn Storage,
    quiz: &Quiz,
    student: &User,
    selections: &HashMap<i64, i64>,
    policy: &QuizConfig,
) -> Result<Attempt> {
    if student.role.is_teacher() {
        return Err(QuizHubError::authorization(
            "Only students can submit attempts",
        ));
    }

    let attempt = storage
        .create_attempt(quiz.id, student.id, selections, policy.max_attempts)
        .await?;

    info!(
        "Student {} submitted attempt #{} on quiz {} (score {})",
        student.id, attempt.attempt_number, quiz.id, attempt.score
    );
    Ok(attempt)
}
