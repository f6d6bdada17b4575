//! 作答存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use super::quizzes::load_questions;
use crate::entity::{
    attempts::{ActiveModel, Column, Entity as Attempts},
    choices::Entity as Choices,
    student_answers::{self, Entity as StudentAnswers},
    users::Entity as Users,
};
use crate::errors::{QuizHubError, Result};
use crate::models::attempts::{
    entities::{Attempt, NO_ANSWER, StudentAnswer},
    responses::{AttemptStudent, AttemptWithStudent},
    scoring::score_submission,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, SqlErr, TransactionTrait,
};
use tracing::warn;

// 并发提交的写入竞争：唯一索引冲突，或 SQLite 快照过期/写锁被占用
fn is_write_contention(err: &DbErr) -> bool {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        return true;
    }
    let msg = err.to_string();
    msg.contains("database is locked") || msg.contains("database table is locked")
}

fn attempt_write_error(err: DbErr, context: &str, quiz_id: i64, student_id: i64) -> QuizHubError {
    if is_write_contention(&err) {
        warn!(
            "Concurrent attempt submission rejected: quiz={}, student={}: {}",
            quiz_id, student_id, err
        );
        return QuizHubError::conflict("Another submission for this quiz is already in progress");
    }
    QuizHubError::database_operation(format!("{context}: {err}"))
}

impl SeaOrmStorage {
    /// 统计作答次数
    pub async fn count_attempts_impl(&self, quiz_id: i64, student_id: i64) -> Result<i64> {
        let count = Attempts::find()
            .filter(Column::QuizId.eq(quiz_id))
            .filter(Column::StudentId.eq(student_id))
            .count(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("统计作答次数失败: {e}")))?;

        Ok(count as i64)
    }

    /// 创建作答
    ///
    /// 次数检查、评分、写入作答与答案在同一事务内完成。
    /// 并发提交撞上 (quiz_id, student_id, attempt_number) 唯一索引时返回 Conflict。
    pub async fn create_attempt_impl(
        &self,
        quiz_id: i64,
        student_id: i64,
        selections: &HashMap<i64, i64>,
        max_attempts: i32,
    ) -> Result<Attempt> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| QuizHubError::database_operation(format!("开启事务失败: {e}")))?;

        let used = Attempts::find()
            .filter(Column::QuizId.eq(quiz_id))
            .filter(Column::StudentId.eq(student_id))
            .count(&txn)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("统计作答次数失败: {e}")))?
            as i64;

        if used >= i64::from(max_attempts) {
            return Err(QuizHubError::attempt_limit_exceeded(format!(
                "You have already taken this quiz {max_attempts} times."
            )));
        }

        let questions = load_questions(&txn, quiz_id).await?;
        let scored = score_submission(&questions, selections);

        let attempt = ActiveModel {
            quiz_id: Set(quiz_id),
            student_id: Set(student_id),
            attempt_number: Set(used as i32 + 1),
            score: Set(scored.score),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| attempt_write_error(e, "创建作答失败", quiz_id, student_id))?;

        if !scored.answers.is_empty() {
            let answers = scored
                .answers
                .iter()
                .map(|(question_id, choice_id)| student_answers::ActiveModel {
                    attempt_id: Set(attempt.id),
                    question_id: Set(*question_id),
                    choice_id: Set(*choice_id),
                    ..Default::default()
                });
            StudentAnswers::insert_many(answers)
                .exec(&txn)
                .await
                .map_err(|e| attempt_write_error(e, "保存答案失败", quiz_id, student_id))?;
        }

        txn.commit()
            .await
            .map_err(|e| attempt_write_error(e, "提交事务失败", quiz_id, student_id))?;

        Ok(attempt.into_attempt())
    }

    /// 列出测验的作答记录，最新的在前
    pub async fn list_quiz_attempts_impl(&self, quiz_id: i64) -> Result<Vec<AttemptWithStudent>> {
        let rows = Attempts::find()
            .filter(Column::QuizId.eq(quiz_id))
            .find_also_related(Users)
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询作答记录失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(attempt, user)| {
                let user = user?;
                Some(AttemptWithStudent {
                    attempt: attempt.into_attempt(),
                    student: AttemptStudent {
                        id: user.id,
                        username: user.username,
                        display_name: user.display_name,
                    },
                })
            })
            .collect())
    }

    /// 学生在各测验上的最近一次作答
    pub async fn latest_attempts_by_student_impl(
        &self,
        student_id: i64,
    ) -> Result<HashMap<i64, Attempt>> {
        let attempts = Attempts::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询作答记录失败: {e}")))?;

        let mut latest = HashMap::new();
        for model in attempts {
            latest
                .entry(model.quiz_id)
                .or_insert_with(|| model.into_attempt());
        }
        Ok(latest)
    }

    /// 通过 ID 获取作答
    pub async fn get_attempt_by_id_impl(&self, attempt_id: i64) -> Result<Option<Attempt>> {
        let result = Attempts::find_by_id(attempt_id)
            .one(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询作答失败: {e}")))?;

        Ok(result.map(|m| m.into_attempt()))
    }

    /// 获取所选选项文本
    pub async fn get_student_choice_impl(&self, attempt_id: i64, question_id: i64) -> Result<String> {
        let result = StudentAnswers::find()
            .filter(student_answers::Column::AttemptId.eq(attempt_id))
            .filter(student_answers::Column::QuestionId.eq(question_id))
            .find_also_related(Choices)
            .one(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询答案失败: {e}")))?;

        Ok(result
            .and_then(|(_, choice)| choice)
            .map(|c| c.text)
            .unwrap_or_else(|| NO_ANSWER.to_string()))
    }

    /// 列出某次作答的答案
    pub async fn list_attempt_answers_impl(&self, attempt_id: i64) -> Result<Vec<StudentAnswer>> {
        let answers = StudentAnswers::find()
            .filter(student_answers::Column::AttemptId.eq(attempt_id))
            .order_by_asc(student_answers::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询答案失败: {e}")))?;

        Ok(answers
            .into_iter()
            .map(|m| m.into_student_answer())
            .collect())
    }
}
