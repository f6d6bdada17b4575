//! 测验存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::{
    choices::{self, Entity as Choices},
    questions::{self, Entity as Questions},
    quizzes::{ActiveModel, Column, Entity as Quizzes},
};
use crate::errors::{QuizHubError, Result};
use crate::models::quizzes::entities::{Choice, NewQuiz, Question, Quiz, QuizWithQuestions};
use crate::utils::escape_like_pattern;
use sea_orm::sea_query::{Expr, ExprTrait, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};

/// 加载测验的题目和选项（题目按插入顺序，选项按ID）
///
/// 同时用于普通连接和事务内
pub(super) async fn load_questions<C>(db: &C, quiz_id: i64) -> Result<Vec<Question>>
where
    C: ConnectionTrait,
{
    let question_models = Questions::find()
        .filter(questions::Column::QuizId.eq(quiz_id))
        .order_by_asc(questions::Column::SortOrder)
        .order_by_asc(questions::Column::Id)
        .all(db)
        .await
        .map_err(|e| QuizHubError::database_operation(format!("查询题目失败: {e}")))?;

    if question_models.is_empty() {
        return Ok(Vec::new());
    }

    let question_ids: Vec<i64> = question_models.iter().map(|q| q.id).collect();
    let choice_models = Choices::find()
        .filter(choices::Column::QuestionId.is_in(question_ids))
        .order_by_asc(choices::Column::Id)
        .all(db)
        .await
        .map_err(|e| QuizHubError::database_operation(format!("查询选项失败: {e}")))?;

    let mut grouped: HashMap<i64, Vec<Choice>> = HashMap::new();
    for model in choice_models {
        grouped
            .entry(model.question_id)
            .or_default()
            .push(model.into_choice());
    }

    Ok(question_models
        .into_iter()
        .map(|q| {
            let choices = grouped.remove(&q.id).unwrap_or_default();
            q.into_question(choices)
        })
        .collect())
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

impl SeaOrmStorage {
    /// 创建测验（含题目与选项），任一步失败整体回滚
    pub async fn create_quiz_impl(
        &self,
        created_by: i64,
        quiz: NewQuiz,
    ) -> Result<QuizWithQuestions> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| QuizHubError::database_operation(format!("开启事务失败: {e}")))?;

        let duplicated = Quizzes::find()
            .filter(Column::Title.eq(quiz.title.as_str()))
            .count(&txn)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询测验失败: {e}")))?
            > 0;
        if duplicated {
            return Err(QuizHubError::duplicate_title(format!(
                "A quiz titled \"{}\" already exists",
                quiz.title
            )));
        }

        let quiz_model = ActiveModel {
            title: Set(quiz.title.clone()),
            created_by: Set(created_by),
            description: Set(quiz.description),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                QuizHubError::duplicate_title(format!(
                    "A quiz titled \"{}\" already exists",
                    quiz.title
                ))
            } else {
                QuizHubError::database_operation(format!("创建测验失败: {e}"))
            }
        })?;

        for (order, question) in quiz.questions.into_iter().enumerate() {
            let question_model = questions::ActiveModel {
                quiz_id: Set(quiz_model.id),
                text: Set(question.text),
                sort_order: Set(order as i32),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("创建题目失败: {e}")))?;

            for choice in question.choices {
                choices::ActiveModel {
                    question_id: Set(question_model.id),
                    text: Set(choice.text),
                    is_correct: Set(choice.is_correct),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(|e| QuizHubError::database_operation(format!("创建选项失败: {e}")))?;
            }
        }

        let questions = load_questions(&txn, quiz_model.id).await?;

        txn.commit()
            .await
            .map_err(|e| QuizHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(QuizWithQuestions {
            quiz: quiz_model.into_quiz(),
            questions,
        })
    }

    /// 通过标题获取测验
    pub async fn get_quiz_by_title_impl(&self, title: &str) -> Result<Option<Quiz>> {
        let result = Quizzes::find()
            .filter(Column::Title.eq(title))
            .one(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询测验失败: {e}")))?;

        Ok(result.map(|m| m.into_quiz()))
    }

    pub async fn get_quiz_questions_impl(&self, quiz_id: i64) -> Result<Vec<Question>> {
        load_questions(&self.db, quiz_id).await
    }

    /// 列出测验，按标题字母序
    pub async fn list_quizzes_impl(&self, search: Option<&str>) -> Result<Vec<Quiz>> {
        let mut select = Quizzes::find();

        // 搜索条件（不区分大小写）
        if let Some(search) = search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(&search.trim().to_lowercase());
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(Column::Title)))
                    .like(LikeExpr::new(format!("%{escaped}%")).escape('\\')),
            );
        }

        let quizzes = select
            .order_by_asc(Column::Title)
            .all(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("查询测验列表失败: {e}")))?;

        Ok(quizzes.into_iter().map(|m| m.into_quiz()).collect())
    }

    /// 删除测验
    pub async fn delete_quiz_impl(&self, quiz_id: i64) -> Result<bool> {
        let result = Quizzes::delete_by_id(quiz_id)
            .exec(&self.db)
            .await
            .map_err(|e| QuizHubError::database_operation(format!("删除测验失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
