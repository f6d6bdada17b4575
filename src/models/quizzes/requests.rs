use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::entities::{DEFAULT_QUIZ_DESCRIPTION, NewChoice, NewQuestion, NewQuiz};
use crate::config::QuizConfig;
use crate::errors::{QuizHubError, Result};
use crate::utils::validate::{validate_choice_text, validate_question_text, validate_quiz_title};

// 测验列表查询参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct QuizListParams {
    pub search: Option<String>,
}

// 创建测验请求
//
// 校验失败时整个请求体会原样返回给调用方，便于修改后重新提交
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct CreateQuizRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Vec<QuestionDraft>,
}

// 题目草稿
//
// correct_index 从 0 开始，指向 choices 中的位置；空白选项保留位置但不会被保存
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct QuestionDraft {
    pub text: String,
    #[serde(default)]
    pub choices: Vec<String>,
    #[serde(default)]
    pub correct_index: Option<usize>,
}

impl CreateQuizRequest {
    /// 校验并转换为待写入的测验结构
    pub fn to_new_quiz(&self, policy: &QuizConfig) -> Result<NewQuiz> {
        let title = self.title.trim();
        validate_quiz_title(title).map_err(QuizHubError::validation)?;

        if self.questions.len() > policy.max_questions {
            return Err(QuizHubError::validation(format!(
                "A quiz can have at most {} questions",
                policy.max_questions
            )));
        }

        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(DEFAULT_QUIZ_DESCRIPTION)
            .to_string();

        let questions = self
            .questions
            .iter()
            .enumerate()
            .map(|(idx, draft)| draft.to_new_question(idx, policy))
            .collect::<Result<Vec<_>>>()?;

        Ok(NewQuiz {
            title: title.to_string(),
            description,
            questions,
        })
    }
}

impl QuestionDraft {
    fn to_new_question(&self, idx: usize, policy: &QuizConfig) -> Result<NewQuestion> {
        let text = self.text.trim();
        validate_question_text(text)
            .map_err(|e| QuizHubError::validation(format!("Question {}: {e}", idx + 1)))?;

        if self.choices.len() > policy.max_choices {
            return Err(QuizHubError::validation(format!(
                "Question {}: at most {} choices are allowed",
                idx + 1,
                policy.max_choices
            )));
        }

        let mut choices = Vec::with_capacity(self.choices.len());
        for (pos, raw) in self.choices.iter().enumerate() {
            let choice_text = raw.trim();
            if choice_text.is_empty() {
                continue;
            }
            validate_choice_text(choice_text).map_err(|e| {
                QuizHubError::validation(format!("Question {} choice {}: {e}", idx + 1, pos + 1))
            })?;
            choices.push(NewChoice {
                text: choice_text.to_string(),
                is_correct: self.correct_index == Some(pos),
            });
        }

        Ok(NewQuestion {
            text: text.to_string(),
            choices,
        })
    }
}
