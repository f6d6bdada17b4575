//! 兼容旧版表单字段命名的测验解析
//!
//! 字段格式：`questions-{i}-text`、`questions-{i}-choice-{j}`、`questions-{i}-correct`（从 1 开始）

use std::collections::HashMap;

use super::requests::{CreateQuizRequest, QuestionDraft};

/// 表单最多扫描的题目槽位
pub const MAX_FORM_QUESTION_SLOTS: usize = 100;
/// 每题固定的选项槽位
pub const CHOICES_PER_QUESTION: usize = 4;

/// 将旧版表单字段转换为创建请求
///
/// 从第 0 题开始扫描，遇到第一个缺失或为空的题目文本即停止
pub fn parse_legacy_quiz_form(fields: &HashMap<String, String>) -> CreateQuizRequest {
    let mut questions = Vec::new();

    for i in 0..MAX_FORM_QUESTION_SLOTS {
        let text = match fields.get(&format!("questions-{i}-text")) {
            Some(t) if !t.is_empty() => t.clone(),
            _ => break,
        };

        let choices = (0..CHOICES_PER_QUESTION)
            .map(|j| {
                fields
                    .get(&format!("questions-{i}-choice-{j}"))
                    .cloned()
                    .unwrap_or_default()
            })
            .collect();

        let correct_index = fields
            .get(&format!("questions-{i}-correct"))
            .and_then(|raw| parse_one_based(raw));

        questions.push(QuestionDraft {
            text,
            choices,
            correct_index,
        });
    }

    CreateQuizRequest {
        title: fields.get("title").cloned().unwrap_or_default(),
        description: fields.get("description").cloned(),
        questions,
    }
}

// 仅接受纯数字，1 转换为下标 0
fn parse_one_based(raw: &str) -> Option<usize> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    raw.parse::<usize>().ok()?.checked_sub(1)
}
