use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

static LEGACY_ANSWER_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^question_(\d+)$").expect("valid regex"));

// 提交作答请求：题目ID -> 选项ID
//
// 键和值都允许是数字或数字字符串，无法解析的条目直接忽略
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attempt.ts")]
pub struct SubmitAttemptRequest {
    #[serde(default)]
    #[ts(type = "Record<string, number>")]
    pub answers: HashMap<String, serde_json::Value>,
}

impl SubmitAttemptRequest {
    pub fn selections(&self) -> HashMap<i64, i64> {
        self.answers
            .iter()
            .filter_map(|(key, value)| {
                let question_id = key.trim().parse::<i64>().ok()?;
                let choice_id = match value {
                    serde_json::Value::Number(n) => n.as_i64()?,
                    serde_json::Value::String(s) => s.trim().parse::<i64>().ok()?,
                    _ => return None,
                };
                Some((question_id, choice_id))
            })
            .collect()
    }
}

/// 解析旧版表单中的 `question_{id}=<choice_id>` 字段
pub fn parse_legacy_answers(fields: &HashMap<String, String>) -> HashMap<i64, i64> {
    fields
        .iter()
        .filter_map(|(key, value)| {
            let caps = LEGACY_ANSWER_KEY.captures(key)?;
            let question_id = caps[1].parse::<i64>().ok()?;
            let choice_id = value.trim().parse::<i64>().ok()?;
            Some((question_id, choice_id))
        })
        .collect()
}
