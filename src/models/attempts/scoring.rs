//! 作答评分（纯函数，不依赖存储）

use std::collections::HashMap;

use crate::models::quizzes::entities::Question;

/// 评分结果：得分与需要保存的 (题目ID, 选项ID)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredSubmission {
    pub score: i32,
    pub answers: Vec<(i64, i64)>,
}

/// 按题目顺序评分
///
/// 选项不属于对应题目时视为未作答；不属于本测验的题目ID被忽略
pub fn score_submission(questions: &[Question], selections: &HashMap<i64, i64>) -> ScoredSubmission {
    let mut score = 0;
    let mut answers = Vec::new();

    for question in questions {
        let Some(choice_id) = selections.get(&question.id) else {
            continue;
        };
        let Some(choice) = question.find_choice(*choice_id) else {
            continue;
        };
        if choice.is_correct {
            score += 1;
        }
        answers.push((question.id, choice.id));
    }

    ScoredSubmission { score, answers }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quizzes::entities::Choice;

    fn question(id: i64, choices: &[(i64, bool)]) -> Question {
        Question {
            id,
            quiz_id: 1,
            text: format!("q{id}"),
            order: id as i32,
            choices: choices
                .iter()
                .map(|(cid, correct)| Choice {
                    id: *cid,
                    question_id: id,
                    text: format!("c{cid}"),
                    is_correct: *correct,
                })
                .collect(),
        }
    }

    // 两道题：q1 正确项为 c2，q2 正确项为 c4
    fn algebra() -> Vec<Question> {
        vec![
            question(1, &[(1, false), (2, true)]),
            question(2, &[(3, false), (4, true)]),
        ]
    }

    #[test]
    fn test_algebra_all_correct() {
        let result = score_submission(&algebra(), &HashMap::from([(1, 2), (2, 4)]));
        assert_eq!(result.score, 2);
        assert_eq!(result.answers, vec![(1, 2), (2, 4)]);
    }

    #[test]
    fn test_algebra_mixed() {
        let result = score_submission(&algebra(), &HashMap::from([(1, 1), (2, 4)]));
        assert_eq!(result.score, 1);
        assert_eq!(result.answers.len(), 2);
    }

    #[test]
    fn test_empty_submission_scores_zero() {
        let result = score_submission(&algebra(), &HashMap::new());
        assert_eq!(result.score, 0);
        assert!(result.answers.is_empty());
    }

    #[test]
    fn test_foreign_choice_is_unanswered() {
        // c4 属于 q2，用在 q1 上无效
        let result = score_submission(&algebra(), &HashMap::from([(1, 4), (99, 1)]));
        assert_eq!(result.score, 0);
        assert!(result.answers.is_empty());
    }

    #[test]
    fn test_question_without_correct_choice() {
        let questions = vec![question(1, &[(1, false), (2, false)])];
        let result = score_submission(&questions, &HashMap::from([(1, 2)]));
        assert_eq!(result.score, 0);
        assert_eq!(result.answers, vec![(1, 2)]);
    }
}
