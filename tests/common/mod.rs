#![allow(dead_code)]

use rust_quizhub::config::DatabaseConfig;
use rust_quizhub::models::quizzes::entities::QuizWithQuestions;
use rust_quizhub::models::quizzes::requests::{CreateQuizRequest, QuestionDraft};
use rust_quizhub::models::users::entities::{User, UserRole};
use rust_quizhub::models::users::requests::CreateUserRequest;
use rust_quizhub::storage::Storage;
use rust_quizhub::storage::sea_orm_storage::SeaOrmStorage;

pub async fn create_test_storage() -> SeaOrmStorage {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let path =
        std::env::temp_dir().join(format!("quizhub_test_{}_{}.db", std::process::id(), id));
    // 清理上次运行残留的文件
    let _ = std::fs::remove_file(&path);

    let config = DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", path.display()),
        pool_size: 5,
        timeout: 10,
    };
    SeaOrmStorage::connect(&config)
        .await
        .expect("failed to create test database")
}

pub async fn create_user(storage: &SeaOrmStorage, username: &str, role: UserRole) -> User {
    storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            role,
            display_name: None,
        })
        .await
        .expect("create user")
}

pub fn question(text: &str, choices: &[&str], correct_index: Option<usize>) -> QuestionDraft {
    QuestionDraft {
        text: text.to_string(),
        choices: choices.iter().map(|c| c.to_string()).collect(),
        correct_index,
    }
}

pub fn quiz_request(title: &str, questions: Vec<QuestionDraft>) -> CreateQuizRequest {
    CreateQuizRequest {
        title: title.to_string(),
        description: None,
        questions,
    }
}

/// "Algebra"：q1 正确项为第二个选项，q2 正确项为第四个选项
pub fn algebra_request() -> CreateQuizRequest {
    quiz_request(
        "Algebra",
        vec![
            question("1 + 1 = ?", &["1", "2"], Some(1)),
            question("2 * 2 = ?", &["1", "2", "3", "4"], Some(3)),
        ],
    )
}

/// 按题目顺序取第 n 个选项的 ID
pub fn choice_id(quiz: &QuizWithQuestions, question_idx: usize, choice_idx: usize) -> i64 {
    quiz.questions[question_idx].choices[choice_idx].id
}

pub fn question_id(quiz: &QuizWithQuestions, question_idx: usize) -> i64 {
    quiz.questions[question_idx].id
}
