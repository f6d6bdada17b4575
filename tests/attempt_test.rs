mod common;

use std::collections::HashMap;
use std::sync::Arc;

use rust_quizhub::config::QuizConfig;
use rust_quizhub::errors::QuizHubError;
use rust_quizhub::models::attempts::entities::NO_ANSWER;
use rust_quizhub::models::attempts::scoring::score_submission;
use rust_quizhub::models::users::entities::UserRole;
use rust_quizhub::services::attempts::submit::submit_attempt;
use rust_quizhub::services::quizzes::create::create_quiz_as;
use rust_quizhub::storage::Storage;

use common::{
    algebra_request, choice_id, create_test_storage, create_user, question, question_id,
    quiz_request,
};

#[tokio::test]
async fn algebra_scores_follow_correct_choices() {
    let storage = create_test_storage().await;
    let teacher = create_user(&storage, "teacher", UserRole::Teacher).await;
    let student = create_user(&storage, "student", UserRole::Student).await;
    let policy = QuizConfig::default();

    let quiz = create_quiz_as(&storage, &teacher, &algebra_request(), &policy)
        .await
        .unwrap();
    let (q1, q2) = (question_id(&quiz, 0), question_id(&quiz, 1));

    let all_correct = HashMap::from([(q1, choice_id(&quiz, 0, 1)), (q2, choice_id(&quiz, 1, 3))]);
    let first = submit_attempt(&storage, &quiz.quiz, &student, &all_correct, &policy)
        .await
        .unwrap();
    assert_eq!(first.score, 2);
    assert_eq!(first.attempt_number, 1);

    let mixed = HashMap::from([(q1, choice_id(&quiz, 0, 0)), (q2, choice_id(&quiz, 1, 3))]);
    let second = submit_attempt(&storage, &quiz.quiz, &student, &mixed, &policy)
        .await
        .unwrap();
    assert_eq!(second.score, 1);
    assert_eq!(second.attempt_number, 2);

    let empty = submit_attempt(&storage, &quiz.quiz, &student, &HashMap::new(), &policy)
        .await
        .unwrap();
    assert_eq!(empty.score, 0);

    // 内存评分与存储评分一致
    let scored = score_submission(&quiz.questions, &mixed);
    assert_eq!(scored.score, second.score);
}

#[tokio::test]
async fn fourth_attempt_is_rejected_and_count_stays_at_limit() {
    let storage = create_test_storage().await;
    let teacher = create_user(&storage, "teacher", UserRole::Teacher).await;
    let student = create_user(&storage, "student", UserRole::Student).await;
    let policy = QuizConfig::default();

    let quiz = create_quiz_as(&storage, &teacher, &algebra_request(), &policy)
        .await
        .unwrap();

    for expected in 1..=3 {
        let attempt = submit_attempt(&storage, &quiz.quiz, &student, &HashMap::new(), &policy)
            .await
            .unwrap();
        assert_eq!(attempt.attempt_number, expected);
    }

    let err = submit_attempt(&storage, &quiz.quiz, &student, &HashMap::new(), &policy)
        .await
        .unwrap_err();
    assert!(matches!(err, QuizHubError::AttemptLimitExceeded(_)));
    assert_eq!(
        storage.count_attempts(quiz.quiz.id, student.id).await.unwrap(),
        3
    );

    // 其他学生不受影响
    let other = create_user(&storage, "other", UserRole::Student).await;
    assert!(
        submit_attempt(&storage, &quiz.quiz, &other, &HashMap::new(), &policy)
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn attempt_limit_follows_configuration() {
    let storage = create_test_storage().await;
    let teacher = create_user(&storage, "teacher", UserRole::Teacher).await;
    let student = create_user(&storage, "student", UserRole::Student).await;
    let policy = QuizConfig {
        max_attempts: 1,
        ..QuizConfig::default()
    };

    let quiz = create_quiz_as(&storage, &teacher, &algebra_request(), &policy)
        .await
        .unwrap();

    submit_attempt(&storage, &quiz.quiz, &student, &HashMap::new(), &policy)
        .await
        .unwrap();
    let err = submit_attempt(&storage, &quiz.quiz, &student, &HashMap::new(), &policy)
        .await
        .unwrap_err();
    assert!(matches!(err, QuizHubError::AttemptLimitExceeded(_)));
}

#[tokio::test]
async fn student_choice_reports_text_or_no_answer() {
    let storage = create_test_storage().await;
    let teacher = create_user(&storage, "teacher", UserRole::Teacher).await;
    let student = create_user(&storage, "student", UserRole::Student).await;
    let policy = QuizConfig::default();

    let quiz = create_quiz_as(
        &storage,
        &teacher,
        &quiz_request(
            "Colors",
            vec![
                question("Sky?", &["Blue", "Green"], Some(0)),
                question("Grass?", &["Blue", "Green"], Some(1)),
                question("Snow?", &["White", "Black"], Some(0)),
            ],
        ),
        &policy,
    )
    .await
    .unwrap();

    // 第三题选了属于第一题的选项，视为未作答
    let selections = HashMap::from([
        (question_id(&quiz, 0), choice_id(&quiz, 0, 0)),
        (question_id(&quiz, 1), choice_id(&quiz, 1, 0)),
        (question_id(&quiz, 2), choice_id(&quiz, 0, 1)),
    ]);
    let attempt = submit_attempt(&storage, &quiz.quiz, &student, &selections, &policy)
        .await
        .unwrap();
    assert_eq!(attempt.score, 1);

    let texts = [
        storage
            .get_student_choice(attempt.id, question_id(&quiz, 0))
            .await
            .unwrap(),
        storage
            .get_student_choice(attempt.id, question_id(&quiz, 1))
            .await
            .unwrap(),
        storage
            .get_student_choice(attempt.id, question_id(&quiz, 2))
            .await
            .unwrap(),
    ];
    assert_eq!(texts, ["Blue".to_string(), "Blue".to_string(), NO_ANSWER.to_string()]);

    let answers = storage.list_attempt_answers(attempt.id).await.unwrap();
    assert_eq!(answers.len(), 2);
}

#[tokio::test]
async fn teachers_cannot_submit_attempts() {
    let storage = create_test_storage().await;
    let teacher = create_user(&storage, "teacher", UserRole::Teacher).await;
    let policy = QuizConfig::default();

    let quiz = create_quiz_as(&storage, &teacher, &algebra_request(), &policy)
        .await
        .unwrap();
    let err = submit_attempt(&storage, &quiz.quiz, &teacher, &HashMap::new(), &policy)
        .await
        .unwrap_err();
    assert!(matches!(err, QuizHubError::Authorization(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submissions_never_exceed_limit() {
    let storage = Arc::new(create_test_storage().await);
    let teacher = create_user(&storage, "teacher", UserRole::Teacher).await;
    let student = create_user(&storage, "student", UserRole::Student).await;
    let quiz = create_quiz_as(
        storage.as_ref(),
        &teacher,
        &algebra_request(),
        &QuizConfig::default(),
    )
    .await
    .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let storage = storage.clone();
            let quiz_id = quiz.quiz.id;
            let student_id = student.id;
            tokio::spawn(async move {
                storage
                    .create_attempt(quiz_id, student_id, &HashMap::new(), 3)
                    .await
            })
        })
        .collect();

    let mut numbers = Vec::new();
    for handle in handles {
        match handle.await.expect("task should not panic") {
            Ok(attempt) => numbers.push(attempt.attempt_number),
            Err(e) => assert!(
                matches!(
                    e,
                    QuizHubError::Conflict(_) | QuizHubError::AttemptLimitExceeded(_)
                ),
                "unexpected error: {e}"
            ),
        }
    }

    let count = storage
        .count_attempts(quiz.quiz.id, student.id)
        .await
        .unwrap();
    assert!(count <= 3, "stored {count} attempts");
    assert_eq!(numbers.len() as i64, count);

    numbers.sort();
    numbers.dedup();
    assert_eq!(numbers.len() as i64, count);
    assert!(numbers.iter().all(|n| (1..=3).contains(n)));
}
