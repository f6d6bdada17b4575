mod common;

use std::collections::HashMap;

use rust_quizhub::config::QuizConfig;
use rust_quizhub::errors::QuizHubError;
use rust_quizhub::models::quizzes::entities::DEFAULT_QUIZ_DESCRIPTION;
use rust_quizhub::models::quizzes::form::parse_legacy_quiz_form;
use rust_quizhub::models::users::entities::UserRole;
use rust_quizhub::services::quizzes::create::create_quiz_as;
use rust_quizhub::services::quizzes::delete::delete_quiz_as;
use rust_quizhub::storage::Storage;

use common::{
    algebra_request, choice_id, create_test_storage, create_user, question, question_id,
    quiz_request,
};

#[tokio::test]
async fn creates_every_question_with_designated_correct_choice() {
    let storage = create_test_storage().await;
    let teacher = create_user(&storage, "teacher", UserRole::Teacher).await;
    let policy = QuizConfig::default();

    let drafts = (0..12)
        .map(|i| {
            question(
                &format!("Question {i}"),
                &["a", "b", "c", "d"][..(i % 4) + 1],
                Some(i % 4),
            )
        })
        .collect();
    let created = create_quiz_as(&storage, &teacher, &quiz_request("Many", drafts), &policy)
        .await
        .expect("quiz should be created");

    assert_eq!(created.questions.len(), 12);
    assert_eq!(created.quiz.description, DEFAULT_QUIZ_DESCRIPTION);

    let stored = storage.get_quiz_questions(created.quiz.id).await.unwrap();
    assert_eq!(stored.len(), 12);
    for (i, q) in stored.iter().enumerate() {
        assert_eq!(q.text, format!("Question {i}"));
        assert_eq!(q.order, i as i32);
        assert_eq!(q.choices.len(), (i % 4) + 1);
        let correct: Vec<usize> = q
            .choices
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_correct)
            .map(|(idx, _)| idx)
            .collect();
        assert_eq!(correct, vec![i % 4]);
    }
}

#[tokio::test]
async fn quiz_without_questions_is_allowed() {
    let storage = create_test_storage().await;
    let teacher = create_user(&storage, "teacher", UserRole::Teacher).await;

    let created = create_quiz_as(
        &storage,
        &teacher,
        &quiz_request("Empty", vec![]),
        &QuizConfig::default(),
    )
    .await
    .unwrap();

    assert!(created.questions.is_empty());
    assert!(storage.get_quiz_by_title("Empty").await.unwrap().is_some());
}

#[tokio::test]
async fn invalid_correct_index_stores_no_correct_choice() {
    let storage = create_test_storage().await;
    let teacher = create_user(&storage, "teacher", UserRole::Teacher).await;

    let created = create_quiz_as(
        &storage,
        &teacher,
        &quiz_request(
            "Loose",
            vec![
                question("none", &["x", "y"], None),
                question("out of range", &["x", "y"], Some(9)),
            ],
        ),
        &QuizConfig::default(),
    )
    .await
    .unwrap();

    for q in &created.questions {
        assert!(q.correct_choice().is_none());
    }
}

#[tokio::test]
async fn duplicate_title_fails_and_writes_nothing() {
    let storage = create_test_storage().await;
    let teacher = create_user(&storage, "teacher", UserRole::Teacher).await;
    let policy = QuizConfig::default();

    let first = create_quiz_as(
        &storage,
        &teacher,
        &quiz_request("Algebra", vec![question("q", &["a"], Some(0))]),
        &policy,
    )
    .await
    .unwrap();

    let err = create_quiz_as(
        &storage,
        &teacher,
        &quiz_request(
            "  Algebra ",
            vec![question("other", &["a", "b"], Some(1))],
        ),
        &policy,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, QuizHubError::DuplicateTitle(_)));
    assert!(err.is_validation());

    let quizzes = storage.list_quizzes(None).await.unwrap();
    assert_eq!(quizzes.len(), 1);
    let questions = storage.get_quiz_questions(first.quiz.id).await.unwrap();
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].text, "q");
}

#[tokio::test]
async fn validation_failure_writes_nothing() {
    let storage = create_test_storage().await;
    let teacher = create_user(&storage, "teacher", UserRole::Teacher).await;

    let err = create_quiz_as(
        &storage,
        &teacher,
        &quiz_request(
            "Broken",
            vec![question("ok", &["a"], Some(0)), question("", &["a"], None)],
        ),
        &QuizConfig::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, QuizHubError::Validation(_)));
    assert!(storage.list_quizzes(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn students_cannot_author_quizzes() {
    let storage = create_test_storage().await;
    let student = create_user(&storage, "student", UserRole::Student).await;

    let err = create_quiz_as(
        &storage,
        &student,
        &quiz_request("Nope", vec![]),
        &QuizConfig::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, QuizHubError::Authorization(_)));
}

#[tokio::test]
async fn legacy_form_creates_quiz_with_one_based_correct_index() {
    let storage = create_test_storage().await;
    let teacher = create_user(&storage, "teacher", UserRole::Teacher).await;

    let fields: HashMap<String, String> = [
        ("title", "Geography"),
        ("description", "Capitals"),
        ("questions-0-text", "Capital of France?"),
        ("questions-0-choice-0", "Berlin"),
        ("questions-0-choice-1", "Paris"),
        ("questions-0-choice-2", ""),
        ("questions-0-correct", "2"),
        ("questions-1-text", "Capital of Japan?"),
        ("questions-1-choice-0", "Tokyo"),
        ("questions-1-correct", "abc"),
        ("questions-3-text", "skipped after the gap"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let created = create_quiz_as(
        &storage,
        &teacher,
        &parse_legacy_quiz_form(&fields),
        &QuizConfig::default(),
    )
    .await
    .unwrap();

    assert_eq!(created.quiz.description, "Capitals");
    assert_eq!(created.questions.len(), 2);

    let first = &created.questions[0];
    assert_eq!(first.choices.len(), 2);
    assert_eq!(first.correct_choice().map(|c| c.text.as_str()), Some("Paris"));

    let second = &created.questions[1];
    assert!(second.correct_choice().is_none());
}

#[tokio::test]
async fn list_is_alphabetical_and_search_ignores_case() {
    let storage = create_test_storage().await;
    let teacher = create_user(&storage, "teacher", UserRole::Teacher).await;
    let policy = QuizConfig::default();

    for title in ["geometry", "Algebra", "Linear Algebra", "calculus"] {
        create_quiz_as(&storage, &teacher, &quiz_request(title, vec![]), &policy)
            .await
            .unwrap();
    }

    let titles: Vec<String> = storage
        .list_quizzes(Some("ALGEBRA"))
        .await
        .unwrap()
        .into_iter()
        .map(|q| q.title)
        .collect();
    assert_eq!(titles, vec!["Algebra", "Linear Algebra"]);

    let all = storage.list_quizzes(Some("   ")).await.unwrap();
    assert_eq!(all.len(), 4);

    let none = storage.list_quizzes(Some("100%")).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn delete_requires_creator_or_admin() {
    let storage = create_test_storage().await;
    let owner = create_user(&storage, "owner", UserRole::Teacher).await;
    let other = create_user(&storage, "other", UserRole::Teacher).await;
    let admin = create_user(&storage, "admin", UserRole::Admin).await;
    let policy = QuizConfig::default();

    for title in ["First", "Second"] {
        create_quiz_as(
            &storage,
            &owner,
            &quiz_request(title, vec![question("q", &["a", "b"], Some(0))]),
            &policy,
        )
        .await
        .unwrap();
    }

    let err = delete_quiz_as(&storage, &other, "First").await.unwrap_err();
    assert!(matches!(err, QuizHubError::Authorization(_)));

    delete_quiz_as(&storage, &owner, "First").await.unwrap();
    delete_quiz_as(&storage, &admin, "Second").await.unwrap();
    assert!(storage.list_quizzes(None).await.unwrap().is_empty());

    let err = delete_quiz_as(&storage, &owner, "First").await.unwrap_err();
    assert!(matches!(err, QuizHubError::NotFound(_)));
}

#[tokio::test]
async fn delete_cascades_to_questions_attempts_and_answers() {
    let storage = create_test_storage().await;
    let teacher = create_user(&storage, "teacher", UserRole::Teacher).await;
    let student = create_user(&storage, "student", UserRole::Student).await;

    let created = create_quiz_as(
        &storage,
        &teacher,
        &algebra_request(),
        &QuizConfig::default(),
    )
    .await
    .unwrap();
    let quiz_id = created.quiz.id;

    let answers = HashMap::from([
        (question_id(&created, 0), choice_id(&created, 0, 1)),
        (question_id(&created, 1), choice_id(&created, 1, 3)),
    ]);
    let attempt = storage
        .create_attempt(quiz_id, student.id, &answers, 3)
        .await
        .unwrap();
    assert_eq!(
        storage.list_attempt_answers(attempt.id).await.unwrap().len(),
        2
    );

    delete_quiz_as(&storage, &teacher, "Algebra").await.unwrap();

    assert!(storage.get_quiz_questions(quiz_id).await.unwrap().is_empty());
    assert_eq!(storage.count_attempts(quiz_id, student.id).await.unwrap(), 0);
    assert!(storage.get_attempt_by_id(attempt.id).await.unwrap().is_none());
    assert!(
        storage
            .list_attempt_answers(attempt.id)
            .await
            .unwrap()
            .is_empty()
    );
}
