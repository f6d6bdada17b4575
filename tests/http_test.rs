mod common;

use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{App, http::StatusCode, test, web};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};

use rust_quizhub::config::{AppConfig, QuizConfig};
use rust_quizhub::models::ErrorCode;
use rust_quizhub::models::users::entities::{User, UserRole};
use rust_quizhub::routes::configure_system_routes;
use rust_quizhub::routes::quizzes::configure_quiz_routes_with_limit;
use rust_quizhub::storage::Storage;
use rust_quizhub::utils::jwt::Claims;

use common::{create_test_storage, create_user};

fn bearer(user: &User) -> (&'static str, String) {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user.id.to_string(),
        role: user.role.to_string(),
        token_type: "access".to_string(),
        exp: (now + 3600) as usize,
        iat: now as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(AppConfig::get().jwt.secret.as_ref()),
    )
    .unwrap();
    ("Authorization", format!("Bearer {token}"))
}

fn algebra_json() -> Value {
    json!({
        "title": "Algebra",
        "description": "Basics",
        "questions": [
            { "text": "1 + 1 = ?", "choices": ["1", "2"], "correct_index": 1 },
            { "text": "2 * 2 = ?", "choices": ["1", "2", "3", "4"], "correct_index": 3 }
        ]
    })
}

macro_rules! init_app {
    ($storage:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($storage.clone()))
                .app_data(web::Data::new(QuizConfig::default()))
                .app_data(
                    web::FormConfig::default()
                        .limit(AppConfig::get().server.limits.max_payload_size),
                )
                .configure(|cfg| configure_quiz_routes_with_limit(cfg, 100))
                .configure(configure_system_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn health_is_public() {
    let storage: Arc<dyn Storage> = Arc::new(create_test_storage().await);
    let app = init_app!(storage);

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["code"], ErrorCode::Success as i32);
    assert_eq!(body["data"]["status"], "ok");
}

#[actix_web::test]
async fn quiz_routes_require_token() {
    let storage: Arc<dyn Storage> = Arc::new(create_test_storage().await);
    let app = init_app!(storage);

    let req = test::TestRequest::get().uri("/api/v1/quizzes").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/v1/quizzes")
        .insert_header(("Authorization", "Bearer not-a-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn only_teachers_create_and_duplicates_echo_input() {
    let sea = create_test_storage().await;
    let teacher = create_user(&sea, "teacher", UserRole::Teacher).await;
    let student = create_user(&sea, "student", UserRole::Student).await;
    let storage: Arc<dyn Storage> = Arc::new(sea);
    let app = init_app!(storage);

    let req = test::TestRequest::post()
        .uri("/api/v1/quizzes")
        .insert_header(bearer(&student))
        .set_json(algebra_json())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/api/v1/quizzes")
        .insert_header(bearer(&teacher))
        .set_json(algebra_json())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/v1/quizzes")
        .insert_header(bearer(&teacher))
        .set_json(algebra_json())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::QuizAlreadyExists as i32);
    assert_eq!(body["data"]["title"], "Algebra");
    assert_eq!(body["data"]["description"], "Basics");

    let req = test::TestRequest::post()
        .uri("/api/v1/quizzes")
        .insert_header(bearer(&teacher))
        .set_json(json!({ "title": "   ", "questions": [] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], ErrorCode::QuizValidationFailed as i32);
    assert_eq!(body["message"], "Title is required");
}

#[actix_web::test]
async fn student_submits_and_sees_score() {
    let sea = create_test_storage().await;
    let teacher = create_user(&sea, "teacher", UserRole::Teacher).await;
    let student = create_user(&sea, "student", UserRole::Student).await;
    let storage: Arc<dyn Storage> = Arc::new(sea);
    let app = init_app!(storage);

    let req = test::TestRequest::post()
        .uri("/api/v1/quizzes")
        .insert_header(bearer(&teacher))
        .set_json(algebra_json())
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let q1 = &created["data"]["questions"][0];
    let mut selections = serde_json::Map::new();
    selections.insert(q1["id"].to_string(), q1["choices"][1]["id"].clone());
    let answers = json!({ "answers": selections });

    let req = test::TestRequest::post()
        .uri("/api/v1/quizzes/Algebra")
        .insert_header(bearer(&student))
        .set_json(&answers)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["view"], "student");
    assert_eq!(body["data"]["data"]["last_attempt"]["score"], 1);
    assert_eq!(body["data"]["data"]["attempts_remaining"], 2);

    let req = test::TestRequest::get()
        .uri("/api/v1/quizzes/Algebra")
        .insert_header(bearer(&teacher))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["view"], "teacher");
    assert_eq!(body["data"]["data"]["attempts"][0]["student"]["username"], "student");

    let req = test::TestRequest::get()
        .uri("/api/v1/quizzes/Missing")
        .insert_header(bearer(&student))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn legacy_form_accepts_full_size_quiz() {
    let sea = create_test_storage().await;
    let teacher = create_user(&sea, "teacher", UserRole::Teacher).await;
    let storage: Arc<dyn Storage> = Arc::new(sea);
    let app = init_app!(storage);

    let mut fields = HashMap::new();
    fields.insert("title".to_string(), "Marathon".to_string());
    fields.insert("description".to_string(), "One hundred questions".to_string());
    for i in 0..100 {
        fields.insert(
            format!("questions-{i}-text"),
            format!("Question number {i}: which answer is right?"),
        );
        for j in 0..4 {
            fields.insert(
                format!("questions-{i}-choice-{j}"),
                format!("Answer option {j} for question {i}"),
            );
        }
        fields.insert(format!("questions-{i}-correct"), "3".to_string());
    }

    let req = test::TestRequest::post()
        .uri("/api/v1/quizzes/form")
        .insert_header(bearer(&teacher))
        .set_form(&fields)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    let questions = body["data"]["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 100);
    assert_eq!(questions[99]["choices"][2]["is_correct"], true);
}
