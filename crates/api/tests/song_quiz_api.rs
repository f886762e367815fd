//! HTTP-level tests for the ephemeral song quiz endpoints.
//!
//! These routes never touch the database, so the router runs over a lazy
//! pool that is never connected.

mod common;

use std::collections::HashSet;

use axum::http::StatusCode;
use chrono::{DateTime, Duration, Utc};
use common::{body_json, post_json};
use serde_json::json;

fn served_at(question: &serde_json::Value) -> DateTime<Utc> {
    question["served_at"].as_str().unwrap().parse().unwrap()
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn generate_defaults_to_ten_image_questions() {
    let app = common::build_test_app(common::lazy_pool());
    let response = post_json(app, "/api/v1/song-quiz/generate-questions", json!({})).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let questions = json["data"].as_array().unwrap();
    assert_eq!(questions.len(), 10);

    let mut ids = HashSet::new();
    for q in questions {
        assert!(ids.insert(q["id"].as_i64().unwrap()));
        assert!(q["id"].as_i64().unwrap() > 100_000);
        assert_eq!(q["option_type"], "IMAGE");
        assert!(q["audio_url"].is_string());
        let text = q["text"].as_str().unwrap();
        assert!(text.starts_with("Who is the ") || text.starts_with("Which cinema "));

        let options = q["options"].as_array().unwrap();
        assert_eq!(options.len(), 4);
        let labels: HashSet<String> = options
            .iter()
            .map(|o| o["label"].as_str().unwrap().to_lowercase())
            .collect();
        assert_eq!(labels.len(), 4, "labels must be distinct: {options:?}");
        // The answer key is never served.
        assert!(q.get("correct_answer").is_none());
    }
}

#[tokio::test]
async fn generate_honours_count() {
    let app = common::build_test_app(common::lazy_pool());
    let response = post_json(
        app,
        "/api/v1/song-quiz/generate-questions",
        json!({"count": 3}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn generate_rejects_out_of_range_count() {
    for count in [0, 51] {
        let app = common::build_test_app(common::lazy_pool());
        let response = post_json(
            app,
            "/api/v1/song-quiz/generate-questions",
            json!({"count": count}),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }
}

// ---------------------------------------------------------------------------
// Checking answers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn check_correct_fast_answer_scores_ten() {
    let song_quiz = common::test_song_quiz();
    let app = common::build_test_app_with(common::lazy_pool(), song_quiz.clone());
    let response = post_json(
        app,
        "/api/v1/song-quiz/generate-questions",
        json!({"count": 1}),
    )
    .await;
    let json = body_json(response).await;
    let question = &json["data"][0];
    let id = question["id"].as_i64().unwrap();

    let expected = song_quiz.store().get(id).unwrap().correct_answer_name;
    let answered_at = served_at(question) + Duration::seconds(2);

    let app = common::build_test_app_with(common::lazy_pool(), song_quiz);
    let response = post_json(
        app,
        "/api/v1/song-quiz/check-answer",
        json!({
            "question_id": id,
            "difficulty": "EASY",
            "selected_option": expected.to_uppercase(),
            "answered_at": answered_at,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["correct"], true);
    assert_eq!(json["data"]["correct_answer_label"], expected.as_str());
    assert_eq!(json["data"]["time_taken_seconds"], 2);
    assert_eq!(json["data"]["score_earned"], 10);
}

#[tokio::test]
async fn check_wrong_answer_scores_zero_and_reveals_label() {
    let song_quiz = common::test_song_quiz();
    let app = common::build_test_app_with(common::lazy_pool(), song_quiz.clone());
    let json = body_json(
        post_json(
            app,
            "/api/v1/song-quiz/generate-questions",
            json!({"count": 1}),
        )
        .await,
    )
    .await;
    let id = json["data"][0]["id"].as_i64().unwrap();
    let expected = song_quiz.store().get(id).unwrap().correct_answer_name;

    let app = common::build_test_app_with(common::lazy_pool(), song_quiz);
    let response = post_json(
        app,
        "/api/v1/song-quiz/check-answer",
        json!({
            "question_id": id,
            "difficulty": "hard",
            "selected_option": null,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["correct"], false);
    assert_eq!(json["data"]["score_earned"], 0);
    assert_eq!(json["data"]["correct_answer_label"], expected.as_str());
}

#[tokio::test]
async fn check_unknown_question_returns_404() {
    let app = common::build_test_app(common::lazy_pool());
    let response = post_json(
        app,
        "/api/v1/song-quiz/check-answer",
        json!({"question_id": 5, "difficulty": "EASY", "selected_option": "Surya"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn check_invalid_difficulty_returns_400() {
    let app = common::build_test_app(common::lazy_pool());
    let response = post_json(
        app,
        "/api/v1/song-quiz/check-answer",
        json!({"question_id": 100_001, "difficulty": "EXTREME"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Submitting
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submit_sums_scores_and_skips_unknown_questions() {
    let song_quiz = common::test_song_quiz();
    let app = common::build_test_app_with(common::lazy_pool(), song_quiz.clone());
    let json = body_json(
        post_json(
            app,
            "/api/v1/song-quiz/generate-questions",
            json!({"count": 2}),
        )
        .await,
    )
    .await;

    let mut answers = Vec::new();
    for (offset, q) in [1, 9].iter().zip(json["data"].as_array().unwrap()) {
        let id = q["id"].as_i64().unwrap();
        let name = song_quiz.store().get(id).unwrap().correct_answer_name;
        answers.push(json!({
            "question_id": id,
            "selected_option": name,
            "answered_at": served_at(q) + Duration::seconds(*offset),
        }));
    }
    answers.push(json!({
        "question_id": 7,
        "selected_option": "Anyone",
        "answered_at": Utc::now(),
    }));

    // MEDIUM budget 15s: 1s scores 10, 9s scores 7.
    let app = common::build_test_app_with(common::lazy_pool(), song_quiz);
    let response = post_json(
        app,
        "/api/v1/song-quiz/submit-quiz",
        json!({"difficulty": "MEDIUM", "answers": answers}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["total_score"], 17);
}

#[tokio::test]
async fn submit_with_only_unknown_questions_totals_zero() {
    let app = common::build_test_app(common::lazy_pool());
    let response = post_json(
        app,
        "/api/v1/song-quiz/submit-quiz",
        json!({
            "difficulty": "EASY",
            "answers": [
                {"question_id": 1, "selected_option": "Surya", "answered_at": Utc::now()}
            ],
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["total_score"], 0);
}
