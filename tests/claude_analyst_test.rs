//! Integration tests for the Claude analyst adapter against a mock HTTP server.

mod common;

use mockito::{Matcher, Server};
use serde_json::Number;

use balance_tuner::domain::models::{BalanceConfig, TargetSpec};
use balance_tuner::domain::ports::{AnalysisRequest, RecommendationOracle};
use balance_tuner::infrastructure::claude::{ClaudeAnalyst, ClaudeClient, ClaudeClientConfig};
use balance_tuner::TuningError;
use common::off_target_results;

const MODEL: &str = "claude-haiku-4-5-20251001";

fn response_body(text: &str) -> String {
    serde_json::json!({
        "id": "msg_01ABC123",
        "type": "message",
        "role": "assistant",
        "content": [{ "type": "text", "text": text }],
        "model": MODEL,
        "stop_reason": "end_turn",
        "usage": { "input_tokens": 900, "output_tokens": 120 }
    })
    .to_string()
}

fn analyst(server: &Server) -> ClaudeAnalyst {
    let client = ClaudeClient::new(ClaudeClientConfig {
        api_key: "test-api-key".to_string(),
        base_url: server.url(),
        min_interval_ms: 0,
        timeout_secs: 5,
    })
    .expect("Failed to create client");
    ClaudeAnalyst::new(client, MODEL, 2048)
}

async fn analyze(analyst: &ClaudeAnalyst) -> Result<balance_tuner::Recommendation, TuningError> {
    let config = BalanceConfig::defaults();
    let results = off_target_results();
    let targets = TargetSpec::default();
    analyst
        .analyze(AnalysisRequest {
            config: &config,
            results: &results,
            targets: &targets,
            goal: "Make the game harder",
            runs: 500,
        })
        .await
}

#[tokio::test]
async fn test_successful_reply_is_parsed() {
    let mut server = Server::new_async().await;
    let reply = r#"{"analysis":"Too easy","best_strategy":"b","off_target_metrics":["win_rate"],"changes":{"grunt_hp":65,"archer_range":null},"reasoning":"Tougher grunts","expected_impact":"Lower win rate","confidence":75,"converged":false}"#;
    let mock = server
        .mock("POST", "/v1/messages")
        .match_header("x-api-key", "test-api-key")
        .match_header("anthropic-version", "2023-06-01")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(serde_json::json!({ "model": MODEL, "max_tokens": 2048 })),
            Matcher::Regex("Make the game harder".to_string()),
            Matcher::Regex(r"\(500 runs per strategy\)".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(response_body(reply))
        .create_async()
        .await;

    let rec = analyze(&analyst(&server)).await.unwrap();

    mock.assert_async().await;
    assert!(!rec.is_sentinel());
    assert_eq!(rec.best_strategy.as_deref(), Some("b"));
    assert_eq!(rec.changes["grunt_hp"], Some(Number::from(65)));
    assert_eq!(rec.changes["archer_range"], None);
    assert!((rec.confidence - 75.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_fenced_reply_is_parsed() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/messages")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(response_body(
            "Here is my analysis:\n```json\n{\"changes\": {\"starting_gold\": 90}, \"converged\": true}\n```",
        ))
        .create_async()
        .await;

    let rec = analyze(&analyst(&server)).await.unwrap();

    assert!(rec.converged);
    assert_eq!(rec.changes["starting_gold"], Some(Number::from(90)));
}

#[tokio::test]
async fn test_malformed_reply_becomes_sentinel() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/messages")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(response_body("I would lower the gold a bit."))
        .create_async()
        .await;

    let rec = analyze(&analyst(&server)).await.unwrap();

    assert!(rec.is_sentinel());
    assert!(rec.changes.is_empty());
    assert!(!rec.converged);
    assert_eq!(rec.raw_response.as_deref(), Some("I would lower the gold a bit."));
}

#[tokio::test]
async fn test_server_error_is_analysis_error() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .with_status(500)
        .with_body(r#"{"type":"error","error":{"type":"api_error","message":"boom"}}"#)
        .expect(1)
        .create_async()
        .await;

    let err = analyze(&analyst(&server)).await.unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, TuningError::Analysis(msg) if msg.contains("Server error")));
}

#[tokio::test]
async fn test_unauthorized_is_analysis_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/messages")
        .with_status(401)
        .with_body(r#"{"type":"error","error":{"type":"authentication_error"}}"#)
        .create_async()
        .await;

    let err = analyze(&analyst(&server)).await.unwrap_err();
    assert!(matches!(err, TuningError::Analysis(msg) if msg.contains("Invalid API key")));
}

#[tokio::test]
async fn test_reply_without_text_is_analysis_error() {
    let mut server = Server::new_async().await;
    let body = serde_json::json!({
        "id": "msg_empty",
        "type": "message",
        "role": "assistant",
        "content": [],
        "model": MODEL,
        "stop_reason": "end_turn",
        "usage": { "input_tokens": 900, "output_tokens": 0 }
    });
    let _mock = server
        .mock("POST", "/v1/messages")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let err = analyze(&analyst(&server)).await.unwrap_err();
    assert!(matches!(err, TuningError::Analysis(msg) if msg.contains("no text")));
}
