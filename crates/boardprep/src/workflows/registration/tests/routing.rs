use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, Request, StatusCode},
    Json,
};
use tower::ServiceExt;

use super::common::*;

use crate::workflows::registration::domain::{AnswerSet, YesNo};
use crate::workflows::registration::router::{
    catalog_handler, quote_handler, registration_router, submit_handler, validate_step_handler,
    QuoteQuery,
};
use crate::workflows::registration::sink::{SubmissionSink, UnconfiguredSink};

#[tokio::test]
async fn catalog_lists_steps_and_priced_programs() {
    let Json(catalog) = catalog_handler().await;

    assert_eq!(catalog.steps.len(), 5);
    assert_eq!(catalog.steps[0].id, "pre_check");
    assert_eq!(catalog.exam_types.len(), 4);
    assert_eq!(catalog.exam_types[0].value, "vet");
    assert_eq!(catalog.exam_types[0].pricing.regular, 9_999);
    assert_eq!(catalog.reservation_credit, 500);
}

#[tokio::test]
async fn quote_handler_returns_amount_and_label() {
    let query = QuoteQuery {
        exam_type: Some("vet".to_string()),
        has_pre_registered: Some("yes".to_string()),
        is_latin_honor: Some("yes".to_string()),
    };

    let response = quote_handler(Query(query)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json_body(response).await;
    assert_eq!(body["amount"], 4_749);
    assert_eq!(body["label"], "50% discount");
    assert_eq!(body["display"], "₱4,749 (50% discount)");
}

#[tokio::test]
async fn quote_handler_rejects_missing_exam_type() {
    let response = quote_handler(Query(QuoteQuery::default())).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("exam type"));
}

#[tokio::test]
async fn validate_step_reports_field_errors() {
    let mut answers = AnswerSet::default();
    answers.has_pre_registered = Some(YesNo::Yes);
    answers.is_latin_honor = Some(YesNo::No);

    let response = validate_step_handler(Path("pre_check".to_string()), Ok(Json(answers))).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = read_json_body(response).await;
    assert_eq!(body["valid"], false);
    assert_eq!(
        body["errors"]["preRegistrationProof"],
        "Proof is required if you pre-registered."
    );
    assert!(body["next_step"].is_null());
    assert_eq!(
        body["visible_fields"],
        serde_json::json!(["hasPreRegistered", "preRegistrationProof", "isLatinHonor"])
    );
}

#[tokio::test]
async fn validate_step_points_to_the_next_step_when_valid() {
    let response =
        validate_step_handler(Path("personal".to_string()), Ok(Json(complete_answers()))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json_body(response).await;
    assert_eq!(body["valid"], true);
    assert_eq!(body["next_step"], "academic");
}

#[tokio::test]
async fn validate_step_rejects_unknown_steps() {
    let response =
        validate_step_handler(Path("review".to_string()), Ok(Json(AnswerSet::default()))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn submit_handler_relays_complete_answers() {
    let sink = Arc::new(RecordingSink::default());

    let response = submit_handler(State(Arc::clone(&sink)), Ok(Json(complete_answers()))).await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let body = read_json_body(response).await;
    assert_eq!(body["status"], "submitted");
    assert!(body["timestamp"].is_string());
    assert_eq!(sink.deliveries().len(), 1);
}

#[tokio::test]
async fn submit_handler_refuses_incomplete_answers() {
    let sink = Arc::new(RecordingSink::default());
    let mut answers = complete_answers();
    answers.payment_proof = None;

    let response = submit_handler(State(Arc::clone(&sink)), Ok(Json(answers))).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = read_json_body(response).await;
    assert_eq!(body["errors"]["paymentProof"], "Proof of payment is required");
    assert!(sink.deliveries().is_empty());
}

#[tokio::test]
async fn submit_handler_maps_sink_failures() {
    let offline = Arc::new(OfflineSink::default());
    let response = submit_handler(State(Arc::clone(&offline)), Ok(Json(complete_answers()))).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(offline.attempts(), 1);

    let unconfigured = Arc::new(UnconfiguredSink);
    let response = submit_handler(State(unconfigured), Ok(Json(complete_answers()))).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn router_accepts_wire_encoded_attachments() {
    let sink = Arc::new(RecordingSink::default());
    let app = registration_router(Arc::clone(&sink) as Arc<dyn SubmissionSink>);

    let body = serde_json::to_vec(&complete_answers()).expect("answers serialize");
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/registration/submissions")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .expect("request");

    let response = app.oneshot(request).await.expect("router responds");
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let deliveries = sink.deliveries();
    assert_eq!(deliveries.len(), 1);
    assert_eq!(deliveries[0].attachment_count(), 1);
}

#[tokio::test]
async fn router_reports_unreadable_bodies_as_json_errors() {
    let sink = Arc::new(RecordingSink::default());
    let app = registration_router(Arc::clone(&sink) as Arc<dyn SubmissionSink>);

    let mut body = serde_json::to_value(complete_answers()).expect("answers serialize");
    body["paymentProof"]["mimeType"] = serde_json::Value::from("application/zip");
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/registration/submissions")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");

    let response = app.oneshot(request).await.expect("router responds");
    assert!(response.status().is_client_error());

    let body = read_json_body(response).await;
    assert!(body["error"].as_str().is_some_and(|text| !text.is_empty()));
    assert!(sink.deliveries().is_empty());
}

#[tokio::test]
async fn step_check_without_a_json_body_is_a_json_error() {
    let app = registration_router(Arc::new(UnconfiguredSink));

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/registration/steps/pre-check/validate")
        .body(Body::from("hasPreRegistered=yes"))
        .expect("request");

    let response = app.oneshot(request).await.expect("router responds");
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let body = read_json_body(response).await;
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn router_serves_quotes_from_query_strings() {
    let app = registration_router(Arc::new(UnconfiguredSink));

    let request = Request::builder()
        .uri("/api/v1/registration/quote?exam_type=abe&is_latin_honor=yes")
        .body(Body::empty())
        .expect("request");

    let response = app.oneshot(request).await.expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json_body(response).await;
    assert_eq!(body["amount"], 4_499);
    assert_eq!(body["exam_type"], "abe");
}
