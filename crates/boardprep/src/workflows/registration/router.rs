use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use super::catalog::RegistrationCatalog;
use super::domain::{AnswerSet, WizardStep};
use super::payload::{SubmissionPayload, TIMESTAMP_LABEL};
use super::pricing::quote_from_codes;
use super::schema;
use super::sink::{SinkError, SubmissionSink};

/// Attachments travel base64-encoded inside the JSON body.
const MAX_BODY_BYTES: usize = 12 * 1024 * 1024;

/// Router exposing the wizard's pure checks and the submission relay.
pub fn registration_router<S>(sink: Arc<S>) -> Router
where
    S: SubmissionSink + ?Sized + 'static,
{
    Router::new()
        .route("/api/v1/registration/catalog", get(catalog_handler))
        .route("/api/v1/registration/quote", get(quote_handler))
        .route(
            "/api/v1/registration/steps/:step/validate",
            post(validate_step_handler),
        )
        .route(
            "/api/v1/registration/submissions",
            post(submit_handler::<S>),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(sink)
}

pub(crate) async fn catalog_handler() -> Json<RegistrationCatalog> {
    Json(RegistrationCatalog::standard())
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct QuoteQuery {
    pub(crate) exam_type: Option<String>,
    pub(crate) has_pre_registered: Option<String>,
    pub(crate) is_latin_honor: Option<String>,
}

pub(crate) async fn quote_handler(Query(query): Query<QuoteQuery>) -> Response {
    match quote_from_codes(
        query.exam_type.as_deref(),
        query.has_pre_registered.as_deref(),
        query.is_latin_honor.as_deref(),
    ) {
        Ok(quote) => {
            let payload = json!({
                "exam_type": quote.exam_type,
                "regular_price": quote.regular_price,
                "reservation_credit": quote.reservation_credit,
                "amount": quote.amount,
                "label": quote.label.text(),
                "display": quote.display(),
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
    }
}

/// Body rejections keep the same `{ "error": ... }` shape as every other failure.
fn rejection_response(rejection: JsonRejection) -> Response {
    warn!(error = %rejection.body_text(), "registration body rejected");
    let payload = json!({ "error": rejection.body_text() });
    (rejection.status(), Json(payload)).into_response()
}

pub(crate) async fn validate_step_handler(
    Path(step): Path<String>,
    body: Result<Json<AnswerSet>, JsonRejection>,
) -> Response {
    let Some(step) = WizardStep::from_code(&step) else {
        let payload = json!({ "error": format!("unknown wizard step '{step}'") });
        return (StatusCode::NOT_FOUND, Json(payload)).into_response();
    };
    let Json(answers) = match body {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection),
    };

    let errors = schema::validate_step(&answers, step);
    let status = if errors.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    let next_step = errors.is_empty().then(|| step.next().code());

    let payload = json!({
        "step": step.code(),
        "valid": errors.is_empty(),
        "errors": errors,
        "next_step": next_step,
        "visible_fields": schema::visible_fields(&answers, step),
    });
    (status, Json(payload)).into_response()
}

pub(crate) async fn submit_handler<S>(
    State(sink): State<Arc<S>>,
    body: Result<Json<AnswerSet>, JsonRejection>,
) -> Response
where
    S: SubmissionSink + ?Sized + 'static,
{
    let Json(answers) = match body {
        Ok(body) => body,
        Err(rejection) => return rejection_response(rejection),
    };
    let errors = schema::validate_all(&answers);
    if !errors.is_empty() {
        let payload = json!({
            "error": "registration is incomplete",
            "errors": errors,
        });
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
    }

    let submission = SubmissionPayload::package(&answers, Local::now());
    let timestamp = submission
        .get(TIMESTAMP_LABEL)
        .and_then(|value| value.as_text())
        .map(str::to_string);

    match sink.deliver(&submission).await {
        Ok(()) => {
            info!(
                attachments = submission.attachment_count(),
                "registration relayed to sink"
            );
            let payload = json!({
                "status": "submitted",
                "timestamp": timestamp,
            });
            (StatusCode::ACCEPTED, Json(payload)).into_response()
        }
        Err(SinkError::NotConfigured) => {
            let payload = json!({ "error": SinkError::NotConfigured.to_string() });
            (StatusCode::SERVICE_UNAVAILABLE, Json(payload)).into_response()
        }
        Err(error) => {
            warn!(%error, "registration relay failed");
            let payload = json!({ "error": error.to_string() });
            (StatusCode::BAD_GATEWAY, Json(payload)).into_response()
        }
    }
}
