//! HTTP handlers: the form page, submission pipeline, liveness check and
//! key-gated debug endpoints.
//!
//! This layer only translates between HTTP and the domain. Validation,
//! row building and delivery all live under `domain`; the handlers decide
//! status codes, flash messages and redirects.

use std::collections::BTreeMap;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect};
use axum::Json;
use axum_extra::extract::cookie::SignedCookieJar;
use axum_extra::extract::Form;
use chrono::Local;
use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::{row_builder, validation, ExportBatch, Submission};
use crate::io::flash::{self, Flash};
use crate::transport::{webhook::WebhookTransport, Transport};
use crate::AppState;

const FORM_PAGE: &str = include_str!("form.html");

/// The submission form as it arrives on the wire. Repeated line-item
/// fields use the `Name[]` convention; `axum_extra::extract::Form`
/// collects every occurrence into the vectors.
#[derive(Debug, Deserialize)]
pub struct SubmissionForm {
    #[serde(default)]
    pub form_type: String,
    #[serde(rename = "CreatedBy", default)]
    pub created_by: String,
    #[serde(rename = "DocumentNumber", default)]
    pub document_number: String,
    #[serde(rename = "Source", default)]
    pub source: String,
    #[serde(rename = "Destination", default)]
    pub destination: String,
    #[serde(rename = "ParentCode[]", default)]
    pub parent_codes: Vec<String>,
    #[serde(rename = "ParentName[]", default)]
    pub parent_names: Vec<String>,
    #[serde(rename = "Quantity[]", default)]
    pub quantities: Vec<String>,
}

impl SubmissionForm {
    fn into_submission(self) -> Submission {
        Submission {
            form_type: self.form_type,
            created_by: self.created_by,
            document_number: self.document_number,
            source: self.source,
            destination: self.destination,
            parent_codes: self.parent_codes,
            parent_names: self.parent_names,
            quantities: self.quantities,
        }
    }
}

/// GET / - render the form with any pending flash messages.
pub async fn show_form(jar: SignedCookieJar) -> impl IntoResponse {
    let (jar, flashes) = flash::take(jar);
    (jar, Html(render_page(&flashes)))
}

/// POST / - run the full pipeline and redirect back to the form.
pub async fn submit(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<SubmissionForm>,
) -> impl IntoResponse {
    info!("POST / - {} line item(s)", form.parent_codes.len());
    let submission = form.into_submission();

    let outcome = validation::validate(&submission);
    if !outcome.is_valid() {
        warn!("submission rejected: {} violation(s)", outcome.errors.len());
        let jar = flash::set(jar, &[Flash::error(outcome.errors.join(" "))]);
        return (jar, Redirect::to("/"));
    }

    let batch = row_builder::build_batch(&submission, Local::now().naive_local());

    let mut flashes = Vec::new();
    match state.export_service.export(&batch).await {
        Ok(outcome) => {
            for failure in &outcome.failures {
                flashes.push(Flash::error(format!(
                    "{} upload failed: {}",
                    failure.target, failure.message
                )));
            }
            let banner = if outcome.delivered.is_empty() {
                format!(
                    "File {} has been exported successfully and saved locally.",
                    outcome.filename
                )
            } else {
                format!(
                    "File {} has been exported successfully and sent to {}.",
                    outcome.filename,
                    outcome.delivered.join(", ")
                )
            };
            flashes.push(Flash::success(banner));
        }
        Err(e) => {
            flashes.push(Flash::error(format!("Export failed: {e}")));
        }
    }

    (flash::set(jar, &flashes), Redirect::to("/"))
}

/// GET /health - fixed liveness payload.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}

#[derive(Debug, Deserialize)]
pub struct DebugQuery {
    #[serde(default)]
    pub key: String,
}

/// GET /debug/config - boolean presence of each configuration variable,
/// never the values themselves. Gated by the shared debug key; absent key
/// configuration hides the endpoint entirely.
pub async fn debug_config(
    State(state): State<AppState>,
    Query(query): Query<DebugQuery>,
) -> impl IntoResponse {
    if let Err(status) = check_debug_key(&state, &query.key) {
        return status.into_response();
    }

    let report: BTreeMap<&str, bool> = state.config.presence_report().into_iter().collect();
    Json(report).into_response()
}

/// POST /debug/webhook-test - push a tiny synthetic export through the
/// webhook adapter so the remote wiring can be checked without filling in
/// the form. Uses the configured webhook regardless of its enable switch.
pub async fn debug_webhook_test(
    State(state): State<AppState>,
    Query(query): Query<DebugQuery>,
) -> impl IntoResponse {
    if let Err(status) = check_debug_key(&state, &query.key) {
        return status.into_response();
    }

    let batch = synthetic_batch();
    let filename = batch.filename();
    let bytes = match crate::domain::csv_encoder::encode(&batch) {
        Ok(bytes) => bytes,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "ok": false, "message": e.to_string() })),
            )
                .into_response();
        }
    };

    let transport =
        WebhookTransport::new(state.config.webhook.clone(), state.http.clone());
    match transport.upload(&filename, &bytes).await {
        Ok(()) => Json(serde_json::json!({
            "ok": true,
            "message": format!("sent {filename} to webhook"),
        }))
        .into_response(),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({ "ok": false, "message": e.to_string() })),
        )
            .into_response(),
    }
}

fn check_debug_key(state: &AppState, presented: &str) -> Result<(), StatusCode> {
    if state.config.debug_key.is_empty() {
        return Err(StatusCode::NOT_FOUND);
    }
    if presented != state.config.debug_key {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(())
}

fn synthetic_batch() -> ExportBatch {
    let submission = Submission {
        form_type: "Store Return".to_string(),
        created_by: "debug".to_string(),
        document_number: "DEBUG".to_string(),
        source: "DEBUG".to_string(),
        destination: "DEBUG".to_string(),
        parent_codes: vec!["TEST".to_string()],
        parent_names: vec!["Webhook test".to_string()],
        quantities: vec!["1".to_string()],
    };
    row_builder::build_batch(&submission, Local::now().naive_local())
}

fn render_page(flashes: &[Flash]) -> String {
    let rendered: String = flashes
        .iter()
        .map(|f| {
            let class = match f.level {
                flash::FlashLevel::Success => "success",
                flash::FlashLevel::Error => "error",
            };
            format!(
                "<div class=\"flash {}\">{}</div>\n",
                class,
                escape_html(&f.message)
            )
        })
        .collect();

    FORM_PAGE.replace("{{flash}}", &rendered)
}

/// Flash messages can carry remote error bodies; never let them inject
/// markup into the page.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
