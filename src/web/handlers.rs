//! HTTP request handlers

use super::state::AppState;
use crate::assistant::{
    render_transcript, AskOptions, Exchange, MAX_LENGTH_RANGE, MAX_RESULTS_RANGE,
    TRANSCRIPT_FILE_NAME,
};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::{de, Deserialize, Deserializer, Serialize};
use tera::Context;
use tracing::{error, info};

const EMPTY_QUESTION: &str = "Please enter a question.";
const BUSY: &str = "A request is already being processed. Please wait for it to finish.";

/// Fields posted by the question form
#[derive(Debug, Default, Deserialize)]
pub struct AskForm {
    #[serde(default)]
    pub question: String,
    pub model: Option<String>,
    /// Present (as "on") only when the checkbox is ticked
    pub use_internet: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub max_results: Option<i64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub max_length: Option<i64>,
}

/// JSON body for the API endpoint
#[derive(Debug, Deserialize)]
pub struct AskPayload {
    pub question: String,
    pub model: Option<String>,
    pub use_internet: Option<bool>,
    pub max_results: Option<i64>,
    pub max_length: Option<i64>,
}

/// Number inputs post an empty string when cleared
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map(Some).map_err(de::Error::custom)
        }
        _ => Ok(None),
    }
}

/// Negative counts clamp up like any other out-of-range value
fn count(value: Option<i64>, default: usize) -> usize {
    value.map_or(default, |v| usize::try_from(v.max(0)).unwrap_or(usize::MAX))
}

/// Fields posted by the "Save Output" form
#[derive(Debug, Default, Deserialize)]
pub struct DownloadForm {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub reply: String,
}

#[derive(Debug, Serialize)]
struct ApiError {
    error: String,
}

/// Everything the page template needs
#[derive(Debug, Serialize)]
struct PageView<'a> {
    instance_name: &'a str,
    models: &'a [String],
    selected_model: String,
    use_internet: bool,
    max_results: usize,
    max_length: usize,
    min_results: usize,
    max_results_limit: usize,
    min_length: usize,
    max_length_limit: usize,
    question: String,
    context: String,
    reply: String,
    notices: Vec<String>,
    warning: Option<String>,
    processing: bool,
    elapsed_ms: u64,
}

impl<'a> PageView<'a> {
    fn new(state: &'a AppState, model: String, options: AskOptions) -> Self {
        Self {
            instance_name: state.instance_name(),
            models: &state.settings.ollama.models,
            selected_model: model,
            use_internet: options.use_internet,
            max_results: options.max_results,
            max_length: options.max_length,
            min_results: *MAX_RESULTS_RANGE.start(),
            max_results_limit: *MAX_RESULTS_RANGE.end(),
            min_length: *MAX_LENGTH_RANGE.start(),
            max_length_limit: *MAX_LENGTH_RANGE.end(),
            question: String::new(),
            context: String::new(),
            reply: String::new(),
            notices: Vec::new(),
            warning: None,
            processing: state.processing.is_processing(),
            elapsed_ms: 0,
        }
    }

    fn with_warning(mut self, question: String, warning: impl Into<String>) -> Self {
        self.question = question;
        self.warning = Some(warning.into());
        self
    }

    fn with_exchange(mut self, exchange: Exchange) -> Self {
        self.question = exchange.question;
        self.context = exchange.context;
        self.reply = exchange.reply;
        self.notices = exchange.notices;
        self.elapsed_ms = exchange.elapsed_ms;
        self
    }

    fn render(&self, state: &AppState, status: StatusCode) -> Response {
        let ctx = match Context::from_serialize(self) {
            Ok(ctx) => ctx,
            Err(e) => {
                error!("Template context error: {}", e);
                return (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response();
            }
        };

        match state.templates.render_with_context("index.html", &ctx) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                error!("Template error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

/// Options from settings, used when a field is missing
fn default_options(state: &AppState) -> AskOptions {
    AskOptions {
        use_internet: state.settings.search.enabled_by_default,
        max_results: state.settings.search.default_max_results,
        max_length: state.settings.search.default_max_length,
    }
    .clamped()
}

fn pick_model(state: &AppState, requested: Option<String>) -> String {
    requested
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| state.settings.default_model().to_string())
}

/// Home page handler
pub async fn index(State(state): State<AppState>) -> Response {
    let model = state.settings.default_model().to_string();
    PageView::new(&state, model, default_options(&state)).render(&state, StatusCode::OK)
}

/// Question form handler
pub async fn ask(State(state): State<AppState>, Form(form): Form<AskForm>) -> Response {
    let defaults = default_options(&state);
    let options = AskOptions {
        use_internet: form.use_internet.is_some(),
        max_results: count(form.max_results, defaults.max_results),
        max_length: count(form.max_length, defaults.max_length),
    }
    .clamped();
    let model = pick_model(&state, form.model);
    let view = PageView::new(&state, model.clone(), options);

    if form.question.trim().is_empty() {
        return view
            .with_warning(form.question, EMPTY_QUESTION)
            .render(&state, StatusCode::OK);
    }

    if !state.settings.is_known_model(&model) {
        let warning = format!("Unknown model: {}", model);
        return view
            .with_warning(form.question, warning)
            .render(&state, StatusCode::BAD_REQUEST);
    }

    let Some(_guard) = state.processing.try_begin() else {
        return view
            .with_warning(form.question, BUSY)
            .render(&state, StatusCode::CONFLICT);
    };

    info!("Question for {} (internet: {})", model, options.use_internet);
    let exchange = state.assistant.answer(&form.question, &model, options).await;

    view.with_exchange(exchange).render(&state, StatusCode::OK)
}

/// JSON API handler
pub async fn api_ask(State(state): State<AppState>, Json(payload): Json<AskPayload>) -> Response {
    if payload.question.trim().is_empty() {
        return api_error(StatusCode::BAD_REQUEST, EMPTY_QUESTION);
    }

    let model = pick_model(&state, payload.model);
    if !state.settings.is_known_model(&model) {
        return api_error(StatusCode::BAD_REQUEST, format!("Unknown model: {}", model));
    }

    let defaults = default_options(&state);
    let options = AskOptions {
        use_internet: payload.use_internet.unwrap_or(defaults.use_internet),
        max_results: count(payload.max_results, defaults.max_results),
        max_length: count(payload.max_length, defaults.max_length),
    }
    .clamped();

    let Some(_guard) = state.processing.try_begin() else {
        return api_error(StatusCode::CONFLICT, BUSY);
    };

    let exchange = state.assistant.answer(&payload.question, &model, options).await;
    Json(exchange).into_response()
}

fn api_error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ApiError {
            error: message.into(),
        }),
    )
        .into_response()
}

/// "Save Output" handler
pub async fn download(Form(form): Form<DownloadForm>) -> impl IntoResponse {
    // Browsers submit textarea contents with CRLF line endings.
    let unix = |s: &str| s.replace("\r\n", "\n");
    let body = render_transcript(&unix(&form.question), &unix(&form.context), &unix(&form.reply));

    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", TRANSCRIPT_FILE_NAME),
            ),
        ],
        body,
    )
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "processing": state.processing.is_processing(),
    }))
}
