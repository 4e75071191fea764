//! API routes for the rover gateway
//!
//! The chat page asks questions through `/ask`; the rover firmware polls
//! `/esp32-receive/` for actuator commands and `/esp32-movement/` for the
//! traversal instructions of the field posted to `/esp32-receive-movement`.

use crate::server::AppState;
use answer_flow::{AskResponse, FlowError, Language, AUDIO_ROUTE};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use field_planner::{FieldPlanRequest, PlanError};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

type AppStateArc = Arc<AppState>;
type JsonError = (StatusCode, Json<Value>);

// ============================================================================
// Question Routes
// ============================================================================

pub fn ask_routes() -> Router<AppStateArc> {
    Router::new().route("/ask", get(ask))
}

#[derive(Debug, Deserialize)]
struct AskQuery {
    q: Option<String>,
    lang: Option<String>,
}

async fn ask(
    State(state): State<AppStateArc>,
    headers: HeaderMap,
    Query(query): Query<AskQuery>,
) -> Result<Json<AskResponse>, JsonError> {
    let lang = match query.lang.as_deref() {
        None => state.default_lang,
        lang => Language::from_query(lang),
    };
    let question = query.q.unwrap_or_default();
    info!("Question ({}): {}", lang, question);

    let base_url = base_url(&state, &headers);
    match state.flow.ask(&question, lang, &base_url).await {
        Ok(resp) => {
            state.metrics.gw.questions.with_label_values(&["answered"]).inc();
            Ok(Json(resp))
        }
        Err(FlowError::MissingQuestion) => {
            state.metrics.gw.questions.with_label_values(&["rejected"]).inc();
            Err((
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": FlowError::MissingQuestion.to_string() })),
            ))
        }
        Err(e) => {
            error!("Error in /ask: {}", e);
            state.metrics.gw.questions.with_label_values(&["failed"]).inc();
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            ))
        }
    }
}

/// Origin for audio links: the configured public URL, else the request host
fn base_url(state: &AppState, headers: &HeaderMap) -> String {
    if let Some(url) = &state.public_url {
        return url.clone();
    }
    headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(|host| format!("http://{host}"))
        .unwrap_or_default()
}

// ============================================================================
// Actuator Routes
// ============================================================================

pub fn actuator_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/esp32-receive/", get(receive_command))
        .route("/esp32-receive", get(receive_command))
}

async fn receive_command(State(state): State<AppStateArc>) -> &'static str {
    let pair = state.flow.answers().current();
    let command = state.classifier.classify(&pair);
    state.metrics.gw.command_polls.inc();
    debug!("Command poll -> {}", command);
    command.wire_name()
}

// ============================================================================
// Field Plan Routes
// ============================================================================

pub fn plan_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/esp32-receive-movement", post(receive_movement))
        .route("/esp32-movement/", get(movement))
        .route("/esp32-movement", get(movement))
}

async fn receive_movement(
    State(state): State<AppStateArc>,
    body: Bytes,
) -> Result<Json<Value>, JsonError> {
    let rejected = |e: PlanError| {
        state
            .metrics
            .gw
            .plan_submissions
            .with_label_values(&["rejected"])
            .inc();
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": e.to_string(), "field": e.field() })),
        )
    };

    let data: Value = serde_json::from_slice(&body).map_err(|e| {
        warn!("Field plan body is not JSON: {}", e);
        rejected(PlanError::Validation {
            field: "body",
            reason: format!("invalid JSON: {e}"),
        })
    })?;
    let request = FieldPlanRequest::from_json(&data).map_err(&rejected)?;
    let plan = state.plans.submit_request(request).map_err(&rejected)?;

    state
        .metrics
        .gw
        .plan_submissions
        .with_label_values(&["accepted"])
        .inc();
    state.metrics.gw.plan_stored.set(1);
    info!("Calculated total land area: {} sq ft", plan.area());

    Ok(Json(json!({
        "message": "Data received successfully!",
        "received_data": data,
        "calculated_area": plan.area(),
        "movement_plan": {
            "rows": data["num_rows"],
            "distance_between_rows": data["distance"],
            "orientation": data["orientation"],
            "field_dimensions": {
                "height": data["height"],
                "width": data["width"],
            },
        },
    })))
}

async fn movement(State(state): State<AppStateArc>) -> Result<String, (StatusCode, String)> {
    state.metrics.gw.instruction_polls.inc();
    match state.plans.instruction() {
        Ok(instruction) => {
            debug!("Instruction poll -> {}", instruction);
            Ok(instruction.to_string())
        }
        Err(e) => {
            warn!("Instruction poll without a plan");
            Err((StatusCode::CONFLICT, e.to_string()))
        }
    }
}

// ============================================================================
// Audio Routes
// ============================================================================

pub fn audio_routes() -> Router<AppStateArc> {
    Router::new().route(&format!("{AUDIO_ROUTE}/:file"), get(serve_audio))
}

async fn serve_audio(
    State(state): State<AppStateArc>,
    Path(file): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    match state.flow.audio().read(&file).await {
        Ok(audio) => Ok(([(header::CONTENT_TYPE, "audio/mpeg")], audio)),
        Err(e @ FlowError::InvalidAudioName(_)) => {
            warn!("Rejected audio request: {}", e);
            Err((StatusCode::BAD_REQUEST, e.to_string()))
        }
        Err(e) => {
            debug!("Audio not served: {}", e);
            Err((StatusCode::NOT_FOUND, format!("audio file '{file}' not found")))
        }
    }
}

// ============================================================================
// Health Routes
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route("/metrics", get(metrics))
}

async fn metrics(State(state): State<AppStateArc>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.encode_text(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricsHub;
    use crate::server::router;
    use answer_flow::{
        AnswerFlow, Backends, FlowConfig, MockGenerator, MockSpeech, MockTranslator,
        SystemInstructions,
    };
    use axum::body::Body;
    use axum::http::Request;
    use command_classifier::{AnswerStore, CommandClassifier};
    use field_planner::PlanStore;
    use tower::ServiceExt;

    struct TestApp {
        app: Router,
        _dir: tempfile::TempDir,
    }

    fn test_app() -> TestApp {
        let dir = tempfile::tempdir().unwrap();
        let config = FlowConfig {
            audio_dir: dir.path().to_path_buf(),
            tts_backoff_ms: 1,
            tts_pause_ms: 0,
            ..FlowConfig::default()
        };
        let backends = Backends {
            generator: Arc::new(MockGenerator::default()),
            translator: Arc::new(MockTranslator::default()),
            speech: Arc::new(MockSpeech::default()),
        };
        let flow = AnswerFlow::new(
            backends,
            Arc::new(AnswerStore::new()),
            SystemInstructions::default(),
            config,
        );
        let state = AppState {
            classifier: CommandClassifier::default(),
            plans: PlanStore::new(),
            flow,
            metrics: MetricsHub::new().unwrap(),
            default_lang: Language::Bn,
            public_url: None,
        };
        TestApp {
            app: router(Arc::new(state)),
            _dir: dir,
        }
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, headers, body.to_vec())
    }

    async fn get_text(app: &Router, uri: &str) -> (StatusCode, String) {
        let req = Request::get(uri)
            .header(header::HOST, "rover.local:10000")
            .body(Body::empty())
            .unwrap();
        let (status, _, body) = send(app, req).await;
        (status, String::from_utf8(body).unwrap())
    }

    async fn post_json(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
        let req = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, _, body) = send(app, req).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_command_poll_starts_at_sentinel() {
        let t = test_app();
        let (status, body) = get_text(&t.app, "/esp32-receive/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "none_for_now");
    }

    #[tokio::test]
    async fn test_ask_then_poll_command() {
        let t = test_app();
        let (status, body) =
            get_text(&t.app, "/ask?q=The%20light%20has%20been%20turned%20on&lang=en").await;
        assert_eq!(status, StatusCode::OK);
        let resp: AskResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(resp.answer_en, "The light has been turned on");
        assert_eq!(resp.answer_bn, "লাইটটি চালু হয়েছে");
        assert_eq!(resp.audio_urls_en.len(), 1);
        assert!(resp.audio_urls_bn[0].starts_with("http://rover.local:10000/static/audio/"));

        let (_, command) = get_text(&t.app, "/esp32-receive/").await;
        assert_eq!(command, "light_on");
        // polling does not consume the answer
        let (_, command) = get_text(&t.app, "/esp32-receive").await;
        assert_eq!(command, "light_on");

        let path = resp.audio_urls_en[0].trim_start_matches("http://rover.local:10000");
        let req = Request::get(path).body(Body::empty()).unwrap();
        let (status, headers, audio) = send(&t.app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "audio/mpeg");
        assert!(audio.starts_with(b"ID3en"));
    }

    #[tokio::test]
    async fn test_ask_without_question() {
        let t = test_app();
        for uri in ["/ask", "/ask?q=", "/ask?q=%20%20&lang=en"] {
            let (status, body) = get_text(&t.app, uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            let body: Value = serde_json::from_str(&body).unwrap();
            assert_eq!(body, json!({"error": "Missing question"}));
        }
    }

    #[tokio::test]
    async fn test_movement_requires_plan() {
        let t = test_app();
        let (status, _) = get_text(&t.app, "/esp32-movement/").await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_submit_plan_then_poll_instructions() {
        let t = test_app();
        let (status, body) = post_json(
            &t.app,
            "/esp32-receive-movement",
            r#"{"height": 100, "width": 50, "num_rows": 4, "orientation": "vertical", "distance": 3}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Data received successfully!");
        assert_eq!(body["calculated_area"], json!(5000));
        assert_eq!(body["received_data"]["num_rows"], json!(4));
        assert_eq!(
            body["movement_plan"],
            json!({
                "rows": 4,
                "distance_between_rows": 3,
                "orientation": "vertical",
                "field_dimensions": {"height": 100, "width": 50}
            })
        );

        let (status, text) = get_text(&t.app, "/esp32-movement/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(text, "100-3_FRfRFLfLFRfRF");

        // a horizontal field replaces it and leads with the width
        post_json(
            &t.app,
            "/esp32-receive-movement",
            r#"{"height": 100, "width": 50, "num_rows": 3, "orientation": "horizontal", "distance": 2}"#,
        )
        .await;
        let (_, text) = get_text(&t.app, "/esp32-movement").await;
        assert_eq!(text, "50-2_RFLfLFRfRF");
    }

    #[tokio::test]
    async fn test_rejected_plan_keeps_previous() {
        let t = test_app();
        post_json(
            &t.app,
            "/esp32-receive-movement",
            r#"{"height": 10, "width": 10, "num_rows": 2, "orientation": "vertical", "distance": 1}"#,
        )
        .await;

        let (status, body) = post_json(
            &t.app,
            "/esp32-receive-movement",
            r#"{"height": -5, "width": 10, "num_rows": 2, "orientation": "vertical", "distance": 1}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "height");

        let (status, body) = post_json(&t.app, "/esp32-receive-movement", "not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["field"], "body");

        let (_, text) = get_text(&t.app, "/esp32-movement/").await;
        assert_eq!(text, "10-1_FRfRF");
    }

    #[tokio::test]
    async fn test_audio_name_checks() {
        let t = test_app();
        let (status, _) = get_text(&t.app, "/static/audio/..%2Fsecret.mp3").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = get_text(&t.app, "/static/audio/missing.mp3").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_and_metrics() {
        let t = test_app();
        let (status, body) = get_text(&t.app, "/healthz").await;
        assert_eq!((status, body.as_str()), (StatusCode::OK, "ok"));

        get_text(&t.app, "/esp32-receive/").await;
        let (status, body) = get_text(&t.app, "/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("rover_command_polls_total 1"));
    }
}
