//! HTTP server for the rover gateway

use crate::metrics::MetricsHub;
use crate::routes;
use answer_flow::{AnswerFlow, Language};
use anyhow::Result;
use axum::Router;
use command_classifier::CommandClassifier;
use field_planner::PlanStore;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
pub struct AppState {
    pub classifier: CommandClassifier,
    pub plans: PlanStore,
    /// Owns the answer store read by the actuator poll
    pub flow: AnswerFlow,
    pub metrics: MetricsHub,
    pub default_lang: Language,
    pub public_url: Option<String>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::ask_routes())
        .merge(routes::actuator_routes())
        .merge(routes::plan_routes())
        .merge(routes::audio_routes())
        .merge(routes::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until the process is stopped
pub async fn run(state: AppState, bind: &str) -> Result<()> {
    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
