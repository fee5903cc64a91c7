use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::{Json, Router};
use schemars::schema_for;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use triage_engine::{DiagnosisEngine, DiagnosisRequest, DiagnosisResult, Question, SystemInfo};

use crate::config::ServerConfig;
use crate::error::ApiError;

/// Every route is served under this prefix.
pub const BASE_PATH: &str = "/api/expert-system";

pub const HEALTH_MESSAGE: &str = "✅ Expert System is running with In-Memory Knowledge Base!";

pub fn router(engine: DiagnosisEngine, config: &ServerConfig) -> Router {
    let api = Router::new()
        .route("/diagnose", post(diagnose))
        .route("/questions", get(questions))
        .route("/health", get(health))
        .route("/info", get(system_info))
        .route("/schema", get(schema));

    let cors = CorsLayer::new()
        .allow_origin(config.allowed_origin.clone())
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    Router::new()
        .nest(BASE_PATH, api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(engine)
}

async fn diagnose(
    State(engine): State<DiagnosisEngine>,
    payload: Result<Json<DiagnosisRequest>, JsonRejection>,
) -> Result<Json<DiagnosisResult>, ApiError> {
    let Json(request) = payload?;
    info!(answers = request.answers().len(), "received diagnosis request");
    Ok(Json(engine.diagnose(&request)))
}

async fn questions(State(engine): State<DiagnosisEngine>) -> Json<Vec<Question>> {
    let questions = engine.questions();
    info!(count = questions.len(), "sending questions");
    Json(questions)
}

async fn health() -> &'static str {
    HEALTH_MESSAGE
}

async fn system_info(State(engine): State<DiagnosisEngine>) -> Json<SystemInfo> {
    Json(engine.system_info())
}

/// JSON Schemas of the wire types, for front-end validation.
async fn schema() -> Json<Value> {
    Json(json!({
        "request": schema_for!(DiagnosisRequest),
        "result": schema_for!(DiagnosisResult),
        "question": schema_for!(Vec<Question>),
        "info": schema_for!(SystemInfo),
    }))
}
