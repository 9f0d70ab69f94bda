use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::{HeaderValue, Request, StatusCode},
    middleware::{Next, from_fn},
    response::Json,
    routing::{get, post},
};
use fraud_engine::{ClaimContext, FraudAnalysisResult, FraudAssessor, FraudError};
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{Instrument, info, warn};
use uuid::Uuid;

use crate::backends::{LlmClient, LlmNarrativeBackend, LlmTextBackend, VisionDocumentBackend};
use crate::config::ServiceConfig;

pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;
type ApiError = (StatusCode, Json<Value>);

fn bad_request_error(message: &str, details: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": message,
            "details": details
        })),
    )
}

#[derive(Clone)]
pub struct AppState {
    pub assessor: FraudAssessor,
}

/// Wire the OpenRouter backed analyzers into an assessor and build the router
pub fn create_app(config: &ServiceConfig) -> Router {
    let llm = LlmClient::new(&config.openrouter_api_key, config.text_model.clone());

    let assessor = FraudAssessor::builder(
        Arc::new(VisionDocumentBackend::new(
            config.openrouter_api_key.clone(),
            config.vision_model.clone(),
        )),
        Arc::new(LlmTextBackend::new(llm.clone())),
    )
    .narrative_backend(Arc::new(LlmNarrativeBackend::new(llm)))
    .config(config.assessor_config())
    .build();

    info!(
        text_model = %config.text_model,
        vision_model = %config.vision_model,
        analyzer_timeout_secs = config.analyzer_timeout.as_secs(),
        narrative_enabled = config.narrative_enabled,
        "Fraud assessor initialized"
    );

    build_router(AppState { assessor })
}

pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/fraud/assess", post(assess_claim))
        .layer(from_fn(correlation_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Middleware to add a correlation ID to every request and response
async fn correlation_id_middleware(
    mut request: Request<axum::body::Body>,
    next: Next,
) -> axum::response::Response {
    let correlation_id = Uuid::new_v4().to_string();
    let header = HeaderValue::from_str(&correlation_id).ok();

    if let Some(value) = &header {
        request
            .headers_mut()
            .insert(CORRELATION_ID_HEADER, value.clone());
    }

    let span = tracing::info_span!("http_request", correlation_id = %correlation_id);
    let mut response = next.run(request).instrument(span).await;

    if let Some(value) = header {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }
    response
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn assess_claim(
    State(state): State<AppState>,
    Json(claim): Json<ClaimContext>,
) -> ApiResult<FraudAnalysisResult> {
    info!(
        claim_id = %claim.claim_id,
        documents = claim.documents.len(),
        "Processing fraud assessment request"
    );

    match state.assessor.assess(&claim).await {
        Ok(result) => Ok(Json(result)),
        Err(FraudError::InvalidInput(details)) => {
            warn!(claim_id = %claim.claim_id, details = %details, "Rejected invalid claim");
            Err(bad_request_error("invalid claim", &details))
        }
    }
}
