use crate::docs::docs_data;
use crate::generate::{create_service, GenerationService, ModelBackend, FAILURE_NOTICE};
use crate::prelude::{eprintln, *};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use spikecoder_core::generation::GenerationRequest;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tower_http::cors::{Any, CorsLayer};

#[derive(Debug, clap::Args)]
pub struct ServeOptions {
    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,
}

/// Shared state: the one service instance and a single in-flight permit.
pub struct AppState<B> {
    service: GenerationService<B>,
    in_flight: Semaphore,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateBody {
    instruction: String,
    #[serde(default)]
    prior_code: String,
}

#[derive(Debug, Deserialize)]
struct DocsQuery {
    section: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

pub async fn run(options: ServeOptions, global: crate::Global) -> Result<()> {
    let service = create_service(&global)?;
    let addr = format!("{}:{}", options.host, options.port);

    if global.verbose {
        eprintln!("Generate endpoint: http://{}/api/generate", addr);
        eprintln!("Docs endpoint: http://{}/api/docs", addr);
    }

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind to {}: {}", addr, e))?;

    log::info!("Listening on http://{} (model {})", addr, service.model());

    axum::serve(listener, router(service))
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    Ok(())
}

pub fn router<B>(service: GenerationService<B>) -> Router
where
    B: ModelBackend + Send + Sync + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let state = Arc::new(AppState {
        service,
        in_flight: Semaphore::new(1),
    });

    Router::new()
        .route("/api/generate", post(generate_handler::<B>))
        .route("/api/docs", get(docs_handler::<B>))
        .layer(cors)
        .with_state(state)
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}

async fn generate_handler<B>(
    State(state): State<Arc<AppState<B>>>,
    Json(body): Json<GenerateBody>,
) -> Response
where
    B: ModelBackend + Send + Sync + 'static,
{
    let request = match GenerationRequest::new(body.instruction, body.prior_code) {
        Ok(request) => request,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e),
    };

    let Ok(_permit) = state.in_flight.try_acquire() else {
        return error_response(
            StatusCode::CONFLICT,
            "A generation request is already in progress",
        );
    };

    match state.service.generate(request).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(_) => error_response(StatusCode::BAD_GATEWAY, FAILURE_NOTICE),
    }
}

async fn docs_handler<B>(
    State(state): State<Arc<AppState<B>>>,
    Query(query): Query<DocsQuery>,
) -> Response
where
    B: ModelBackend + Send + Sync + 'static,
{
    match docs_data(state.service.corpus(), query.section.as_deref()) {
        Ok(output) => Json(output).into_response(),
        Err(e) => error_response(StatusCode::NOT_FOUND, e.to_string()),
    }
}
