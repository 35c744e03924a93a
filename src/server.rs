//! ==============================================================================
//! server.rs - http relay endpoints
//! ==============================================================================
//!
//! purpose:
//!     the web side of the relay. a sensor device pushes its latest reading,
//!     a frontend pulls it back out. anything else is looked up in the static
//!     asset directory.
//!
//! routes:
//!     POST /update-sensor-data   overwrite the slot, reply with an ack
//!     GET  /get-sensor-data      current slot value, `{}` before first push
//!     *    (fallback)            file from the static dir, or 404
//!
//! every response goes through a permissive cors layer so a frontend hosted
//! anywhere can call both endpoints.
//!
//! relationships:
//!     - used by: main.rs (run)
//!     - uses: domain.rs (ReadingSlot), config.rs (RelayConfig)
//!
//! ==============================================================================

use crate::config::RelayConfig;
use crate::domain::ReadingSlot;

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

/// ack text returned for every accepted reading
pub const ACK_MESSAGE: &str = "Data received successfully!";

// ==============================================================================
// shared state
// ==============================================================================

/// what every handler gets through axum's State extractor
#[derive(Clone)]
pub struct RelayState {
    pub slot: ReadingSlot,
    /// log full payloads at info instead of debug
    pub show_sensor_data: bool,
}

#[derive(Serialize)]
pub struct Ack {
    message: &'static str,
}

// ==============================================================================
// router
// ==============================================================================

/// build the relay router over `state`, serving unmatched paths from `static_dir`
pub fn build_router(state: RelayState, static_dir: &Path) -> Router {
    if !static_dir.is_dir() {
        warn!(
            "Static directory {} not found, unmatched paths will return 404",
            static_dir.display()
        );
    }

    Router::new()
        .route("/update-sensor-data", post(update_sensor_data))
        .route("/get-sensor-data", get(get_sensor_data))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// bind the configured address and serve until ctrl-c
pub async fn run(config: &RelayConfig, slot: ReadingSlot) -> Result<()> {
    let state = RelayState {
        slot,
        show_sensor_data: config.logging.show_sensor_data,
    };
    let app = build_router(state, &config.server.static_dir);

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    let port = listener.local_addr()?.port();

    println!("Server running on port {}", port);
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Ctrl-C received, shutting down"),
        Err(e) => {
            warn!("Unable to listen for ctrl-c ({}), running until killed", e);
            std::future::pending::<()>().await;
        }
    }
}

// ==============================================================================
// handlers
// ==============================================================================

/// why a push was refused
#[derive(Debug)]
pub enum IngestError {
    /// top level must be an object or an array
    NotObjectOrArray,
    /// body claims to be json but does not parse
    Malformed(serde_json::Error),
}

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        let message = match self {
            IngestError::NotObjectOrArray => {
                "Expected a JSON object or array at the top level".to_string()
            }
            IngestError::Malformed(e) => format!("Malformed JSON body: {}", e),
        };
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": message})),
        )
            .into_response()
    }
}

/// Turn a raw push into the reading to store.
///
/// a body that is not sent as json, or an empty body, counts as `{}`.
/// json bodies must start with `{` or `[`.
pub fn parse_reading(content_type: Option<&str>, body: &[u8]) -> Result<Value, IngestError> {
    if !content_type.is_some_and(is_json_content_type) || body.is_empty() {
        return Ok(Value::Object(Default::default()));
    }

    let first = body.iter().find(|b| !b.is_ascii_whitespace());
    if !matches!(first, Some(b'{') | Some(b'[')) {
        return Err(IngestError::NotObjectOrArray);
    }

    serde_json::from_slice(body).map_err(IngestError::Malformed)
}

/// `application/json` or any `+json` media type, parameters ignored
fn is_json_content_type(value: &str) -> bool {
    let essence = value.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// POST /update-sensor-data
/// the slot is only touched once the body has been accepted
async fn update_sensor_data(
    State(state): State<RelayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Ack>, IngestError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    let reading = match parse_reading(content_type, &body) {
        Ok(reading) => reading,
        Err(e) => {
            debug!("Rejected sensor data: {:?}", e);
            return Err(e);
        }
    };

    if state.show_sensor_data {
        info!("Received Sensor Data: {}", reading);
    } else {
        debug!("Received Sensor Data: {}", reading);
    }

    state.slot.store(reading).await;

    Ok(Json(Ack {
        message: ACK_MESSAGE,
    }))
}

/// GET /get-sensor-data
async fn get_sensor_data(State(state): State<RelayState>) -> Json<Value> {
    Json(state.slot.latest().await)
}
