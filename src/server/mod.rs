//! HTTP prediction server
//!
//! Small axum app mirroring the original web form: a form page at `/`,
//! `POST /predict` for one JSON record, `POST /predict_batch` for a CSV
//! body, and `GET /health`.
//!
//! Degraded mode is explicit: the app state holds `Option<PredictionService>`
//! and the server starts even when the artifact bundle is absent or fails
//! verification, answering every predict call with a structured
//! "model not loaded" failure instead of crashing.

mod page;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::bundle::ArtifactBundle;
use crate::dataset::RawTable;
use crate::models::PassengerRecord;
use crate::service::{BatchReport, PredictionService, BATCH_DISPLAY_LIMIT};

const MODEL_NOT_LOADED: &str = "Model not loaded. Run `aerosat train` first!";

/// Shared, immutable request state.
pub struct AppState {
    pub service: Option<PredictionService>,
}

/// Single-prediction request body; field names match the web form.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
    pub gender: String,
    pub customer_type: String,
    pub age: f64,
    pub travel_type: String,
    pub class: String,
    pub distance: f64,
    pub wifi: f64,
    pub time_conv: f64,
    pub booking: f64,
    pub gate: f64,
    pub food: f64,
    pub boarding: f64,
    pub seat: f64,
    pub entertainment: f64,
    pub onboard: f64,
    pub legroom: f64,
    pub baggage: f64,
    pub checkin: f64,
    pub service: f64,
    pub cleanliness: f64,
    pub dep_delay: f64,
    pub arr_delay: f64,
}

impl From<PredictRequest> for PassengerRecord {
    fn from(req: PredictRequest) -> Self {
        PassengerRecord {
            gender: req.gender,
            customer_type: req.customer_type,
            age: req.age,
            travel_type: req.travel_type,
            class: req.class,
            flight_distance: req.distance,
            ratings: [
                req.wifi,
                req.time_conv,
                req.booking,
                req.gate,
                req.food,
                req.boarding,
                req.seat,
                req.entertainment,
                req.onboard,
                req.legroom,
                req.baggage,
                req.checkin,
                req.service,
                req.cleanliness,
            ],
            departure_delay: req.dep_delay,
            arrival_delay: req.arr_delay,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub satisfied: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prediction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PredictResponse {
    fn ok(satisfied: bool, prediction: String) -> Self {
        Self {
            success: true,
            satisfied: Some(satisfied),
            prediction: Some(prediction),
            error: None,
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            satisfied: None,
            prediction: None,
            error: Some(message.into()),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict))
        .route("/predict_batch", post(predict_batch))
        .route("/health", get(health))
        .with_state(state)
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(page::render_form(state.service.as_ref()))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "model_loaded": state.service.is_some(),
    }))
}

async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Json<PredictResponse> {
    // A malformed or incomplete body answers in the same JSON shape as a
    // pipeline error instead of the extractor's plain-text 422.
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => return Json(PredictResponse::err(rejection.body_text())),
    };

    let Some(service) = state.service.as_ref() else {
        return Json(PredictResponse::err(MODEL_NOT_LOADED));
    };

    let record = PassengerRecord::from(request);
    match service.predict_one(&record) {
        Ok(prediction) => Json(PredictResponse::ok(prediction.satisfied, prediction.label)),
        Err(e) => Json(PredictResponse::err(e.to_string())),
    }
}

async fn predict_batch(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Json<serde_json::Value> {
    let Some(service) = state.service.as_ref() else {
        return Json(failure(MODEL_NOT_LOADED));
    };

    let table = match RawTable::read_from(body.as_bytes()) {
        Ok(table) => table,
        Err(e) => return Json(failure(&format!("failed to parse CSV: {e}"))),
    };

    match service.predict_batch(&table) {
        Ok(report) => Json(batch_json(&table, &report)),
        Err(e) => Json(failure(&e.to_string())),
    }
}

fn failure(message: &str) -> serde_json::Value {
    serde_json::json!({ "success": false, "error": message })
}

/// Batch response: summary counts plus the first rows annotated with the
/// original columns and the appended Prediction / Main Reason columns.
fn batch_json(table: &RawTable, report: &BatchReport) -> serde_json::Value {
    let results: Vec<serde_json::Value> = table
        .rows
        .iter()
        .zip(report.outcomes.iter())
        .take(BATCH_DISPLAY_LIMIT)
        .map(|(row, outcome)| {
            let mut entry = serde_json::Map::new();
            for (header, value) in table.headers.iter().zip(row.iter()) {
                entry.insert(header.clone(), serde_json::Value::String(value.clone()));
            }
            entry.insert(
                "Prediction".to_string(),
                serde_json::Value::String(outcome.result_text()),
            );
            entry.insert(
                "Main Reason".to_string(),
                serde_json::Value::String(outcome.reason_text().to_string()),
            );
            serde_json::Value::Object(entry)
        })
        .collect();

    serde_json::json!({
        "success": true,
        "total": report.total,
        "satisfied": report.satisfied,
        "dissatisfied": report.dissatisfied,
        "errors": report.errors,
        "satisfied_percentage": report.satisfied_percentage,
        "dissatisfied_percentage": report.dissatisfied_percentage,
        "results": results,
        "showing": report.total.min(BATCH_DISPLAY_LIMIT),
    })
}

/// Serve command entry point (blocking). Loads the bundle, falls back to
/// degraded mode on any load failure, and runs until Ctrl+C.
pub fn run(artifacts_dir: &Path, host: &str, port: u16) -> Result<()> {
    let service = match ArtifactBundle::load(artifacts_dir) {
        Ok(bundle) => {
            info!(dir = %artifacts_dir.display(), "artifact bundle loaded");
            Some(PredictionService::from_bundle(bundle))
        }
        Err(e) => {
            warn!(
                dir = %artifacts_dir.display(),
                "starting in degraded mode, predictions will fail: {e}"
            );
            None
        }
    };

    let state = Arc::new(AppState { service });
    let app = router(state);
    let bind_addr = format!("{host}:{port}");

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
        info!("server listening on http://{bind_addr}");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        info!("server stopped");
        Ok(())
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to install Ctrl+C handler: {e}");
    }
}
