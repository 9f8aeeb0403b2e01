use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine;
use serde::Deserialize;
use serde_json::Value;

use esg_core::{
    ChartImage, EsgData, EsgError, EsgStore, StoredEsgData, StoredStrategySelection,
    StrategyBundle, StrategySelection,
};
use esg_report::LayoutConfig;
use esg_strategy::StrategyGenerator;

use crate::error::ApiError;
use crate::render_stored_report;

/// Everything a handler needs, built once at startup.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: Arc<EsgStore>,
    pub generator: StrategyGenerator,
    pub layout: LayoutConfig,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/esg-data", get(get_esg_data).post(post_esg_data))
        .route(
            "/selected-strategy",
            get(get_selected_strategy).post(post_selected_strategy),
        )
        .route("/generate-strategy", post(generate_strategy))
        .route("/report", post(report))
        .with_state(state)
}

fn parse_body(body: &[u8]) -> Result<Value, EsgError> {
    serde_json::from_slice(body)
        .map_err(|e| EsgError::validation("body", format!("invalid JSON: {e}")))
}

async fn get_esg_data(
    State(state): State<AppState>,
) -> Result<Json<Option<StoredEsgData>>, ApiError> {
    Ok(Json(state.store.get_esg_data()?))
}

async fn post_esg_data(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StoredEsgData>, ApiError> {
    let data = EsgData::from_json(&parse_body(&body)?)?;
    Ok(Json(state.store.put_esg_data(data)?))
}

async fn get_selected_strategy(
    State(state): State<AppState>,
) -> Result<Json<Option<StoredStrategySelection>>, ApiError> {
    Ok(Json(state.store.get_selected_strategy()?))
}

async fn post_selected_strategy(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StoredStrategySelection>, ApiError> {
    let selection = StrategySelection::from_json(&parse_body(&body)?)?;
    Ok(Json(state.store.put_selected_strategy(selection)?))
}

async fn generate_strategy(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StrategyBundle>, ApiError> {
    let data = EsgData::from_json(&parse_body(&body)?)?;
    let bundle = state.generator.generate(&data).await;
    tracing::info!(
        target: "esg_server",
        company = %data.company_name,
        mode = ?bundle.mode,
        "generated strategies"
    );
    Ok(Json(bundle))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportRequest {
    chart: Option<ChartPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartPayload {
    width_px: u32,
    height_px: u32,
    png_base64: String,
}

impl ChartPayload {
    /// Undecodable payloads become an empty, unusable image so the report
    /// still renders with the placeholder.
    fn into_chart(self) -> ChartImage {
        let encoded = match self.png_base64.split_once(";base64,") {
            Some((_, data)) => data,
            None => self.png_base64.as_str(),
        };
        let bytes = match base64::engine::general_purpose::STANDARD.decode(encoded.trim()) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(target: "esg_server", error = %e, "chart payload is not base64");
                Vec::new()
            }
        };
        ChartImage {
            width_px: self.width_px,
            height_px: self.height_px,
            bytes,
        }
    }
}

async fn report(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let request: ReportRequest = if body.iter().all(u8::is_ascii_whitespace) {
        ReportRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| EsgError::validation("body", format!("invalid report request: {e}")))?
    };
    let chart = request.chart.map(ChartPayload::into_chart);

    let store = state.store.clone();
    let layout = state.layout.clone();
    let (filename, pdf) = tokio::task::spawn_blocking(move || {
        render_stored_report(&store, layout, chart.as_ref())
    })
    .await
    .map_err(|e| EsgError::Render(format!("report task failed: {e}")))??;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((headers, pdf).into_response())
}
