//! HTTP handlers.
//!
//! Every handler degrades rather than fails: pipeline errors become an
//! informative status for that one response, and the vessel feed can never
//! block the satellite portion of the dashboard.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use fishspot_common::{BoundingBox, Hotspot, SpeciesTable};
use grid_pipeline::{align_to, classify, sample_spots, PipelineError, ResampleMethod};
use renderer::{encode_overlay, rasterize, ColorScale};
use vessel_feed::{collect_positions, FeedError, FeedMode};

use crate::state::{AppState, Field};

#[derive(Debug, Deserialize)]
pub struct OverlayParams {
    bbox: Option<String>,
    vmin: Option<f32>,
    vmax: Option<f32>,
    scale: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HotspotParams {
    bbox: Option<String>,
    cap: Option<usize>,
    /// "nearest" (default) or "linear"
    resample: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VesselParams {
    bbox: Option<String>,
}

/// GET /overlay/:field — latest slice rasterized as PNG.
pub async fn overlay_handler(
    Path(field): Path<String>,
    Query(params): Query<OverlayParams>,
    Extension(state): Extension<Arc<AppState>>,
) -> Response {
    let Some(field) = Field::parse(&field) else {
        return (
            StatusCode::BAD_REQUEST,
            format!("unknown field '{field}', expected 'sst' or 'chl'"),
        )
            .into_response();
    };

    let bbox = match resolve_bbox(params.bbox.as_deref(), &state) {
        Ok(bbox) => bbox,
        Err(response) => return response,
    };

    let render = &state.config.render;
    let (vmin, vmax, scale_name) = match field {
        Field::Sst => (render.sst_vmin, render.sst_vmax, render.sst_scale.as_str()),
        Field::Chl => (render.chl_vmin, render.chl_vmax, render.chl_scale.as_str()),
    };
    let vmin = params.vmin.unwrap_or(vmin);
    let vmax = params.vmax.unwrap_or(vmax);

    let scale = match ColorScale::named(params.scale.as_deref().unwrap_or(scale_name)) {
        Ok(scale) => scale,
        Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    };

    let grid = match state.fetch_subset(field, &bbox).await {
        Ok(grid) => grid,
        Err(e) => return degraded(e),
    };

    let image = rasterize(&grid, vmin, vmax, &scale);
    let png = match encode_overlay(&image) {
        Ok(png) => png,
        Err(e) => {
            warn!(error = %e, "overlay encoding failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    let valid_time = grid
        .valid_time()
        .map(|t| t.to_rfc3339())
        .unwrap_or_default();
    (
        [
            ("content-type", "image/png".to_string()),
            ("x-overlay-bbox", bbox.cache_key().replace('_', ",")),
            ("x-valid-time", valid_time),
        ],
        png,
    )
        .into_response()
}

#[derive(Debug, Serialize)]
pub struct HotspotResponse {
    status: &'static str,
    species: String,
    display_name: String,
    color: String,
    notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    valid_time: Option<DateTime<Utc>>,
    spots: Vec<Hotspot>,
}

/// GET /hotspots/:species — classified and sampled markers.
pub async fn hotspots_handler(
    Path(species): Path<String>,
    Query(params): Query<HotspotParams>,
    Extension(state): Extension<Arc<AppState>>,
) -> Response {
    let Some(profile) = state.species.get(&species).cloned() else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("unknown species '{species}'") })),
        )
            .into_response();
    };

    let bbox = match resolve_bbox(params.bbox.as_deref(), &state) {
        Ok(bbox) => bbox,
        Err(response) => return response,
    };
    let cap = params.cap.unwrap_or(state.config.spot_cap);
    let method = match params.resample.as_deref() {
        Some("linear") => ResampleMethod::Linear,
        _ => ResampleMethod::Nearest,
    };

    let mut response = HotspotResponse {
        status: "ok",
        species: profile.name.clone(),
        display_name: profile.display_name.clone(),
        color: profile.color.clone(),
        notes: profile.notes.clone(),
        reason: None,
        count: 0,
        valid_time: None,
        spots: Vec::new(),
    };

    let outcome = async {
        let sst = state.fetch_subset(Field::Sst, &bbox).await?;
        let chl = state.fetch_subset(Field::Chl, &bbox).await?;
        let chl_aligned = align_to(&chl, &sst, method)?;
        let mask = classify(&sst, &chl_aligned, &profile)?;
        Ok::<_, PipelineError>((sst, mask))
    }
    .await;

    match outcome {
        Ok((sst, mask)) => {
            response.count = mask.count();
            response.valid_time = sst.valid_time();
            response.spots = sample_spots(&mask, cap)
                .into_iter()
                .map(|(lat, lon)| Hotspot::new(lat, lon, &*profile.name, &*profile.color))
                .collect();
        }
        Err(e) => {
            // Degraded but informative: the map renders with "no data today".
            warn!(species = %profile.name, error = %e, "hotspot pipeline failed");
            response.status = "no-data";
            response.reason = Some(e.to_string());
        }
    }

    Json(response).into_response()
}

#[derive(Debug, Serialize)]
pub struct VesselResponse {
    mode: String,
    count: usize,
    vessels: Vec<vessel_feed::VesselPosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warning: Option<String>,
}

/// GET /vessels — one time-boxed collection pass, or the demo fleet.
pub async fn vessels_handler(
    Query(params): Query<VesselParams>,
    Extension(state): Extension<Arc<AppState>>,
) -> Response {
    let bbox = match resolve_bbox(params.bbox.as_deref(), &state) {
        Ok(bbox) => bbox,
        Err(response) => return response,
    };

    let response = match collect_positions(&state.credentials, &bbox, &state.feed_config()).await {
        Ok(report) => VesselResponse {
            mode: match report.mode {
                FeedMode::Live => "live".to_string(),
                FeedMode::Demo => "demo".to_string(),
            },
            count: report.vessels.len(),
            vessels: report.vessels,
            warning: None,
        },
        Err(FeedError::Unavailable(reason)) => {
            warn!(%reason, "vessel feed unavailable");
            VesselResponse {
                mode: "unavailable".to_string(),
                count: 0,
                vessels: Vec::new(),
                warning: Some(format!("live vessel feed unavailable: {reason}")),
            }
        }
    };

    Json(response).into_response()
}

/// GET /species — the configured threshold table.
pub async fn species_handler(Extension(state): Extension<Arc<AppState>>) -> Json<SpeciesTable> {
    Json(state.species.clone())
}

/// GET /health
pub async fn health_handler() -> &'static str {
    "OK"
}

fn resolve_bbox(raw: Option<&str>, state: &AppState) -> Result<BoundingBox, Response> {
    match raw {
        Some(raw) => BoundingBox::from_query_string(raw)
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()).into_response()),
        None => Ok(state.config.bbox),
    }
}

/// Map a pipeline failure onto a degraded response.
fn degraded(err: PipelineError) -> Response {
    warn!(error = %err, "pipeline error");
    let status = match &err {
        PipelineError::EmptyRegion { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, err.to_string()).into_response()
}
