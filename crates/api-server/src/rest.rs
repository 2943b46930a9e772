//! REST API handlers for ad serving, click tracking, and campaign admin.

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use ads_core::types::{Campaign, EntityId, ServedAd};
use ads_core::AdsError;
use ads_serving::{AbStats, AbStatsService, AdSelectionService, ClickRecorder};
use ads_store::{AdvertisementStore, CampaignStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub selection: Arc<AdSelectionService>,
    pub recorder: Arc<ClickRecorder>,
    pub stats: Arc<AbStatsService>,
    pub ads: Arc<dyn AdvertisementStore>,
    pub campaigns: Arc<dyn CampaignStore>,
    pub node_id: String,
    pub start_time: Instant,
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Session ID from the `x-session-id` header; empty when absent.
fn session_id(headers: &HeaderMap) -> &str {
    header_str(headers, "x-session-id").unwrap_or("")
}

/// Fault-injection headers for error-tracking demos: `x-throw-error`
/// (boolean) arms the fault, `x-error-rate` (0.0-1.0, default 1.0) sets the
/// trigger probability. Unparseable values fall back to the defaults —
/// malformed input here is never an error.
fn fault_requested(headers: &HeaderMap) -> bool {
    let armed = header_str(headers, "x-throw-error")
        .map(|v| v.parse::<bool>().unwrap_or(false))
        .unwrap_or(false);
    if !armed {
        return false;
    }
    let rate = header_str(headers, "x-error-rate")
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(1.0);
    rand::random::<f64>() < rate
}

fn error_response(err: AdsError) -> (StatusCode, Json<ErrorResponse>) {
    if err.is_not_found() {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "not_found".to_string(),
                message: err.to_string(),
            }),
        );
    }
    error!(error = %err, "Request failed");
    metrics::counter!("api.errors").increment(1);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "internal_error".to_string(),
            message: "Internal processing error".to_string(),
        }),
    )
}

/// GET / — service banner.
pub async fn home() -> &'static str {
    "Welcome to the Ads Service"
}

/// GET /ads — serve the catalog stamped with the caller's resolved group.
pub async fn get_ads(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ServedAd>>, (StatusCode, Json<ErrorResponse>)> {
    if fault_requested(&headers) {
        warn!("Fault injection triggered, failing /ads on purpose");
        metrics::counter!("api.injected_faults").increment(1);
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "injected_fault".to_string(),
                message: "took too long to get a response".to_string(),
            }),
        ));
    }

    let session = session_id(&headers);
    match state.selection.select(session).await {
        Ok(served) => {
            metrics::counter!("api.ads_served").increment(served.len() as u64);
            Ok(Json(served))
        }
        Err(e) => Err(error_response(e)),
    }
}

/// GET /click/{id} — record the click and redirect to the ad's target.
pub async fn click(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    headers: HeaderMap,
) -> Response {
    let session = session_id(&headers);
    match state.recorder.record(id, session).await {
        Ok(outcome) => {
            info!(ad_id = id, redirect = %outcome.redirect_to, "Redirecting click");
            (
                StatusCode::FOUND,
                [(header::LOCATION, outcome.redirect_to)],
            )
                .into_response()
        }
        Err(e) if e.is_not_found() => {
            warn!(ad_id = id, "Click for unknown advertisement");
            StatusCode::NOT_FOUND.into_response()
        }
        Err(e) => error_response(e).into_response(),
    }
}

/// GET /ab-stats — aggregate A/B statistics.
pub async fn ab_stats(
    State(state): State<AppState>,
) -> Result<Json<AbStats>, (StatusCode, Json<ErrorResponse>)> {
    state
        .stats
        .stats()
        .await
        .map(Json)
        .map_err(error_response)
}

/// GET /campaigns — list all campaigns.
pub async fn list_campaigns(
    State(state): State<AppState>,
) -> Result<Json<Vec<Campaign>>, (StatusCode, Json<ErrorResponse>)> {
    state
        .campaigns
        .find_all()
        .await
        .map(Json)
        .map_err(error_response)
}

/// Payload for creating a campaign; the store assigns the ID.
#[derive(Debug, Deserialize)]
pub struct NewCampaign {
    pub name: String,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub budget_cents: u64,
    pub target_taxon: String,
}

/// POST /campaigns — create a campaign.
pub async fn create_campaign(
    State(state): State<AppState>,
    Json(new): Json<NewCampaign>,
) -> Result<(StatusCode, Json<Campaign>), (StatusCode, Json<ErrorResponse>)> {
    info!(name = %new.name, "Creating campaign");
    let campaign = Campaign {
        id: 0,
        name: new.name,
        start_date: new.start_date,
        end_date: new.end_date,
        budget_cents: new.budget_cents,
        target_taxon: new.target_taxon,
    };
    state
        .campaigns
        .save(campaign)
        .await
        .map(|saved| (StatusCode::CREATED, Json(saved)))
        .map_err(error_response)
}

/// GET /health — health check with a store round-trip.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_connected = state.ads.find_all().await.is_ok();
    Json(HealthResponse {
        service: "store-ads".to_string(),
        node_id: state.node_id.clone(),
        store_connected,
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// GET /ready — readiness probe.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    if state.ads.find_all().await.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /live — liveness probe.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub service: String,
    pub node_id: String,
    pub store_connected: bool,
    pub uptime_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(name: &'static str, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_session_id_defaults_to_empty() {
        assert_eq!(session_id(&HeaderMap::new()), "");
        assert_eq!(
            session_id(&headers_with("x-session-id", "abc")),
            "abc"
        );
    }

    #[test]
    fn test_fault_disarmed_by_default() {
        assert!(!fault_requested(&HeaderMap::new()));
    }

    #[test]
    fn test_fault_always_fires_at_default_rate() {
        let headers = headers_with("x-throw-error", "true");
        assert!(fault_requested(&headers));
    }

    #[test]
    fn test_unparseable_flag_is_treated_as_disarmed() {
        let headers = headers_with("x-throw-error", "not-a-bool");
        assert!(!fault_requested(&headers));
    }

    #[test]
    fn test_unparseable_rate_falls_back_to_certain() {
        let mut headers = headers_with("x-throw-error", "true");
        headers.insert("x-error-rate", HeaderValue::from_static("nope"));
        assert!(fault_requested(&headers));
    }

    #[test]
    fn test_zero_rate_never_fires() {
        let mut headers = headers_with("x-throw-error", "true");
        headers.insert("x-error-rate", HeaderValue::from_static("0.0"));
        assert!(!fault_requested(&headers));
    }
}
