// Axum API Server Module
//
// Purpose: thin JSON proxy over OpenWeather geocoding + air pollution,
// with a TTL read-through cache on the pollution endpoint.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};

use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use std::sync::Arc;

use crate::cache::{MokaStore, PollutionCache};
use crate::config::AppConfig;
use crate::error::SmogError;
use crate::report::AirReport;
use crate::types::{CoordinateQuery, Coordinates, PollutionReading};
use crate::upstream::{AirQualityApi, OpenWeatherClient};

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn AirQualityApi>,
    /// `None` when caching is disabled
    pub cache: Option<PollutionCache>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Result<Self, SmogError> {
        tracing::info!("Initializing OpenWeather client ({})...", config.base_url);
        let api = Arc::new(OpenWeatherClient::new(
            &config.base_url,
            config.api_key.clone(),
            config.upstream_timeout,
        )?);

        let cache = if config.cache_enabled {
            tracing::info!(
                "Initializing Moka pollution cache (capacity={}, ttl={:?})...",
                config.cache_max_capacity,
                config.cache_ttl
            );
            let store = Arc::new(MokaStore::new(config.cache_max_capacity));
            Some(PollutionCache::new(store, config.cache_ttl))
        } else {
            tracing::info!("Pollution cache disabled");
            None
        };

        Ok(Self { api, cache })
    }

    pub fn with_parts(api: Arc<dyn AirQualityApi>, cache: Option<PollutionCache>) -> Self {
        Self { api, cache }
    }

    /// Pollution reading, through the cache when one is configured.
    pub async fn pollution(&self, query: &CoordinateQuery) -> Result<PollutionReading, SmogError> {
        match &self.cache {
            Some(cache) => cache.get_or_fetch(self.api.as_ref(), query).await,
            None => self.api.air_pollution(query.coordinates).await,
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))

        .route("/location", get(get_location))
        .route("/pollution", get(get_pollution))

        // geocode → pollution → derived display values, in one call
        .route("/report", get(get_report))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

const LOCATION_UPSTREAM_ERROR: &str = "Cant fetch Openweather API data";
const POLLUTION_UPSTREAM_ERROR: &str = "Couldnt fetch pollution data";

#[derive(Debug, serde::Deserialize)]
struct CityQuery {
    city: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
struct LatLonQuery {
    lat: Option<String>,
    lon: Option<String>,
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// GET /location?city=Dubai → {lat, lon}
async fn get_location(
    State(state): State<AppState>,
    Query(params): Query<CityQuery>,
) -> Result<Json<Coordinates>, AppError> {
    let city = require_city(params.city)?;

    let coordinates = state
        .api
        .geocode(&city)
        .await
        .map_err(|e| AppError::from_upstream(e, LOCATION_UPSTREAM_ERROR))?;

    tracing::debug!("Geocoded {:?} to {:?}", city, coordinates);
    Ok(Json(coordinates))
}

/// GET /pollution?lat=25.2&lon=55.27 → {aqi, pm2_5}
async fn get_pollution(
    State(state): State<AppState>,
    Query(params): Query<LatLonQuery>,
) -> Result<Json<PollutionReading>, AppError> {
    let query = CoordinateQuery::parse(params.lat.as_deref(), params.lon.as_deref())
        .map_err(|e| AppError::from_upstream(e, POLLUTION_UPSTREAM_ERROR))?;

    let reading = state
        .pollution(&query)
        .await
        .map_err(|e| AppError::from_upstream(e, POLLUTION_UPSTREAM_ERROR))?;

    Ok(Json(reading))
}

/// GET /report?city=Dubai
///
/// Two sequential upstream calls; the second needs the first's coordinates.
async fn get_report(
    State(state): State<AppState>,
    Query(params): Query<CityQuery>,
) -> Result<Json<AirReport>, AppError> {
    let city = require_city(params.city)?;

    let coordinates = state
        .api
        .geocode(&city)
        .await
        .map_err(|e| AppError::from_upstream(e, LOCATION_UPSTREAM_ERROR))?;

    let reading = state
        .pollution(&CoordinateQuery::from_coordinates(coordinates))
        .await
        .map_err(|e| AppError::from_upstream(e, POLLUTION_UPSTREAM_ERROR))?;

    Ok(Json(AirReport::new(&city, coordinates, reading)))
}

fn require_city(city: Option<String>) -> Result<String, AppError> {
    match city.as_deref().map(str::trim) {
        Some(c) if !c.is_empty() => Ok(c.to_string()),
        _ => Err(AppError::Validation("Missing city in params".to_string())),
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Every failure surfaces as `400 {error, details?}`.
#[derive(Debug)]
enum AppError {
    /// Missing or unusable query input
    Validation(String),
    /// Upstream answered with a non-success status
    Upstream { context: &'static str, details: String },
    /// Transport failure or unusable upstream payload
    Internal(String),
}

impl AppError {
    fn from_upstream(err: SmogError, context: &'static str) -> Self {
        match err {
            SmogError::Validation(msg) => AppError::Validation(msg),
            SmogError::Upstream { status: Some(_), .. } => {
                tracing::warn!("{}: {}", context, err);
                AppError::Upstream { context, details: err.to_string() }
            }
            other => {
                tracing::warn!("{}: {}", context, other);
                AppError::Internal(other.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = match self {
            AppError::Validation(msg) => serde_json::json!({ "error": msg }),
            AppError::Upstream { context, details } => serde_json::json!({
                "error": context,
                "details": details
            }),
            AppError::Internal(details) => serde_json::json!({
                "error": "Something went wrong",
                "details": details
            }),
        };

        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
