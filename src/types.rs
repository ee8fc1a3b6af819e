//! Core data model: coordinates, pollution readings, and the upstream
//! OpenWeather payload shapes they are decoded from.

use serde::{Deserialize, Serialize};

use crate::error::SmogError;

/// A geographic point. Serialized as `{lat, lon}` both on our HTTP surface
/// and in the upstream geocoding payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

/// Current air quality at a point.
///
/// `index` is the upstream categorical index (1 = good .. 5 = very poor),
/// not the EPA 0-500 scale; see [`crate::aqi`] for that.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PollutionReading {
    #[serde(rename = "aqi")]
    pub index: u8,
    /// PM2.5 in µg/m³
    #[serde(rename = "pm2_5")]
    pub concentration: f64,
}

/// Validated `lat`/`lon` query input.
///
/// Keeps the raw text alongside the parsed values: the cache is keyed on
/// the text exactly as the caller sent it.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateQuery {
    pub raw_lat: String,
    pub raw_lon: String,
    pub coordinates: Coordinates,
}

impl CoordinateQuery {
    pub fn parse(lat: Option<&str>, lon: Option<&str>) -> Result<Self, SmogError> {
        let (raw_lat, raw_lon) = match (lat, lon) {
            (Some(lat), Some(lon)) if !lat.is_empty() && !lon.is_empty() => (lat, lon),
            _ => return Err(SmogError::Validation("Lat/Lon missing".to_string())),
        };

        let latitude = parse_degrees(raw_lat, 90.0)?;
        let longitude = parse_degrees(raw_lon, 180.0)?;

        Ok(Self {
            raw_lat: raw_lat.to_string(),
            raw_lon: raw_lon.to_string(),
            coordinates: Coordinates { latitude, longitude },
        })
    }

    /// Query for coordinates we produced ourselves (e.g. from the geocoder).
    pub fn from_coordinates(coordinates: Coordinates) -> Self {
        Self {
            raw_lat: coordinates.latitude.to_string(),
            raw_lon: coordinates.longitude.to_string(),
            coordinates,
        }
    }
}

fn parse_degrees(raw: &str, limit: f64) -> Result<f64, SmogError> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| SmogError::Validation(format!("Lat/Lon invalid: {raw:?} is not a number")))?;
    if !value.is_finite() || value.abs() > limit {
        return Err(SmogError::Validation(format!(
            "Lat/Lon invalid: {raw} is outside ±{limit}"
        )));
    }
    Ok(value)
}

// ============================================================================
// Upstream payloads
// ============================================================================

/// One entry of `GET /geo/1.0/direct`. Extra fields (name, country, ...)
/// are ignored.
pub type GeocodeEntry = Coordinates;

/// Response of `GET /data/2.5/air_pollution`.
#[derive(Debug, Deserialize)]
pub struct AirPollutionResponse {
    #[serde(default)]
    pub list: Vec<AirPollutionEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AirPollutionEntry {
    pub main: AirPollutionMain,
    pub components: AirPollutionComponents,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AirPollutionMain {
    pub aqi: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AirPollutionComponents {
    pub pm2_5: f64,
}

impl AirPollutionResponse {
    /// First time-series entry as a reading. An empty list is an upstream
    /// contract violation, not a panic.
    pub fn first_reading(&self) -> Result<PollutionReading, SmogError> {
        let entry = self
            .list
            .first()
            .ok_or_else(|| SmogError::malformed("empty pollution list"))?;
        Ok(PollutionReading {
            index: entry.main.aqi,
            concentration: entry.components.pm2_5,
        })
    }
}
