//! Everything a client needs to display for one city, derived from a
//! single pollution reading.

use serde::Serialize;

use crate::aqi::{pm25_to_aqi_or_sentinel, AqiAssessment};
use crate::converter::{daily_limit_percentage, pm25_to_cigarettes, CigaretteBurden};
use crate::types::{Coordinates, PollutionReading};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirReport {
    pub city: String,
    pub lat: f64,
    pub lon: f64,

    /// Upstream 1-5 index
    pub aqi: u8,
    pub pm2_5: f64,

    pub cigarettes: f64,
    pub burden: CigaretteBurden,
    pub burden_color: &'static str,
    pub daily_limit_percent: f64,

    /// EPA 0-500 index, `-1` when the concentration is off the table
    pub epa_aqi: i32,
    pub category: Option<crate::aqi::SeverityCategory>,
    pub category_label: Option<&'static str>,
    pub description: Option<&'static str>,
    pub color: Option<&'static str>,
    pub scale_percent: Option<f64>,
}

impl AirReport {
    pub fn new(city: &str, coordinates: Coordinates, reading: PollutionReading) -> Self {
        let cigarettes = pm25_to_cigarettes(reading.concentration);
        let burden = CigaretteBurden::from_count(cigarettes);
        let assessment = AqiAssessment::from_pm25(reading.concentration);

        Self {
            city: city.to_string(),
            lat: coordinates.latitude,
            lon: coordinates.longitude,
            aqi: reading.index,
            pm2_5: reading.concentration,
            cigarettes,
            burden,
            burden_color: burden.color(),
            daily_limit_percent: daily_limit_percentage(cigarettes),
            epa_aqi: pm25_to_aqi_or_sentinel(reading.concentration),
            category: assessment.map(|a| a.category),
            category_label: assessment.map(|a| a.category.label()),
            description: assessment.map(|a| a.category.description()),
            color: assessment.map(|a| a.category.color()),
            scale_percent: assessment.map(|a| a.scale_percentage()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aqi::{SeverityCategory, UNDEFINED_AQI};
    use approx::assert_relative_eq;

    const DUBAI: Coordinates = Coordinates { latitude: 25.2048, longitude: 55.2708 };

    #[test]
    fn test_report_derivations() {
        let report = AirReport::new("Dubai", DUBAI, PollutionReading { index: 3, concentration: 38.5 });

        assert_eq!(report.aqi, 3);
        assert_relative_eq!(report.cigarettes, 1.75, epsilon = 1e-9);
        assert_eq!(report.burden, CigaretteBurden::Low);
        assert_relative_eq!(report.daily_limit_percent, 8.75, epsilon = 1e-9);
        assert_eq!(report.epa_aqi, 108);
        assert_eq!(report.category, Some(SeverityCategory::UnhealthySensitive));
        assert_eq!(report.color, Some("#f97316"));
    }

    #[test]
    fn test_undefined_index_has_no_category() {
        // Off the top of the table
        let report = AirReport::new("Nowhere", DUBAI, PollutionReading { index: 5, concentration: 612.0 });

        assert_eq!(report.epa_aqi, UNDEFINED_AQI);
        assert!(report.category.is_none());
        assert!(report.category_label.is_none());
        assert!(report.scale_percent.is_none());
        // 612 / 22 = 27.82, still reported
        assert_relative_eq!(report.cigarettes, 27.82, epsilon = 1e-9);
        assert_eq!(report.burden, CigaretteBurden::Severe);
        assert_relative_eq!(report.daily_limit_percent, 100.0);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["epa_aqi"], -1);
        assert!(json["category"].is_null());
    }
}
