//! EPA Air Quality Index from PM2.5.
//!
//! Piecewise-linear interpolation over the EPA breakpoint table. The table is
//! bounded on both ends (0.0 and 500.4 µg/m³) and has small gaps between
//! segments (e.g. 12.0 → 12.1); any concentration that falls in no segment
//! has no defined index.

use serde::Serialize;

/// HTTP encoding of "no defined index".
pub const UNDEFINED_AQI: i32 = -1;

/// Top of the EPA scale.
pub const AQI_SCALE_MAX: u16 = 500;

/// One row of the breakpoint table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub index_low: u16,
    pub index_high: u16,
    pub conc_low: f64,
    pub conc_high: f64,
}

impl Breakpoint {
    const fn new(index_low: u16, index_high: u16, conc_low: f64, conc_high: f64) -> Self {
        Self { index_low, index_high, conc_low, conc_high }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, concentration: f64) -> bool {
        concentration >= self.conc_low && concentration <= self.conc_high
    }

    /// `round((Ih - Il) / (Ch - Cl) * (C - Cl) + Il)`
    pub fn interpolate(&self, concentration: f64) -> u16 {
        let index_span = f64::from(self.index_high - self.index_low);
        let conc_span = self.conc_high - self.conc_low;
        let value = index_span / conc_span * (concentration - self.conc_low) + f64::from(self.index_low);
        value.round() as u16
    }
}

/// PM2.5 breakpoints, ascending. Index range : concentration range (µg/m³).
pub const PM25_BREAKPOINTS: [Breakpoint; 7] = [
    Breakpoint::new(0, 50, 0.0, 12.0),
    Breakpoint::new(51, 100, 12.1, 35.4),
    Breakpoint::new(101, 150, 35.5, 55.4),
    Breakpoint::new(151, 200, 55.5, 150.4),
    Breakpoint::new(201, 300, 150.5, 250.4),
    Breakpoint::new(301, 400, 250.5, 350.4),
    Breakpoint::new(401, 500, 350.5, 500.4),
];

/// EPA AQI for a PM2.5 concentration, or `None` when no segment matches.
///
/// No extrapolation: negative values, values above 500.4, values inside the
/// inter-segment gaps and NaN are all undefined.
pub fn pm25_to_aqi(concentration: f64) -> Option<u16> {
    PM25_BREAKPOINTS
        .iter()
        .find(|bp| bp.contains(concentration))
        .map(|bp| bp.interpolate(concentration))
}

/// [`pm25_to_aqi`] with the `-1` sentinel used on the wire.
pub fn pm25_to_aqi_or_sentinel(concentration: f64) -> i32 {
    pm25_to_aqi(concentration).map_or(UNDEFINED_AQI, i32::from)
}

/// Position on the 0-500 scale as a percentage, capped at 100.
pub fn scale_percentage(index: u16) -> f64 {
    (f64::from(index) / f64::from(AQI_SCALE_MAX) * 100.0).min(100.0)
}

// ============================================================================
// Severity
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum SeverityCategory {
    Good,
    Moderate,
    UnhealthySensitive,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl SeverityCategory {
    /// Thresholds: ≤50, ≤100, ≤150, ≤200, ≤300, else Hazardous.
    pub fn from_index(index: u16) -> Self {
        match index {
            0..=50 => SeverityCategory::Good,
            51..=100 => SeverityCategory::Moderate,
            101..=150 => SeverityCategory::UnhealthySensitive,
            151..=200 => SeverityCategory::Unhealthy,
            201..=300 => SeverityCategory::VeryUnhealthy,
            _ => SeverityCategory::Hazardous,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SeverityCategory::Good => "Good",
            SeverityCategory::Moderate => "Moderate",
            SeverityCategory::UnhealthySensitive => "Unhealthy for Sensitive Groups",
            SeverityCategory::Unhealthy => "Unhealthy",
            SeverityCategory::VeryUnhealthy => "Very Unhealthy",
            SeverityCategory::Hazardous => "Hazardous",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SeverityCategory::Good => "Air quality is satisfactory.",
            SeverityCategory::Moderate => {
                "Air quality is acceptable, but there may be risks for sensitive individuals."
            }
            SeverityCategory::UnhealthySensitive => "Sensitive groups may experience health effects.",
            SeverityCategory::Unhealthy => "Everyone may begin to experience health effects.",
            SeverityCategory::VeryUnhealthy => "Health alert: everyone may experience serious effects.",
            SeverityCategory::Hazardous => "Serious health warnings of emergency conditions.",
        }
    }

    /// Hex colour for display.
    pub fn color(self) -> &'static str {
        match self {
            SeverityCategory::Good => "#10b981",
            SeverityCategory::Moderate => "#facc15",
            SeverityCategory::UnhealthySensitive => "#f97316",
            SeverityCategory::Unhealthy => "#ef4444",
            SeverityCategory::VeryUnhealthy => "#8b5cf6",
            SeverityCategory::Hazardous => "#7c2d12",
        }
    }
}

/// A defined index together with its category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AqiAssessment {
    pub index: u16,
    pub category: SeverityCategory,
}

impl AqiAssessment {
    pub fn from_pm25(concentration: f64) -> Option<Self> {
        pm25_to_aqi(concentration).map(|index| Self {
            index,
            category: SeverityCategory::from_index(index),
        })
    }

    pub fn scale_percentage(&self) -> f64 {
        scale_percentage(self.index)
    }
}
