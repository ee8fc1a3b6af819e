//! PM2.5 → cigarettes-per-day conversion.
//!
//! Rough equivalence: breathing 22 µg/m³ of PM2.5 for a day is about one
//! cigarette.

use serde::Serialize;

/// µg/m³ of PM2.5 per cigarette per day.
pub const PM25_PER_CIGARETTE: f64 = 22.0;

/// Reference ceiling for the "pollution vs. daily limit" gauge.
pub const DAILY_CIGARETTE_LIMIT: f64 = 20.0;

/// Equivalent cigarettes per day, rounded to 2 decimal places.
pub fn pm25_to_cigarettes(pm25: f64) -> f64 {
    round_2dp(pm25 / PM25_PER_CIGARETTE)
}

/// Share of [`DAILY_CIGARETTE_LIMIT`], capped at 100.
pub fn daily_limit_percentage(cigarettes: f64) -> f64 {
    (cigarettes / DAILY_CIGARETTE_LIMIT * 100.0).min(100.0)
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// How alarming a cigarette count is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CigaretteBurden {
    Low,
    Elevated,
    High,
    Severe,
}

impl CigaretteBurden {
    /// Tiers: ≤2 Low, ≤5 Elevated, ≤10 High, else Severe
    pub fn from_count(cigarettes: f64) -> Self {
        if cigarettes <= 2.0 {
            CigaretteBurden::Low
        } else if cigarettes <= 5.0 {
            CigaretteBurden::Elevated
        } else if cigarettes <= 10.0 {
            CigaretteBurden::High
        } else {
            CigaretteBurden::Severe
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            CigaretteBurden::Low => "#10b981",
            CigaretteBurden::Elevated => "#f59e0b",
            CigaretteBurden::High => "#f97316",
            CigaretteBurden::Severe => "#ef4444",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_values() {
        assert_relative_eq!(pm25_to_cigarettes(22.0), 1.00, epsilon = 1e-9);
        assert_relative_eq!(pm25_to_cigarettes(0.0), 0.00, epsilon = 1e-9);
        assert_relative_eq!(pm25_to_cigarettes(11.0), 0.50, epsilon = 1e-9);
    }

    #[test]
    fn test_two_decimal_places() {
        // 38.5 / 22 = 1.75
        assert_relative_eq!(pm25_to_cigarettes(38.5), 1.75, epsilon = 1e-9);
        // 10 / 22 = 0.4545... → 0.45
        assert_relative_eq!(pm25_to_cigarettes(10.0), 0.45, epsilon = 1e-9);
        // 500 / 22 = 22.7272... → 22.73
        assert_relative_eq!(pm25_to_cigarettes(500.0), 22.73, epsilon = 1e-9);
    }

    #[test]
    fn test_daily_limit_percentage_caps() {
        assert_relative_eq!(daily_limit_percentage(0.0), 0.0);
        assert_relative_eq!(daily_limit_percentage(5.0), 25.0, epsilon = 1e-9);
        assert_relative_eq!(daily_limit_percentage(20.0), 100.0, epsilon = 1e-9);
        assert_relative_eq!(daily_limit_percentage(35.0), 100.0);
    }

    #[test]
    fn test_burden_tiers() {
        assert_eq!(CigaretteBurden::from_count(0.0), CigaretteBurden::Low);
        assert_eq!(CigaretteBurden::from_count(2.0), CigaretteBurden::Low);
        assert_eq!(CigaretteBurden::from_count(2.01), CigaretteBurden::Elevated);
        assert_eq!(CigaretteBurden::from_count(5.0), CigaretteBurden::Elevated);
        assert_eq!(CigaretteBurden::from_count(10.0), CigaretteBurden::High);
        assert_eq!(CigaretteBurden::from_count(10.5), CigaretteBurden::Severe);
    }
}
