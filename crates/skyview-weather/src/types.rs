use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::condition::ConditionCategory;

/// Number of entries in every forecast
pub const FORECAST_DAYS: usize = 7;

/// City resolved through the provider's geocoding endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    /// Provider location id used by the weather endpoints
    pub id: String,
    pub name: String,
    /// First-level administrative area (province/state)
    pub admin_area: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl ResolvedLocation {
    /// Name for display, qualified by the admin area when it differs.
    pub fn display_name(&self) -> String {
        match self.admin_area.as_deref() {
            Some(area) if !area.is_empty() && area != self.name => {
                format!("{}, {}", self.name, area)
            }
            _ => self.name.clone(),
        }
    }
}

/// Current conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature: f64,
    pub feels_like: f64,
    pub description: String,
    /// Provider icon code
    pub icon: String,
    pub humidity: u8,
    pub wind_direction: String,
    /// km/h
    pub wind_speed: f64,
    /// Beaufort scale as reported
    pub wind_scale: String,
    /// hPa
    pub pressure: f64,
    /// km
    pub visibility: f64,
    pub sunrise: Option<NaiveTime>,
    pub sunset: Option<NaiveTime>,
    /// `None` when the provider's timestamp could not be parsed
    pub observed_at: Option<DateTime<FixedOffset>>,
    pub sources: Vec<String>,
}

impl WeatherSnapshot {
    pub fn category(&self) -> ConditionCategory {
        ConditionCategory::classify(&self.description)
    }
}

/// Daily forecast entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub temp_max: f64,
    pub temp_min: f64,
    pub day_description: String,
    pub night_description: String,
    pub icon: String,
    pub wind_direction: String,
    pub wind_scale: String,
    /// mm
    pub precipitation: f64,
    pub humidity: u8,
}

impl ForecastDay {
    /// Day-of-week label, e.g. "Tuesday"
    pub fn weekday_label(&self) -> String {
        self.date.format("%A").to_string()
    }

    /// Short date label, e.g. "07-29"
    pub fn date_label(&self) -> String {
        self.date.format("%m-%d").to_string()
    }

    pub fn category(&self) -> ConditionCategory {
        ConditionCategory::classify(&self.day_description)
    }
}

/// Everything one successful fetch produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location: ResolvedLocation,
    pub current: WeatherSnapshot,
    /// Exactly `FORECAST_DAYS` entries, today first
    pub forecast: Vec<ForecastDay>,
    pub fetched_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(name: &str, admin_area: Option<&str>) -> ResolvedLocation {
        ResolvedLocation {
            id: "101020100".to_string(),
            name: name.to_string(),
            admin_area: admin_area.map(str::to_string),
            country: Some("中国".to_string()),
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn test_display_name_adds_admin_area() {
        let pudong = location("浦东", Some("上海市"));
        assert_eq!(pudong.display_name(), "浦东, 上海市");
    }

    #[test]
    fn test_display_name_skips_duplicate_area() {
        assert_eq!(location("上海", Some("上海")).display_name(), "上海");
        assert_eq!(location("上海", None).display_name(), "上海");
    }

    #[test]
    fn test_forecast_labels() {
        let day = ForecastDay {
            date: NaiveDate::from_ymd_opt(2025, 7, 29).unwrap(),
            temp_max: 33.0,
            temp_min: 24.0,
            day_description: "雷阵雨".to_string(),
            night_description: "阴".to_string(),
            icon: "302".to_string(),
            wind_direction: "南风".to_string(),
            wind_scale: "1-3".to_string(),
            precipitation: 4.2,
            humidity: 80,
        };
        assert_eq!(day.weekday_label(), "Tuesday");
        assert_eq!(day.date_label(), "07-29");
        assert_eq!(day.category(), ConditionCategory::Thunderstorm);
    }
}
