//! Panel view-model: search box, status line and the three tabs.
//!
//! Holds the last good report. A failed fetch changes only the status line
//! and marks the shown data stale; it never clears it.

use chrono::{DateTime, Local};
use skyview_weather::condition::description_icon;
use skyview_weather::{ConditionCategory, ForecastDay, WeatherReport};

use crate::error_mapping;
use crate::services::WeatherServiceMessage;

const PLACEHOLDER: &str = "--";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Current,
    Forecast,
    Details,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Current, Tab::Forecast, Tab::Details];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Current => "Current",
            Tab::Forecast => "7-Day Forecast",
            Tab::Details => "Details",
        }
    }

    pub fn next(&self) -> Tab {
        match self {
            Tab::Current => Tab::Forecast,
            Tab::Forecast => Tab::Details,
            Tab::Details => Tab::Current,
        }
    }
}

#[derive(Debug, Default)]
pub struct WeatherPanel {
    loading: bool,
    is_stale: bool,
    status: String,
    error_message: Option<String>,
    search_text: String,
    active_tab: Tab,
    report: Option<WeatherReport>,
    updated_at: Option<DateTime<Local>>,
}

impl WeatherPanel {
    pub fn new() -> Self {
        Self {
            loading: true,
            status: "Loading weather data...".to_string(),
            ..Default::default()
        }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_stale(&self) -> bool {
        self.is_stale
    }

    pub fn has_data(&self) -> bool {
        self.report.is_some()
    }

    pub fn report(&self) -> Option<&WeatherReport> {
        self.report.as_ref()
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    pub fn set_search_text(&mut self, text: &str) {
        self.search_text = text.to_string();
    }

    pub fn locating(&mut self) {
        self.status = "Detecting your city...".to_string();
    }

    /// Start-up city chosen, either detected or the default.
    pub fn located(&mut self, city: &str, detected: bool) {
        self.search_text = city.to_string();
        self.loading = true;
        self.status = if detected {
            format!("Located {}, fetching weather...", city)
        } else {
            format!("Location detection failed, using {}...", city)
        };
    }

    /// Validate the search box. Returns the city to fetch, or `None` when
    /// the input is blank.
    pub fn submit_search(&mut self, input: &str) -> Option<String> {
        let city = input.trim();
        if city.is_empty() {
            return None;
        }
        self.search_text = city.to_string();
        self.loading = true;
        self.status = format!("Fetching weather for {}...", city);
        Some(city.to_string())
    }

    /// Fold a poller message into the panel. Returns the new condition
    /// category after a successful fetch.
    pub fn apply(&mut self, message: WeatherServiceMessage) -> Option<ConditionCategory> {
        match message {
            WeatherServiceMessage::FetchDone { city, result } => match result {
                Ok(report) => {
                    self.apply_report(report, Local::now());
                    self.report.as_ref().map(|r| r.current.category())
                }
                Err(e) => {
                    let app_error = error_mapping::weather_error(e);
                    tracing::warn!("Weather update for {} failed: {}", city, app_error);
                    self.loading = false;
                    self.is_stale = self.report.is_some();
                    self.error_message = Some(app_error.user_message().to_string());
                    self.status = format!("Error: {}", app_error.user_message());
                    None
                }
            },
        }
    }

    fn apply_report(&mut self, report: WeatherReport, now: DateTime<Local>) {
        self.loading = false;
        self.is_stale = false;
        self.error_message = None;
        self.status = format!("Weather updated at {}", now.format("%Y-%m-%d %H:%M:%S"));
        self.updated_at = Some(now);
        self.report = Some(report);
    }

    pub fn city_label(&self) -> String {
        self.report
            .as_ref()
            .map(|r| r.location.display_name())
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    }

    /// Label/value rows of the current-conditions tab
    pub fn current_rows(&self) -> Vec<(&'static str, String)> {
        let Some(report) = &self.report else {
            return Vec::new();
        };
        let now = &report.current;
        let clock = |t: Option<chrono::NaiveTime>| {
            t.map(|t| t.format("%H:%M").to_string())
                .unwrap_or_else(|| PLACEHOLDER.to_string())
        };

        let icon = description_icon(&now.description);

        vec![
            ("City", report.location.display_name()),
            ("Temperature", format!("{}°C", now.temperature)),
            ("Conditions", format!("{} {}", icon, now.description)),
            ("Feels like", format!("{}°C", now.feels_like)),
            ("Humidity", format!("{}%", now.humidity)),
            ("Wind", format!("{} {} km/h", now.wind_direction, now.wind_speed)),
            ("Pressure", format!("{} hPa", now.pressure)),
            ("Sunrise", clock(now.sunrise)),
            ("Sunset", clock(now.sunset)),
        ]
    }

    pub fn forecast_lines(&self) -> Vec<String> {
        self.report
            .as_ref()
            .map(|r| r.forecast.iter().map(forecast_line).collect())
            .unwrap_or_default()
    }

    pub fn detail_rows(&self) -> Vec<(&'static str, String)> {
        let Some(report) = &self.report else {
            return Vec::new();
        };
        let now = &report.current;

        let observed = now
            .observed_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| PLACEHOLDER.to_string());
        let sources = if now.sources.is_empty() {
            PLACEHOLDER.to_string()
        } else {
            now.sources.join(", ")
        };

        vec![
            ("Visibility", format!("{} km", now.visibility)),
            ("Wind direction", now.wind_direction.clone()),
            ("Wind scale", format!("Force {}", now.wind_scale)),
            ("Observed", observed),
            ("Source", sources),
            (
                "Last updated",
                self.updated_at
                    .map(|t| t.format("%H:%M:%S").to_string())
                    .unwrap_or_else(|| PLACEHOLDER.to_string()),
            ),
        ]
    }

    /// Plain-text rendering of the status line and active tab.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.status);
        if self.is_stale {
            out.push_str(" (showing earlier data)");
        }
        out.push('\n');
        out.push_str(&format!("[{}]\n", self.active_tab.title()));

        if !self.has_data() {
            out.push_str(PLACEHOLDER);
            out.push('\n');
            return out;
        }

        match self.active_tab {
            Tab::Current => push_rows(&mut out, &self.current_rows()),
            Tab::Forecast => {
                for line in self.forecast_lines() {
                    out.push_str(&line);
                    out.push('\n');
                }
            }
            Tab::Details => push_rows(&mut out, &self.detail_rows()),
        }
        out
    }
}

fn push_rows(out: &mut String, rows: &[(&'static str, String)]) {
    for (label, value) in rows {
        out.push_str(&format!("{:<16}{}\n", format!("{}:", label), value));
    }
}

fn forecast_line(day: &ForecastDay) -> String {
    format!(
        "{} {}: {} {}, High {}°C, Low {}°C, {} Force {}",
        day.date_label(),
        day.weekday_label(),
        description_icon(&day.day_description),
        day.day_description,
        day.temp_max,
        day.temp_min,
        day.wind_direction,
        day.wind_scale
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use skyview_weather::{ResolvedLocation, WeatherError, WeatherSnapshot};

    fn report(description: &str) -> WeatherReport {
        let day = ForecastDay {
            date: NaiveDate::from_ymd_opt(2025, 7, 29).unwrap(),
            temp_max: 33.0,
            temp_min: 26.0,
            day_description: "雷阵雨".to_string(),
            night_description: "多云".to_string(),
            icon: "302".to_string(),
            wind_direction: "南风".to_string(),
            wind_scale: "1-3".to_string(),
            precipitation: 1.2,
            humidity: 80,
        };
        WeatherReport {
            location: ResolvedLocation {
                id: "101020100".to_string(),
                name: "上海".to_string(),
                admin_area: Some("上海".to_string()),
                country: Some("中国".to_string()),
                latitude: None,
                longitude: None,
            },
            current: WeatherSnapshot {
                temperature: 29.0,
                feels_like: 33.0,
                description: description.to_string(),
                icon: "101".to_string(),
                humidity: 74,
                wind_direction: "东南风".to_string(),
                wind_speed: 14.0,
                wind_scale: "3".to_string(),
                pressure: 1003.0,
                visibility: 20.0,
                sunrise: NaiveTime::from_hms_opt(5, 6, 0),
                sunset: None,
                observed_at: None,
                sources: vec!["QWeather".to_string()],
            },
            forecast: vec![day; 7],
            fetched_at: Utc::now(),
        }
    }

    fn done(result: Result<WeatherReport, WeatherError>) -> WeatherServiceMessage {
        WeatherServiceMessage::FetchDone {
            city: "上海".to_string(),
            result,
        }
    }

    #[test]
    fn test_new_panel_is_loading() {
        let panel = WeatherPanel::new();
        assert!(panel.is_loading());
        assert!(!panel.has_data());
        assert_eq!(panel.status(), "Loading weather data...");
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let mut panel = WeatherPanel::new();
        assert_eq!(panel.submit_search("   "), None);
        assert_eq!(panel.submit_search(" 上海 ").as_deref(), Some("上海"));
        assert_eq!(panel.status(), "Fetching weather for 上海...");
    }

    #[test]
    fn test_success_updates_rows_and_category() {
        let mut panel = WeatherPanel::new();
        let category = panel.apply(done(Ok(report("多云"))));

        assert_eq!(category, Some(ConditionCategory::Cloudy));
        assert!(!panel.is_loading());
        assert!(panel.status().starts_with("Weather updated at"));

        let rows = panel.current_rows();
        assert!(rows.contains(&("Temperature", "29°C".to_string())));
        assert!(rows.contains(&("Conditions", "⛅ 多云".to_string())));
        assert!(rows.contains(&("Wind", "东南风 14 km/h".to_string())));
        assert!(rows.contains(&("Sunrise", "05:06".to_string())));
        assert!(rows.contains(&("Sunset", "--".to_string())));
        assert_eq!(panel.city_label(), "上海");
    }

    #[test]
    fn test_forecast_line_format() {
        let mut panel = WeatherPanel::new();
        panel.apply(done(Ok(report("晴"))));

        let lines = panel.forecast_lines();
        assert_eq!(lines.len(), 7);
        assert_eq!(
            lines[0],
            "07-29 Tuesday: 🌧️ 雷阵雨, High 33°C, Low 26°C, 南风 Force 1-3"
        );
    }

    #[test]
    fn test_error_keeps_previous_data_and_marks_stale() {
        let mut panel = WeatherPanel::new();
        panel.apply(done(Ok(report("多云"))));
        let before = panel.current_rows();

        let category = panel.apply(done(Err(WeatherError::from_api_code("500"))));

        assert_eq!(category, None);
        assert!(panel.is_stale());
        assert_eq!(panel.current_rows(), before);
        assert!(panel.status().starts_with("Error: "));
        assert!(panel.render().contains("showing earlier data"));
    }

    #[test]
    fn test_error_without_data_is_not_stale() {
        let mut panel = WeatherPanel::new();
        panel.apply(done(Err(WeatherError::NotFound("Atlantis".into()))));

        assert!(!panel.is_stale());
        assert!(!panel.has_data());
        assert_eq!(
            panel.error_message(),
            Some("City not found. Check the name and try again.")
        );
    }

    #[test]
    fn test_render_follows_active_tab() {
        let mut panel = WeatherPanel::new();
        panel.apply(done(Ok(report("小雨"))));

        panel.select_tab(Tab::Details);
        let text = panel.render();
        assert!(text.contains("[Details]"));
        assert!(text.contains("20 km"));
        assert!(text.contains("Force 3"));

        panel.select_tab(panel.active_tab().next());
        assert_eq!(panel.active_tab(), Tab::Current);
    }
}
