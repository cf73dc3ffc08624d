//! QWeather wire types and their normalization into domain types.
//!
//! The provider encodes every numeric value as a JSON string, so fields are
//! parsed here and a field that fails to parse is a malformed response.

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use serde::Deserialize;

use crate::error::WeatherError;
use crate::types::{ForecastDay, ResolvedLocation, WeatherSnapshot};

/// Body `code` for a successful request
pub(crate) const CODE_OK: &str = "200";
pub(crate) const CODE_NO_DATA: &str = "204";
pub(crate) const CODE_NOT_FOUND: &str = "404";

#[derive(Debug, Deserialize)]
pub(crate) struct GeoLookupResponse {
    pub code: String,
    #[serde(default)]
    pub location: Vec<GeoLocation>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeoLocation {
    pub id: String,
    pub name: String,
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub adm1: Option<String>,
    pub country: Option<String>,
}

impl From<GeoLocation> for ResolvedLocation {
    fn from(geo: GeoLocation) -> Self {
        Self {
            id: geo.id,
            name: geo.name,
            admin_area: geo.adm1,
            country: geo.country,
            latitude: geo.lat.as_deref().and_then(|s| s.parse().ok()),
            longitude: geo.lon.as_deref().and_then(|s| s.parse().ok()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct NowResponse {
    pub code: String,
    pub now: Option<NowBody>,
    #[serde(default)]
    pub refer: Refer,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Refer {
    #[serde(default)]
    pub sources: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NowBody {
    pub obs_time: String,
    pub temp: String,
    pub feels_like: String,
    pub icon: String,
    pub text: String,
    pub wind_dir: String,
    pub wind_scale: String,
    pub wind_speed: String,
    pub humidity: String,
    pub pressure: String,
    pub vis: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DailyResponse {
    pub code: String,
    #[serde(default)]
    pub daily: Vec<DailyBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DailyBody {
    pub fx_date: String,
    #[serde(default)]
    pub sunrise: Option<String>,
    #[serde(default)]
    pub sunset: Option<String>,
    pub temp_max: String,
    pub temp_min: String,
    pub icon_day: String,
    pub text_day: String,
    pub text_night: String,
    pub wind_dir_day: String,
    pub wind_scale_day: String,
    pub precip: String,
    pub humidity: String,
}

/// Parse a string-encoded field, naming it in the error.
fn parse_field<T: FromStr>(name: &str, value: &str) -> Result<T, WeatherError> {
    value
        .trim()
        .parse()
        .map_err(|_| malformed_field(name, value))
}

fn malformed_field(name: &str, value: &str) -> WeatherError {
    WeatherError::Malformed(format!("field `{}` has invalid value {:?}", name, value))
}

/// "05:18" -> 05:18. Blank (polar day/night) means no event.
fn parse_clock(value: Option<&str>) -> Option<NaiveTime> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| NaiveTime::parse_from_str(v, "%H:%M").ok())
}

/// "2025-07-29T19:16+08:00"
fn parse_observation_time(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M%:z")
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .ok()
}

impl NowBody {
    /// Build the snapshot; sunrise/sunset come from today's forecast entry.
    pub fn into_snapshot(
        self,
        sources: Vec<String>,
        today: Option<&DailyBody>,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let observed_at = parse_observation_time(&self.obs_time);
        if observed_at.is_none() {
            tracing::debug!("Unparseable observation time: {}", self.obs_time);
        }

        Ok(WeatherSnapshot {
            temperature: parse_field("now.temp", &self.temp)?,
            feels_like: parse_field("now.feelsLike", &self.feels_like)?,
            description: self.text,
            icon: self.icon,
            humidity: parse_field("now.humidity", &self.humidity)?,
            wind_direction: self.wind_dir,
            wind_speed: parse_field("now.windSpeed", &self.wind_speed)?,
            wind_scale: self.wind_scale,
            pressure: parse_field("now.pressure", &self.pressure)?,
            visibility: parse_field("now.vis", &self.vis)?,
            sunrise: today.and_then(|d| parse_clock(d.sunrise.as_deref())),
            sunset: today.and_then(|d| parse_clock(d.sunset.as_deref())),
            observed_at,
            sources,
        })
    }
}

impl TryFrom<DailyBody> for ForecastDay {
    type Error = WeatherError;

    fn try_from(day: DailyBody) -> Result<Self, Self::Error> {
        let date = NaiveDate::parse_from_str(&day.fx_date, "%Y-%m-%d")
            .map_err(|_| malformed_field("daily.fxDate", &day.fx_date))?;

        Ok(Self {
            date,
            temp_max: parse_field("daily.tempMax", &day.temp_max)?,
            temp_min: parse_field("daily.tempMin", &day.temp_min)?,
            day_description: day.text_day,
            night_description: day.text_night,
            icon: day.icon_day,
            wind_direction: day.wind_dir_day,
            wind_scale: day.wind_scale_day,
            precipitation: parse_field("daily.precip", &day.precip)?,
            humidity: parse_field("daily.humidity", &day.humidity)?,
        })
    }
}
