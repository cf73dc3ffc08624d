//! QWeather API client.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::api::{
    DailyResponse, GeoLookupResponse, NowResponse, CODE_NOT_FOUND, CODE_NO_DATA, CODE_OK,
};
use crate::error::WeatherError;
use crate::types::{ForecastDay, ResolvedLocation, WeatherReport, WeatherSnapshot, FORECAST_DAYS};

pub const DEFAULT_API_BASE_URL: &str = "https://devapi.qweather.com/v7";
pub const DEFAULT_GEO_BASE_URL: &str = "https://geoapi.qweather.com/v2/city";

/// Everything the client needs; it never reads the environment itself.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub api_base_url: String,
    pub geo_base_url: String,
    /// Response language, `zh` or `en`
    pub language: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            geo_base_url: DEFAULT_GEO_BASE_URL.to_string(),
            language: "zh".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

pub struct WeatherClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl WeatherClient {
    pub fn new(config: ClientConfig) -> Result<Self, WeatherError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("skyview/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    /// Look up the provider location id for a city name.
    #[instrument(skip(self), level = "info")]
    pub async fn resolve_location(&self, city: &str) -> Result<ResolvedLocation, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::NotFound(String::new()));
        }

        let url = format!("{}/lookup", self.config.geo_base_url.trim_end_matches('/'));
        let resp: GeoLookupResponse = self.get_json(&url, city).await?;

        match resp.code.as_str() {
            CODE_OK => {}
            CODE_NO_DATA | CODE_NOT_FOUND => {
                tracing::debug!("Geo lookup for {} returned code {}", city, resp.code);
                return Err(WeatherError::NotFound(city.to_string()));
            }
            code => return Err(WeatherError::from_api_code(code)),
        }

        resp.location
            .into_iter()
            .next()
            .map(ResolvedLocation::from)
            .ok_or_else(|| WeatherError::NotFound(city.to_string()))
    }

    /// Fetch current conditions and the daily forecast for a location id.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch(
        &self,
        location_id: &str,
    ) -> Result<(WeatherSnapshot, Vec<ForecastDay>), WeatherError> {
        let base = self.config.api_base_url.trim_end_matches('/');

        let now_url = format!("{}/weather/now", base);
        let now: NowResponse = self.get_json(&now_url, location_id).await?;
        if now.code != CODE_OK {
            return Err(WeatherError::from_api_code(&now.code));
        }
        let current = now
            .now
            .ok_or_else(|| WeatherError::Malformed("missing `now` object".to_string()))?;

        let daily_url = format!("{}/weather/7d", base);
        let daily: DailyResponse = self.get_json(&daily_url, location_id).await?;
        if daily.code != CODE_OK {
            return Err(WeatherError::from_api_code(&daily.code));
        }
        if daily.daily.len() < FORECAST_DAYS {
            return Err(WeatherError::Malformed(format!(
                "expected {} forecast days, got {}",
                FORECAST_DAYS,
                daily.daily.len()
            )));
        }

        let today = daily.daily.first();
        let snapshot = current.into_snapshot(now.refer.sources, today)?;
        let forecast = daily
            .daily
            .into_iter()
            .take(FORECAST_DAYS)
            .map(ForecastDay::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            "Weather for {}: {}°C {}",
            location_id,
            snapshot.temperature,
            snapshot.description
        );
        Ok((snapshot, forecast))
    }

    /// Resolve a city and fetch its weather.
    pub async fn fetch_city(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        let location = self.resolve_location(city).await?;
        let (current, forecast) = self.fetch(&location.id).await?;
        Ok(WeatherReport {
            location,
            current,
            forecast,
            fetched_at: chrono::Utc::now(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        location: &str,
    ) -> Result<T, WeatherError> {
        let response = self
            .client
            .get(url)
            .query(&[
                ("location", location),
                ("key", self.config.api_key.as_str()),
                ("lang", self.config.language.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("QWeather request to {} failed with HTTP {}", url, status);
            return Err(WeatherError::from_api_code(status.as_str()));
        }

        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| WeatherError::Malformed(format!("JSON parse error: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::ConditionCategory;
    use serde_json::{json, Value};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> WeatherClient {
        WeatherClient::new(ClientConfig {
            api_key: "test-key".to_string(),
            api_base_url: format!("{}/v7", server.uri()),
            geo_base_url: format!("{}/v2/city", server.uri()),
            language: "zh".to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    fn geo_body() -> Value {
        json!({
            "code": "200",
            "location": [{
                "name": "上海",
                "id": "101020100",
                "lat": "31.23171",
                "lon": "121.47264",
                "adm2": "上海",
                "adm1": "上海市",
                "country": "中国"
            }]
        })
    }

    fn now_body() -> Value {
        json!({
            "code": "200",
            "updateTime": "2025-07-29T19:20+08:00",
            "now": {
                "obsTime": "2025-07-29T19:16+08:00",
                "temp": "29",
                "feelsLike": "33",
                "icon": "101",
                "text": "多云",
                "windDir": "东南风",
                "windScale": "3",
                "windSpeed": "14",
                "humidity": "74",
                "pressure": "1003",
                "vis": "20"
            },
            "refer": { "sources": ["QWeather"], "license": ["QWeather Developers License"] }
        })
    }

    fn daily_body(days: usize) -> Value {
        let daily: Vec<Value> = (0..days)
            .map(|i| {
                json!({
                    "fxDate": format!("2025-07-{:02}", 29 + i as u32 % 3),
                    "sunrise": "05:06",
                    "sunset": "18:57",
                    "tempMax": "33",
                    "tempMin": "26",
                    "iconDay": "302",
                    "textDay": "雷阵雨",
                    "textNight": "多云",
                    "windDirDay": "南风",
                    "windScaleDay": "1-3",
                    "precip": "1.2",
                    "humidity": "80"
                })
            })
            .collect();
        json!({ "code": "200", "daily": daily })
    }

    async fn mount_json(server: &MockServer, route: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_fetch_city_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/city/lookup"))
            .and(query_param("location", "Shanghai"))
            .and(query_param("key", "test-key"))
            .and(query_param("lang", "zh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(geo_body()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v7/weather/now"))
            .and(query_param("location", "101020100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(now_body()))
            .mount(&server)
            .await;
        mount_json(&server, "/v7/weather/7d", daily_body(7)).await;

        let report = client_for(&server).fetch_city("Shanghai").await.unwrap();

        assert_eq!(report.location.name, "上海");
        assert_eq!(report.current.temperature, 29.0);
        assert_eq!(report.current.description, "多云");
        assert_eq!(report.current.category(), ConditionCategory::Cloudy);
        assert_eq!(
            report.current.sunrise,
            chrono::NaiveTime::from_hms_opt(5, 6, 0)
        );
        assert_eq!(report.forecast.len(), FORECAST_DAYS);
        assert_eq!(
            report.forecast[0].category(),
            ConditionCategory::Thunderstorm
        );
    }

    #[tokio::test]
    async fn test_extra_forecast_days_are_truncated() {
        let server = MockServer::start().await;
        mount_json(&server, "/v7/weather/now", now_body()).await;
        mount_json(&server, "/v7/weather/7d", daily_body(10)).await;

        let (_, forecast) = client_for(&server).fetch("101020100").await.unwrap();
        assert_eq!(forecast.len(), FORECAST_DAYS);
    }

    #[tokio::test]
    async fn test_short_forecast_is_malformed() {
        let server = MockServer::start().await;
        mount_json(&server, "/v7/weather/now", now_body()).await;
        mount_json(&server, "/v7/weather/7d", daily_body(3)).await;

        let err = client_for(&server).fetch("101020100").await.unwrap_err();
        assert!(matches!(err, WeatherError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_error_code_in_body() {
        let server = MockServer::start().await;
        mount_json(&server, "/v7/weather/now", json!({ "code": "401" })).await;

        let err = client_for(&server).fetch("101020100").await.unwrap_err();
        match err {
            WeatherError::Api { code, .. } => assert_eq!(code, "401"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_http_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v7/weather/now"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch("101020100").await.unwrap_err();
        assert!(matches!(err, WeatherError::Api { ref code, .. } if code == "500"));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let server = MockServer::start().await;
        let truncated = r#"{"code": "200", "now": "#;
        Mock::given(method("GET"))
            .and(path("/v7/weather/now"))
            .respond_with(ResponseTemplate::new(200).set_body_string(truncated))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch("101020100").await.unwrap_err();
        assert!(matches!(err, WeatherError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_unknown_city() {
        let server = MockServer::start().await;
        mount_json(&server, "/v2/city/lookup", json!({ "code": "404" })).await;

        let err = client_for(&server)
            .resolve_location("Atlantis")
            .await
            .unwrap_err();
        assert!(matches!(err, WeatherError::NotFound(ref city) if city == "Atlantis"));
    }

    #[tokio::test]
    async fn test_geo_lookup_with_bad_key_is_api_error() {
        let server = MockServer::start().await;
        mount_json(&server, "/v2/city/lookup", json!({ "code": "401" })).await;

        let err = client_for(&server)
            .fetch_city("Shanghai")
            .await
            .unwrap_err();
        match err {
            WeatherError::Api { ref code, .. } => assert_eq!(code, "401"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_geo_lookup_quota_exceeded_is_api_error() {
        let server = MockServer::start().await;
        mount_json(&server, "/v2/city/lookup", json!({ "code": "402" })).await;

        let err = client_for(&server)
            .resolve_location("Shanghai")
            .await
            .unwrap_err();
        assert!(matches!(err, WeatherError::Api { ref code, .. } if code == "402"));
    }

    #[tokio::test]
    async fn test_geo_lookup_no_data_is_not_found() {
        let server = MockServer::start().await;
        mount_json(&server, "/v2/city/lookup", json!({ "code": "204" })).await;

        let err = client_for(&server)
            .resolve_location("Atlantis")
            .await
            .unwrap_err();
        assert!(matches!(err, WeatherError::NotFound(ref city) if city == "Atlantis"));
    }

    #[tokio::test]
    async fn test_empty_location_list_is_not_found() {
        let server = MockServer::start().await;
        let body = json!({ "code": "200", "location": [] });
        mount_json(&server, "/v2/city/lookup", body).await;

        let err = client_for(&server)
            .resolve_location("Nowhere")
            .await
            .unwrap_err();
        assert!(matches!(err, WeatherError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_blank_city_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(geo_body()))
            .expect(0)
            .mount(&server)
            .await;

        let err = client_for(&server)
            .resolve_location("   ")
            .await
            .unwrap_err();
        assert!(matches!(err, WeatherError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let client = WeatherClient::new(ClientConfig {
            api_base_url: "http://127.0.0.1:1/v7".to_string(),
            geo_base_url: "http://127.0.0.1:1/v2/city".to_string(),
            ..ClientConfig::new("test-key")
        })
        .unwrap();

        let err = client.fetch("101020100").await.unwrap_err();
        assert!(matches!(err, WeatherError::Network(_)));
        assert!(err.is_retryable());
    }
}
