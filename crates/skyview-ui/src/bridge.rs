//! Service construction from configuration.

use std::time::Duration;

use skyview_core::{Config, SceneConfig, WeatherConfig};
use skyview_weather::{ClientConfig, LocatorConfig};

/// Multi-threaded runtime the poller and locator run on
pub fn build_runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("skyview-tokio")
        .build()
}

pub fn client_config(weather: &WeatherConfig) -> ClientConfig {
    ClientConfig {
        api_key: weather.api_key.clone(),
        api_base_url: weather.api_base_url.clone(),
        geo_base_url: weather.geo_base_url.clone(),
        language: weather.language.clone(),
        timeout: Duration::from_secs(weather.request_timeout_secs),
    }
}

pub fn locator_config(config: &Config) -> LocatorConfig {
    LocatorConfig {
        providers: config.location.providers.clone(),
        attempts_per_provider: config.location.attempts_per_provider,
        timeout: Duration::from_secs(config.location.timeout_secs),
        default_city: config.weather.default_city.clone(),
        ..LocatorConfig::default()
    }
}

pub fn refresh_interval(weather: &WeatherConfig) -> Duration {
    Duration::from_secs(weather.refresh_seconds)
}

pub fn tick_interval(scene: &SceneConfig) -> Duration {
    Duration::from_millis(scene.tick_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_from_defaults() {
        let weather = WeatherConfig {
            api_key: "abc123".to_string(),
            ..WeatherConfig::default()
        };
        let client = client_config(&weather);
        assert_eq!(client.api_key, "abc123");
        assert_eq!(client.language, "zh");
        assert_eq!(client.timeout, Duration::from_secs(10));
        assert!(client.geo_base_url.ends_with("/v2/city"));
    }

    #[test]
    fn test_locator_uses_weather_default_city() {
        let mut config = Config::default();
        config.weather.default_city = "广州".to_string();
        config.location.attempts_per_provider = 2;

        let locator = locator_config(&config);
        assert_eq!(locator.default_city, "广州");
        assert_eq!(locator.attempts_per_provider, 2);
        assert_eq!(locator.providers.len(), 2);
        assert_eq!(locator.timeout, Duration::from_secs(8));
    }

    #[test]
    fn test_intervals() {
        let config = Config::default();
        assert_eq!(refresh_interval(&config.weather), Duration::from_secs(300));
        assert_eq!(tick_interval(&config.scene), Duration::from_millis(60));
    }
}
