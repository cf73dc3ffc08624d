use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable that overrides `weather.api_key`
pub const API_KEY_ENV: &str = "QWEATHER_KEY";

/// Value shipped in a fresh config; the weather API rejects it
pub const API_KEY_PLACEHOLDER: &str = "[Your_Qweather_API_KEY]";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Weather API settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// IP geolocation settings
    #[serde(default)]
    pub location: LocationConfig,

    /// 3D scene settings
    #[serde(default)]
    pub scene: SceneConfig,

    /// Window preferences
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// QWeather API key. `QWEATHER_KEY` takes precedence when set.
    pub api_key: String,

    /// Base URL for the now/7d endpoints
    pub api_base_url: String,

    /// Base URL for the city lookup endpoint
    pub geo_base_url: String,

    /// Response language passed as `lang`
    pub language: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Automatic refresh interval in seconds
    pub refresh_seconds: u64,

    /// City shown when IP geolocation fails
    pub default_city: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: API_KEY_PLACEHOLDER.to_string(),
            api_base_url: "https://devapi.qweather.com/v7".to_string(),
            geo_base_url: "https://geoapi.qweather.com/v2/city".to_string(),
            language: "zh".to_string(),
            request_timeout_secs: 10,
            refresh_seconds: 300,
            default_city: "北京".to_string(),
        }
    }
}

impl WeatherConfig {
    /// Check if the API key is set (not the placeholder)
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty() && self.api_key != API_KEY_PLACEHOLDER
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// IP geolocation endpoints, tried in order
    pub providers: Vec<String>,

    /// Attempts per provider before falling through
    pub attempts_per_provider: u32,

    /// Per-attempt timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            providers: vec![
                "https://ipinfo.io/json".to_string(),
                "https://ip.cn/json".to_string(),
            ],
            attempts_per_provider: 3,
            timeout_secs: 8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Animation timer period in milliseconds
    pub tick_millis: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self { tick_millis: 60 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Window width
    pub window_width: u32,

    /// Window height
    pub window_height: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_width: 1200,
            window_height: 800,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skyview");

        Self {
            config_dir,
            weather: WeatherConfig::default(),
            location: LocationConfig::default(),
            scene: SceneConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist.
    ///
    /// Environment overrides are applied after reading and are never
    /// written back to disk.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a specific path, creating a default file there
    /// if it doesn't exist.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let mut config = Self::default();
            if let Some(parent) = config_path.parent() {
                config.config_dir = parent.to_path_buf();
            }
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(config_path)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents)
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Apply environment overrides using the given lookup function.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            tracing::info!(
                "Using weather API key from {} environment variable",
                API_KEY_ENV
            );
            self.weather.api_key = key;
        }
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(
            &self.weather.api_base_url,
            "weather.api_base_url",
            &mut result,
        );
        self.validate_url(
            &self.weather.geo_base_url,
            "weather.geo_base_url",
            &mut result,
        );

        if !self.weather.has_api_key() {
            result.add_warning(
                "weather.api_key",
                format!(
                    "No API key configured - set {} to fetch weather",
                    API_KEY_ENV
                ),
            );
        }

        if self.weather.language.trim().is_empty() {
            result.add_error("weather.language", "Language must not be empty");
        }

        if self.weather.request_timeout_secs == 0 {
            result.add_error(
                "weather.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        }

        if self.weather.refresh_seconds == 0 {
            result.add_error(
                "weather.refresh_seconds",
                "Refresh interval must be greater than 0",
            );
        } else if self.weather.refresh_seconds > 86_400 {
            result.add_warning(
                "weather.refresh_seconds",
                "Weather refresh interval is more than 24 hours",
            );
        }

        if self.weather.default_city.trim().is_empty() {
            result.add_error("weather.default_city", "Default city must not be empty");
        }

        if self.location.providers.is_empty() {
            result.add_error("location.providers", "At least one IP provider is required");
        }
        for (i, provider) in self.location.providers.iter().enumerate() {
            self.validate_url(provider, &format!("location.providers[{}]", i), &mut result);
        }

        if self.location.attempts_per_provider == 0 {
            result.add_error(
                "location.attempts_per_provider",
                "Each provider needs at least one attempt",
            );
        }

        if self.location.timeout_secs == 0 {
            result.add_error("location.timeout_secs", "Timeout must be greater than 0");
        }

        if self.scene.tick_millis == 0 {
            result.add_error("scene.tick_millis", "Animation tick must be greater than 0");
        } else if self.scene.tick_millis > 1000 {
            result.add_warning(
                "scene.tick_millis",
                "Animation tick above one second will look choppy",
            );
        }

        if self.ui.window_width == 0 {
            result.add_error("ui.window_width", "Window width must be greater than 0");
        }

        if self.ui.window_height == 0 {
            result.add_error("ui.window_height", "Window height must be greater than 0");
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        std::fs::write(config_path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("skyview");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        // Default config should be valid (only warnings, no errors)
        assert!(
            result.is_valid(),
            "Default config should be valid: {:?}",
            result.errors
        );
    }

    #[test]
    fn test_placeholder_api_key_is_warning() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "weather.api_key"));
    }

    #[test]
    fn test_env_override_replaces_api_key() {
        let mut config = Config::default();
        let lookup = |key: &str| (key == API_KEY_ENV).then(|| "abc123".to_string());
        config.apply_env_overrides(lookup);
        assert_eq!(config.weather.api_key, "abc123");
        assert!(config.weather.has_api_key());
    }

    #[test]
    fn test_blank_env_override_is_ignored() {
        let mut config = Config::default();
        config.apply_env_overrides(|_| Some("   ".to_string()));
        assert_eq!(config.weather.api_key, API_KEY_PLACEHOLDER);
    }

    #[test]
    fn test_invalid_url() {
        let mut config = Config::default();
        config.weather.api_base_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        let errors = &result.errors;
        assert!(errors.iter().any(|e| e.field == "weather.api_base_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.location.providers = vec!["ftp://ipinfo.io/json".to_string()];
        let result = config.validate();
        assert!(!result.is_valid());
        let errors = &result.errors;
        assert!(errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_zero_refresh_interval_is_error() {
        let mut config = Config::default();
        config.weather.refresh_seconds = 0;
        let result = config.validate();
        assert!(!result.is_valid());
        let errors = &result.errors;
        assert!(errors.iter().any(|e| e.field == "weather.refresh_seconds"));
    }

    #[test]
    fn test_empty_provider_list_is_error() {
        let mut config = Config::default();
        config.location.providers.clear();
        let result = config.validate();
        let errors = &result.errors;
        assert!(errors.iter().any(|e| e.field == "location.providers"));
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config::load_from(&path).unwrap();

        assert!(path.exists());
        assert_eq!(config.config_dir, dir.path());
        assert_eq!(config.weather.refresh_seconds, 300);
        assert_eq!(config.scene.tick_millis, 60);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "config_dir = \"/tmp/skyview\"\n\n[weather]\ndefault_city = \"Shanghai\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.weather.default_city, "Shanghai");
        assert_eq!(config.weather.language, "zh");
        assert_eq!(config.location.attempts_per_provider, 3);
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
