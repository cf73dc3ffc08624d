//! Coarse weather classification from free-text descriptions.
//!
//! The provider returns a localized description ("多云", "Light Rain") rather
//! than a stable enum, so the category is recovered by ordered substring
//! matching. The first rule with a matching keyword wins; rule order is part
//! of the behavior ("晴" before "雨" before "云" before "雪").

use serde::{Deserialize, Serialize};

/// Weather condition categories that select scene rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConditionCategory {
    Clear,
    Cloudy,
    Overcast,
    Rain,
    Thunderstorm,
    Snow,
    Fog,
    Wind,
    /// No keyword matched
    #[default]
    Unknown,
}

/// Ordered keyword table. Chinese keywords match `lang=zh` responses,
/// lowercase English ones match `lang=en`.
const RULES: &[(ConditionCategory, &[&str])] = &[
    (ConditionCategory::Clear, &["晴", "sunny", "clear"]),
    (ConditionCategory::Thunderstorm, &["雷阵", "thunder"]),
    // Dust keywords precede rain so "Sandstorm" is not taken for a storm
    (ConditionCategory::Fog, &["沙", "尘", "sand", "dust"]),
    (ConditionCategory::Rain, &["雨", "rain", "drizzle", "storm"]),
    (ConditionCategory::Cloudy, &["云", "cloud"]),
    (ConditionCategory::Overcast, &["阴", "overcast"]),
    (ConditionCategory::Snow, &["雪", "snow", "sleet"]),
    (ConditionCategory::Fog, &["雾", "霾", "fog", "haze", "mist"]),
    (ConditionCategory::Wind, &["风", "wind", "gale"]),
];

impl ConditionCategory {
    /// Classify a description. Total: unmatched text is `Unknown`.
    pub fn classify(description: &str) -> Self {
        let lowered = description.to_lowercase();
        RULES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
            .map(|(category, _)| *category)
            .unwrap_or_default()
    }

    /// Rain-class conditions render the raindrop pool
    pub fn is_rain_class(&self) -> bool {
        matches!(self, Self::Rain | Self::Thunderstorm)
    }

    /// Stable lowercase label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Cloudy => "cloudy",
            Self::Overcast => "overcast",
            Self::Rain => "rain",
            Self::Thunderstorm => "thunderstorm",
            Self::Snow => "snow",
            Self::Fog => "fog",
            Self::Wind => "wind",
            Self::Unknown => "unknown",
        }
    }
}

/// Panel icons, checked in order against the description. Independent of
/// [`RULES`]: "雨" precedes "雷阵雨", so a thunder shower shows rain.
const ICONS: &[(&str, &str)] = &[
    ("晴", "☀️"),
    ("sunny", "☀️"),
    ("多云", "⛅"),
    ("cloudy", "⛅"),
    ("阴", "☁️"),
    ("overcast", "☁️"),
    ("雨", "🌧️"),
    ("rain", "🌧️"),
    ("雷阵雨", "⛈️"),
    ("thunder", "⛈️"),
    ("雪", "❄️"),
    ("snow", "❄️"),
    ("雾", "🌫️"),
    ("fog", "🌫️"),
    ("风", "💨"),
    ("wind", "💨"),
];

const DEFAULT_ICON: &str = "☀️";

/// Emoji shown next to a description in the panel
pub fn description_icon(description: &str) -> &'static str {
    let lowered = description.to_lowercase();
    ICONS
        .iter()
        .find(|(key, _)| lowered.contains(key))
        .map_or(DEFAULT_ICON, |(_, icon)| *icon)
}
