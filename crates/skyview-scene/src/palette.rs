//! Per-condition colours: sky gradient, light, ground.

use skyview_weather::ConditionCategory;

use crate::frame::Color;

/// Shown where no sky box is drawn
pub const CLEAR_COLOR: Color = Color::rgba(0.5, 0.7, 0.9, 1.0);

pub const GRASS: Color = Color::rgb(0.3, 0.6, 0.2);
pub const SNOW_GROUND: Color = Color::rgb(0.9, 0.95, 1.0);

type Rgb = (f32, f32, f32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyGradient {
    pub top: Color,
    pub bottom: Color,
    pub sides: Color,
}

impl SkyGradient {
    /// `None` for categories that draw no sky box.
    pub fn for_category(category: ConditionCategory) -> Option<Self> {
        use ConditionCategory::*;

        let (top, bottom, sides): (Rgb, Rgb, Rgb) = match category {
            Clear => (
                (0.529, 0.808, 0.922),
                (0.137, 0.412, 0.557),
                (0.341, 0.624, 0.812),
            ),
            Rain | Thunderstorm => ((0.5, 0.5, 0.6), (0.3, 0.3, 0.4), (0.4, 0.4, 0.5)),
            Cloudy | Overcast => ((0.7, 0.75, 0.8), (0.5, 0.55, 0.6), (0.6, 0.65, 0.7)),
            Snow => ((0.8, 0.9, 1.0), (0.6, 0.7, 0.8), (0.7, 0.8, 0.9)),
            Fog | Wind | Unknown => return None,
        };

        let c = |(r, g, b): Rgb| Color::rgb(r, g, b);
        Some(Self {
            top: c(top),
            bottom: c(bottom),
            sides: c(sides),
        })
    }
}

/// Diffuse colour of the single directional light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSetting {
    pub diffuse: Color,
}

impl Default for LightSetting {
    fn default() -> Self {
        Self {
            diffuse: Color::rgb(0.8, 0.8, 0.8),
        }
    }
}

impl LightSetting {
    /// Light for a category, or `None` to keep the current one.
    pub fn for_category(category: ConditionCategory) -> Option<Self> {
        use ConditionCategory::*;

        let diffuse = match category {
            Clear => Color::rgb(1.0, 1.0, 0.9),
            Cloudy | Overcast => Color::rgb(0.7, 0.7, 0.7),
            Rain | Thunderstorm | Snow => Color::rgb(0.5, 0.5, 0.6),
            Fog | Wind | Unknown => return None,
        };
        Some(Self { diffuse })
    }
}

pub fn ground_color(category: ConditionCategory) -> Color {
    if category == ConditionCategory::Snow {
        SNOW_GROUND
    } else {
        GRASS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rain_and_thunder_share_grey_sky() {
        let rain = SkyGradient::for_category(ConditionCategory::Rain);
        let thunder = SkyGradient::for_category(ConditionCategory::Thunderstorm);
        assert!(rain.is_some());
        assert_eq!(rain, thunder);
    }

    #[test]
    fn test_no_sky_for_fog() {
        let fog = SkyGradient::for_category(ConditionCategory::Fog);
        let unknown = SkyGradient::for_category(ConditionCategory::Unknown);
        assert!(fog.is_none());
        assert!(unknown.is_none());
    }

    #[test]
    fn test_light_keeps_previous_for_unlisted() {
        let wind = LightSetting::for_category(ConditionCategory::Wind);
        assert!(wind.is_none());
        assert_eq!(
            LightSetting::for_category(ConditionCategory::Snow).map(|l| l.diffuse),
            Some(Color::rgb(0.5, 0.5, 0.6))
        );
    }

    #[test]
    fn test_ground() {
        assert_eq!(ground_color(ConditionCategory::Snow), SNOW_GROUND);
        assert_eq!(ground_color(ConditionCategory::Rain), GRASS);
    }
}
