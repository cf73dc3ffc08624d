//! Scene state and per-tick advance.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use skyview_weather::ConditionCategory;

use crate::entity::{Cloud, Raindrop, Snowflake, Sun, GROUND_Y};
use crate::frame::{Color, DrawCommand, Frame};
use crate::palette::{ground_color, LightSetting, SkyGradient, CLEAR_COLOR};

pub const CLOUD_COUNT: usize = 7;
pub const RAINDROP_COUNT: usize = 100;
pub const SNOWFLAKE_COUNT: usize = 100;

const GROUND_RADIUS: f32 = 5.0;
const GROUND_SCALE: f32 = 5.0;

/// Owns every animated entity. Lives on the UI thread.
pub struct SceneAnimator {
    category: ConditionCategory,
    sky: Option<SkyGradient>,
    light: LightSetting,
    ground: Color,
    sun: Sun,
    clouds: Vec<Cloud>,
    raindrops: Vec<Raindrop>,
    snowflakes: Vec<Snowflake>,
    rng: StdRng,
}

impl SceneAnimator {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Reproducible scene for tests and previews
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(mut rng: StdRng) -> Self {
        let clouds = (0..CLOUD_COUNT).map(|_| Cloud::spawn(&mut rng)).collect();
        let raindrops = (0..RAINDROP_COUNT).map(|_| Raindrop::spawn(&mut rng)).collect();
        let snowflakes = (0..SNOWFLAKE_COUNT).map(|_| Snowflake::spawn(&mut rng)).collect();

        let mut scene = Self {
            category: ConditionCategory::Unknown,
            sky: None,
            light: LightSetting::default(),
            ground: ground_color(ConditionCategory::Unknown),
            sun: Sun::default(),
            clouds,
            raindrops,
            snowflakes,
            rng,
        };
        scene.set_condition(ConditionCategory::Clear);
        scene
    }

    pub fn condition(&self) -> ConditionCategory {
        self.category
    }

    /// Switch sky, light, ground and active pools.
    pub fn set_condition(&mut self, category: ConditionCategory) {
        if category != self.category {
            tracing::debug!(
                "Scene condition {} -> {}",
                self.category.label(),
                category.label()
            );
        }
        self.category = category;
        self.sky = SkyGradient::for_category(category);
        if let Some(light) = LightSetting::for_category(category) {
            self.light = light;
        }
        self.ground = ground_color(category);
    }

    pub fn clouds_active(&self) -> bool {
        matches!(
            self.category,
            ConditionCategory::Clear | ConditionCategory::Cloudy | ConditionCategory::Overcast
        )
    }

    pub fn rain_active(&self) -> bool {
        self.category.is_rain_class()
    }

    pub fn snow_active(&self) -> bool {
        self.category == ConditionCategory::Snow
    }

    /// Advance active pools one step and place the sun for `hour` (0..24).
    pub fn tick(&mut self, hour: f32) {
        self.sun.set_hour(hour);

        let (clouds, rain, snow) = (self.clouds_active(), self.rain_active(), self.snow_active());
        let rng = &mut self.rng;
        if clouds {
            self.clouds.iter_mut().for_each(|c| c.advance(rng));
        }
        if rain {
            self.raindrops.iter_mut().for_each(|r| r.advance(rng));
        }
        if snow {
            self.snowflakes.iter_mut().for_each(|s| s.advance(rng));
        }
    }

    pub fn frame(&self) -> Frame {
        let mut commands = Vec::new();

        if let Some(sky) = self.sky {
            commands.push(DrawCommand::SkyBox {
                top: sky.top,
                bottom: sky.bottom,
                sides: sky.sides,
            });
        }

        self.sun.draw(&mut commands);

        if self.clouds_active() {
            self.clouds.iter().for_each(|c| c.draw(&mut commands));
        }
        if self.rain_active() {
            self.raindrops.iter().for_each(|r| r.draw(&mut commands));
        }
        if self.snow_active() {
            self.snowflakes.iter().for_each(|s| s.draw(&mut commands));
        }

        commands.push(DrawCommand::Disk {
            center: Vec3::new(0.0, GROUND_Y, 0.0),
            radius: GROUND_RADIUS,
            scale: GROUND_SCALE,
            color: self.ground,
        });

        Frame {
            clear_color: CLEAR_COLOR,
            light_diffuse: self.light.diffuse,
            commands,
        }
    }

    pub fn sun(&self) -> &Sun {
        &self.sun
    }

    pub fn clouds(&self) -> &[Cloud] {
        &self.clouds
    }

    pub fn raindrops(&self) -> &[Raindrop] {
        &self.raindrops
    }

    pub fn snowflakes(&self) -> &[Snowflake] {
        &self.snowflakes
    }
}

impl Default for SceneAnimator {
    fn default() -> Self {
        Self::new()
    }
}
