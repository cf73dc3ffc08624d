//! Animated scene entities.
//!
//! Entities are never destroyed. When one leaves the visible volume it is
//! reset in place to a fresh spawn position.

use std::ops::Range;

use glam::{Quat, Vec3};
use rand::Rng;

use crate::frame::{Color, DrawCommand};

// Spawn volume for clouds
pub const CLOUD_X: Range<f32> = -2.0..2.0;
pub const CLOUD_Y: Range<f32> = 0.3..0.8;
pub const CLOUD_Z: Range<f32> = -1.0..1.0;
pub const CLOUD_SIZE: Range<f32> = 0.1..0.45;
/// Clouds drifting past this x re-enter at `CLOUD_REENTRY_X`
pub const CLOUD_EXIT_X: f32 = -2.0;
pub const CLOUD_REENTRY_X: f32 = 2.0;

// Spawn volume for precipitation
pub const PRECIP_X: Range<f32> = -1.5..1.5;
pub const PRECIP_Y: Range<f32> = 0.5..1.5;
pub const PRECIP_Z: Range<f32> = -1.0..1.0;
/// Ground level; precipitation below it respawns
pub const GROUND_Y: f32 = -1.0;

const RAIN_COLOR: Color = Color::rgb(0.5, 0.7, 0.9);
const RAIN_WIDTH: f32 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Cloud {
    pub position: Vec3,
    pub size: f32,
    /// Degrees about Y
    pub rotation: f32,
}

impl Cloud {
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            position: Vec3::new(
                rng.random_range(CLOUD_X),
                rng.random_range(CLOUD_Y),
                rng.random_range(CLOUD_Z),
            ),
            size: rng.random_range(CLOUD_SIZE),
            rotation: 0.0,
        }
    }

    /// Larger clouds drift faster
    pub fn speed(&self) -> f32 {
        0.001 + self.size * 0.002
    }

    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.position.x -= self.speed();
        self.rotation += 0.01;

        if self.position.x < CLOUD_EXIT_X {
            self.position = Vec3::new(
                CLOUD_REENTRY_X,
                rng.random_range(CLOUD_Y),
                rng.random_range(CLOUD_Z),
            );
        }
    }

    /// Five overlapping spheres, offsets in the cloud's rotated frame.
    pub fn draw(&self, out: &mut Vec<DrawCommand>) {
        let s = self.size;
        let puffs = [
            (Vec3::ZERO, 0.4),
            (Vec3::new(0.3 * s, 0.0, 0.0), 0.3),
            (Vec3::new(-0.3 * s, 0.0, 0.0), 0.35),
            (Vec3::new(-0.1 * s, 0.2 * s, 0.0), 0.3),
            (Vec3::new(-0.1 * s, -0.2 * s, 0.0), 0.25),
        ];
        let rotation = Quat::from_rotation_y(self.rotation.to_radians());

        out.extend(puffs.iter().map(|(offset, scale)| DrawCommand::Sphere {
            center: self.position + rotation * *offset,
            radius: s * scale,
            color: Color::WHITE,
            emissive: false,
        }));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Raindrop {
    pub position: Vec3,
    pub length: f32,
    pub speed: f32,
}

impl Raindrop {
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            position: precip_spawn(rng),
            length: rng.random_range(0.03..0.08),
            speed: rng.random_range(0.01..0.03),
        }
    }

    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.position.y -= self.speed;
        if self.position.y < GROUND_Y {
            *self = Self::spawn(rng);
        }
    }

    pub fn draw(&self, out: &mut Vec<DrawCommand>) {
        out.push(DrawCommand::Line {
            from: self.position,
            to: self.position - Vec3::Y * self.length,
            color: RAIN_COLOR,
            width: RAIN_WIDTH,
        });
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snowflake {
    pub position: Vec3,
    pub size: f32,
    pub speed: f32,
    /// Degrees about Y
    pub rotation: f32,
    /// Degrees per tick
    pub rotation_speed: f32,
}

impl Snowflake {
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            position: precip_spawn(rng),
            size: rng.random_range(0.01..0.03),
            speed: rng.random_range(0.005..0.015),
            rotation: rng.random_range(0.0..360.0),
            rotation_speed: rng.random_range(-1.0..1.0),
        }
    }

    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.position.y -= self.speed;
        // sway
        self.position.x += (self.position.y * 2.0).sin() * 0.005;
        self.rotation += self.rotation_speed;

        if self.position.y < GROUND_Y {
            *self = Self::spawn(rng);
        }
    }

    pub fn draw(&self, out: &mut Vec<DrawCommand>) {
        out.push(DrawCommand::Hexagon {
            center: self.position,
            radius: self.size,
            rotation_deg: self.rotation,
            color: Color::WHITE,
        });
    }
}

fn precip_spawn<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    Vec3::new(
        rng.random_range(PRECIP_X),
        rng.random_range(PRECIP_Y),
        rng.random_range(PRECIP_Z),
    )
}

/// The sun on a fixed arc, positioned by hour of day
#[derive(Debug, Clone, PartialEq)]
pub struct Sun {
    /// Degrees from the zenith
    pub angle: f32,
    pub radius: f32,
    pub size: f32,
}

impl Default for Sun {
    fn default() -> Self {
        Self {
            angle: 0.0,
            radius: 1.2,
            size: 0.2,
        }
    }
}

impl Sun {
    /// Height below which the sun is not drawn
    pub const HORIZON: f32 = -0.3;
    /// Lowest height the sun is placed at
    pub const FLOOR: f32 = -0.5;
    /// Depth of the arc in front of the camera
    pub const DEPTH: f32 = -1.0;

    const CORE: Color = Color::rgb(1.0, 0.8, 0.0);
    const GLOW: [(f32, f32); 2] = [(1.5, 0.3), (2.0, 0.1)];

    /// 15 degrees per hour, zero at noon. `hour` may be fractional.
    ///
    /// Without the 12 hour offset, `(hour % 24) * 15` would put the zenith at
    /// midnight and hide the sun at noon.
    pub fn set_hour(&mut self, hour: f32) {
        self.angle = (hour.rem_euclid(24.0) - 12.0) * 15.0;
    }

    /// (x, y) on the arc, y clamped to `FLOOR`
    pub fn position(&self) -> (f32, f32) {
        let rad = self.angle.to_radians();
        let x = rad.sin() * self.radius;
        let y = rad.cos() * self.radius - 0.3;
        (x, y.max(Self::FLOOR))
    }

    pub fn is_visible(&self) -> bool {
        self.position().1 > Self::HORIZON
    }

    /// Core plus two translucent glow shells
    pub fn draw(&self, out: &mut Vec<DrawCommand>) {
        if !self.is_visible() {
            return;
        }
        let (x, y) = self.position();
        let center = Vec3::new(x, y, Self::DEPTH);

        out.push(DrawCommand::Sphere {
            center,
            radius: self.size,
            color: Self::CORE,
            emissive: true,
        });
        for (scale, alpha) in Self::GLOW {
            out.push(DrawCommand::Sphere {
                center,
                radius: self.size * scale,
                color: Color::rgba(1.0, 0.9, 0.3, alpha),
                emissive: true,
            });
        }
    }
}
