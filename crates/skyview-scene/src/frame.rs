//! Backend-agnostic frame description.

use glam::Vec3;

/// Linear RGBA, components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// One primitive. Positions are world space; the camera sits at (0, 0, 2)
/// looking at the origin.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Background box drawn unlit before everything else
    SkyBox {
        top: Color,
        bottom: Color,
        sides: Color,
    },
    Sphere {
        center: Vec3,
        radius: f32,
        color: Color,
        /// Self-illuminated, ignores the scene light
        emissive: bool,
    },
    Line {
        from: Vec3,
        to: Vec3,
        color: Color,
        width: f32,
    },
    /// Flat regular hexagon in the XY plane, spun about Y
    Hexagon {
        center: Vec3,
        radius: f32,
        rotation_deg: f32,
        color: Color,
    },
    /// Horizontal disk, scaled in X and Z by `scale`
    Disk {
        center: Vec3,
        radius: f32,
        scale: f32,
        color: Color,
    },
}

/// Everything a backend needs to draw one tick
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub clear_color: Color,
    pub light_diffuse: Color,
    /// In draw order
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    pub fn count_spheres(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Sphere { .. }))
            .count()
    }

    pub fn count_lines(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count()
    }

    pub fn count_hexagons(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Hexagon { .. }))
            .count()
    }

    pub fn sky(&self) -> Option<(Color, Color, Color)> {
        self.commands.iter().find_map(|c| match c {
            DrawCommand::SkyBox { top, bottom, sides } => Some((*top, *bottom, *sides)),
            _ => None,
        })
    }
}
