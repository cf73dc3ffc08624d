//! Animated weather scene for SkyView
//!
//! Owns fixed pools of clouds, raindrops and snowflakes plus the sun, advances
//! them on a timer, and describes each frame as draw commands for whatever
//! graphics backend hosts the scene.

pub mod animator;
pub mod entity;
pub mod frame;
pub mod palette;

pub use animator::{SceneAnimator, CLOUD_COUNT, RAINDROP_COUNT, SNOWFLAKE_COUNT};
pub use entity::{Cloud, Raindrop, Snowflake, Sun};
pub use frame::{Color, DrawCommand, Frame};
pub use palette::{LightSetting, SkyGradient};
