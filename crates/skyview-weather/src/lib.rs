//! Weather service for SkyView
//!
//! Provides current conditions and a 7-day forecast from the QWeather API,
//! best-effort city detection from public-IP geolocation, and the condition
//! classification that drives the animated scene.

mod api;
pub mod client;
pub mod condition;
pub mod error;
pub mod location;
pub mod retry;
pub mod types;

pub use client::{ClientConfig, WeatherClient};
pub use condition::ConditionCategory;
pub use error::{LocationError, WeatherError};
pub use location::{IpLocator, LocatedCity, LocatorConfig};
pub use types::*;
