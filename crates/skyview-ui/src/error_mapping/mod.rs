//! Maps weather-layer errors to skyview_core::AppError for consistent
//! user-facing messages.

mod weather;

pub use weather::{location_error, weather_error};
