//! Display-side wiring for SkyView: the background polling service, the
//! panel view-model, and the window controller that drives the scene.

pub mod bridge;
pub mod error_mapping;
pub mod models;
pub mod services;
pub mod window;

pub use models::weather_model::{Tab, WeatherPanel};
pub use services::weather_service::{PollState, PollerHandle, WeatherServiceMessage, WeatherSource};
pub use window::{FrameSink, LogFrameSink, WeatherWindow};
