pub mod weather_service;

pub use weather_service::{
    spawn as spawn_weather_poller, PollCommand, PollState, PollerHandle, WeatherServiceMessage,
    WeatherSource,
};
