use skyview_core::{AppError, LocationError, ReqwestErrorExt, WeatherError};
use skyview_weather::{LocationError as LocatorError, WeatherError as ClientError};

pub fn weather_error(e: ClientError) -> AppError {
    match e {
        ClientError::Network(e) => AppError::Network(e.into_network_error()),
        ClientError::NotFound(city) => AppError::Weather(WeatherError::CityNotFound(city)),
        ClientError::Api { code, message } => AppError::Weather(match code.as_str() {
            "401" | "403" => WeatherError::InvalidApiKey,
            "402" | "429" => WeatherError::QuotaExceeded,
            "500" | "502" | "503" | "504" => WeatherError::ServiceUnavailable,
            _ => WeatherError::ApiError(format!("{}: {}", code, message)),
        }),
        ClientError::Malformed(detail) => {
            AppError::Weather(WeatherError::MalformedResponse(detail))
        }
    }
}

pub fn location_error(e: LocatorError) -> AppError {
    match e {
        LocatorError::AllProvidersFailed { providers } => {
            AppError::Location(LocationError::AllProvidersFailed { providers })
        }
        LocatorError::Client(e) => AppError::Location(LocationError::Unavailable(e.to_string())),
    }
}
