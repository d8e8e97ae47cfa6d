use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Routing service error: {0}")]
    RoutingService(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Why a geolocation request produced no fix. Surfaced to the user as an
/// alert, never propagated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeolocationError {
    #[error("Geolocation is not supported")]
    Unsupported,

    #[error("{0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
