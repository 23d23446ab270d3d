/// Error types for weather sources
use thiserror::Error;
use wxmap_core::DashboardError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeatherError {
    /// Coordinates were NaN or infinite
    #[error("Invalid coordinates: ({lat}, {lon})")]
    InvalidCoordinates { lat: f64, lon: f64 },

    /// Requested range ends before it starts
    #[error("Range end precedes start")]
    InvertedRange,

    /// Generated or received samples failed validation
    #[error("Bad sample payload: {0}")]
    Payload(#[from] DashboardError),

    /// The source is unavailable
    #[error("Weather source unavailable: {0}")]
    Unavailable(String),
}

impl From<WeatherError> for DashboardError {
    fn from(err: WeatherError) -> Self {
        DashboardError::DataFetch(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WeatherError>;
