/// Error types for the weather region map
use thiserror::Error;

/// Main error type for dashboard operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashboardError {
    /// Completion attempted before the polygon had enough vertices
    #[error("Polygon must have at least {needed} points (found: {found})")]
    InsufficientPoints { needed: usize, found: usize },

    /// Point added to a session that already holds the maximum
    #[error("Polygon cannot have more than {max} points")]
    TooManyPoints { max: usize },

    /// A drawing operation arrived while no session was open
    #[error("No drawing session is active")]
    NotDrawing,

    /// Polygon utilities called with an unusable vertex list
    #[error("Degenerate polygon: {0}")]
    DegenerateGeometry(String),

    /// The weather collaborator failed to produce samples
    #[error("Failed to fetch weather data: {0}")]
    DataFetch(String),

    /// A sample payload did not have the expected shape
    #[error("Invalid sample series: {0}")]
    InvalidSeries(String),

    /// Time range end precedes its start
    #[error("Invalid time range: {0}")]
    InvalidTimeRange(String),

    /// Region not found
    #[error("Region not found: {0}")]
    UnknownRegion(String),

    /// Data source not found
    #[error("Data source not found: {0}")]
    UnknownDataSource(String),

    /// Rule index outside of a data source's rule list
    #[error("Rule index {index} out of range (rules: {len})")]
    RuleIndex { index: usize, len: usize },
}

/// Type alias for Results using DashboardError
pub type Result<T> = std::result::Result<T, DashboardError>;
