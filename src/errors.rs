use thiserror::Error;

/// Errors raised by the hygrothermal engine. All of these are raised
/// immediately at the point of detection; the engine never returns a
/// partially-populated analysis result alongside an error.
#[derive(Clone, Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid construction: {0}")]
    InvalidConstruction(String),
    #[error("Invalid climate series: {0}")]
    InvalidClimateSeries(String),
    #[error("Invalid ground floor parameters: {0}")]
    InvalidGroundParams(String),
    #[error("Numeric degeneracy in calculation: {0}")]
    NumericDegeneracy(String),
}
