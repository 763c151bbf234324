use thiserror::Error;

#[derive(Error, Debug)]
pub enum CityGridError {
    /// Request rejected before the engine runs.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
