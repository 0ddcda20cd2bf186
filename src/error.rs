use thiserror::Error;

/// Errors that can occur while driving a pipeline run
#[derive(Error, Debug)]
pub enum ImportError {
    /// Failed to reach the pipeline API
    #[error("Pipeline request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Start response carried neither a run id nor synchronous outputs
    #[error("No run_id in start response: {0}")]
    MissingRunId(String),

    /// The run reached the FAILED terminal state
    #[error("Pipeline run failed: {0}")]
    RunFailed(String),

    /// The run never reached a terminal state within the poll deadline
    #[error("Polling timed out after {0} seconds")]
    PollTimeout(u64),

    /// A response body was not valid JSON
    #[error("Malformed pipeline response: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to write an output file
    #[error("Filesystem error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}
