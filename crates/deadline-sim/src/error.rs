//! Error types for simulation setup and task validation.

use thiserror::Error;

/// Fatal setup error which aborts the run before any scheduling happens.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("host list is empty")]
    EmptyHostList,
    #[error("host {id} has no processing elements")]
    NoProcessingElements { id: u32 },
    #[error("host {id} has non-positive speed rating {speed}")]
    InvalidHostSpeed { id: u32, speed: f64 },
    #[error("VM pool must contain at least one VM")]
    EmptyVmPool,
    #[error("non-positive VM speed rating {speed}")]
    InvalidVmSpeed { speed: f64 },
    #[error("can't resolve placement algorithm: {0}")]
    UnknownAlgorithm(String),
    #[error("can't read config file {path}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("can't parse YAML from config file {path}")]
    ConfigParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Per-task validation error.
///
/// Unlike [`ConfigurationError`] it is not fatal: the offending task is
/// excluded from scheduling and reported as rejected, the batch continues.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("task {id} has non-positive length {length}")]
    InvalidLength { id: u32, length: i64 },
    #[error("task {id} has non-positive deadline {deadline}")]
    InvalidDeadline { id: u32, deadline: f64 },
}

impl ValidationError {
    /// Returns the id of the rejected task.
    pub fn task_id(&self) -> u32 {
        match self {
            ValidationError::InvalidLength { id, .. } => *id,
            ValidationError::InvalidDeadline { id, .. } => *id,
        }
    }
}
