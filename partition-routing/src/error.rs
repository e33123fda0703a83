use std::result;
use thiserror::Error as ThisError;

pub type Result<T> = result::Result<T, Error>;

/// Routing core error type. None of these errors ever reach query plan construction - they are
/// raised while talking to the control channel or decoding partition metadata, and the routing
/// policy degrades to its fallback policy instead of failing.
#[derive(Debug, Clone, ThisError)]
pub enum Error {
    /// General error
    #[error("General error: {0}")]
    General(String),
    /// Timed out waiting for an operation to complete.
    #[error("Timeout: {0}")]
    Timeout(String),
    /// A partition boundary key which is neither empty nor a 2-byte routing key.
    #[error("Invalid partition key length: {length}")]
    InvalidPartitionKey { length: usize },
    /// Replica role which is not known to the driver.
    #[error("Unknown replica role: {0}")]
    UnknownReplicaRole(String),
}

impl From<String> for Error {
    fn from(err: String) -> Error {
        Error::General(err)
    }
}

impl From<&str> for Error {
    fn from(err: &str) -> Error {
        Error::General(err.to_string())
    }
}
