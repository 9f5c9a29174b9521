use std::time::Duration;
use thiserror::Error;

/// Errors returned while building a logger. Nothing is left open when one
/// of these is returned.
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("invalid parameter: application name must not be empty")]
    EmptyApplication,

    #[error("invalid parameter: bus url must not be empty")]
    EmptyUrl,

    #[error("invalid parameter: application name {0:?} cannot be used in a subject")]
    InvalidApplication(String),

    #[error("could not connect to the nats server: {0}")]
    Connect(#[from] async_nats::ConnectError),

    #[error("could not connect to the nats server: timed out after {0:?}")]
    ConnectTimeout(Duration),
}

/// Runtime bus failures. These never reach callers of the emit operations;
/// the logger writes them to its local sink instead.
#[derive(Debug, Error)]
pub enum BusError {
    #[error("connection is closed")]
    Closed,

    #[error("{0}")]
    Publish(String),

    #[error("{0}")]
    Flush(String),

    #[error("outbound buffer full")]
    BufferFull,

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}
