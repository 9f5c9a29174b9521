//! Log lines to standard error and, at the same time, to NATS.
//!
//! Every record is published on `logging.<app>.<code>` where `<code>` is
//! `inf`, `err` or `ftl`, with the body `[<app>] [<code>] <message>`.
//!
//! ```no_run
//! # async fn run() -> Result<(), natslog::LoggerError> {
//! let logger = natslog::NatsLogger::connect("myapp", "nats://127.0.0.1:4222").await?;
//! logger.info("service started").await;
//! logger.error(format!("request {} failed", 42)).await;
//! logger.close().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod log;
pub mod nats;

pub use config::LoggerConfig;
pub use error::{BusError, LoggerError};
pub use log::{LocalSink, NatsLogger, RouterState, Severity, StderrSink, Subjects};
pub use nats::{MessageBus, NatsBus};
