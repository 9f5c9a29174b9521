use futures::FutureExt;
use std::fmt::{self, Display};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

use super::{Delivery, LocalSink, Severity, StderrSink, Subjects};
use crate::config::LoggerConfig;
use crate::error::{BusError, LoggerError};
use crate::nats::{MessageBus, NatsBus};

/// Prefix for failures the logger reports about itself.
pub const LOGGING_ERROR_PREFIX: &str = "[logging error]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterState {
    Connected,
    Closed,
}

/// Writes each record to a local sink and publishes the same text on
/// `logging.<app>.<code>`.
///
/// Info and error records are fire-and-forget: bus failures are written to
/// the local sink and never returned. A fatal record is flushed to the bus
/// (bounded by the flush timeout) before the process exits.
///
/// After [`close`](Self::close) the logger only writes locally.
pub struct NatsLogger<B = NatsBus, S = StderrSink> {
    app: String,
    subjects: Subjects,
    bus: B,
    sink: S,
    closed: AtomicBool,
    publish_timeout: Duration,
    flush_timeout: Duration,
}

impl NatsLogger {
    /// Logger for `app` writing to stderr and to the NATS server at `url`.
    pub async fn connect(app: &str, url: &str) -> Result<Self, LoggerError> {
        Self::connect_with_config(app, url, &LoggerConfig::default()).await
    }

    pub async fn connect_with_config(app: &str, url: &str, config: &LoggerConfig) -> Result<Self, LoggerError> {
        validate_application(app)?;
        if url.is_empty() {
            return Err(LoggerError::EmptyUrl);
        }
        let bus = NatsBus::connect(url, app, config).await?;
        Self::with_parts(app, bus, StderrSink::new(), config)
    }
}

impl<B: MessageBus, S: LocalSink> NatsLogger<B, S> {
    /// Build a logger over an already connected bus.
    pub fn with_parts(app: &str, bus: B, sink: S, config: &LoggerConfig) -> Result<Self, LoggerError> {
        validate_application(app)?;
        Ok(Self {
            app: app.to_string(),
            subjects: Subjects::new(app),
            bus,
            sink,
            closed: AtomicBool::new(false),
            publish_timeout: config.publish_timeout,
            flush_timeout: config.flush_timeout,
        })
    }

    pub fn application(&self) -> &str {
        &self.app
    }

    pub fn subjects(&self) -> &Subjects {
        &self.subjects
    }

    pub fn state(&self) -> RouterState {
        if self.closed.load(Ordering::Acquire) {
            RouterState::Closed
        } else {
            RouterState::Connected
        }
    }

    /// Logs a notice statement
    pub async fn info(&self, message: impl Display) {
        let line = self.emit(Severity::Info, message).await;
        self.sink.write_line(&line);
    }

    /// Logs an error statement
    pub async fn error(&self, message: impl Display) {
        let line = self.emit(Severity::Error, message).await;
        self.sink.write_line(&line);
    }

    /// Logs a fatal error, then exits the process with status 1. Never
    /// returns.
    pub async fn fatal(&self, message: impl Display) {
        self.record_fatal(message).await;
        std::process::exit(1);
    }

    /// Everything `fatal` does short of exiting.
    pub(crate) async fn record_fatal(&self, message: impl Display) {
        let line = self.emit(Severity::Fatal, message).await;
        self.sink.write_line(&line);
    }

    /// Wait for buffered messages to reach the server. Failures go to the
    /// local sink.
    pub async fn flush(&self) {
        if self.state() == RouterState::Closed {
            return;
        }
        self.flush_bus().await;
    }

    /// Flush and release the connection. Only the first call does anything.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.flush_bus().await;

        let outcome = tokio::time::timeout(self.flush_timeout, self.bus.close())
            .await
            .unwrap_or(Err(BusError::Timeout(self.flush_timeout)));
        if let Err(e) = outcome {
            self.report("couldn't close NATS connection", &e);
        }
        debug!(app = %self.app, "logger closed");
    }

    /// Format the record and send it to the bus. Returns the line for the
    /// local sink so both destinations get identical text.
    async fn emit(&self, severity: Severity, message: impl Display) -> String {
        let line = format_line(&self.app, severity, message);
        if self.state() == RouterState::Closed {
            return line;
        }

        let subject = self.subjects.for_severity(severity);
        match severity.delivery() {
            Delivery::FireAndForget => self.publish_now(subject, &line),
            Delivery::Confirmed => {
                self.publish_bounded(subject, &line).await;
                self.flush_bus().await;
            }
        }
        line
    }

    /// Single poll of the hand-off. A client that cannot take the record
    /// right away (disconnected, buffer full) loses it.
    fn publish_now(&self, subject: &str, line: &str) {
        // unconstrained: an exhausted coop budget must not look like a full buffer
        let outcome = tokio::task::unconstrained(self.bus.publish(subject, line.to_string()))
            .now_or_never()
            .unwrap_or(Err(BusError::BufferFull));
        if let Err(e) = outcome {
            self.report("couldn't publish NATS message", &e);
        }
    }

    async fn publish_bounded(&self, subject: &str, line: &str) {
        let outcome = tokio::time::timeout(self.publish_timeout, self.bus.publish(subject, line.to_string()))
            .await
            .unwrap_or(Err(BusError::Timeout(self.publish_timeout)));
        if let Err(e) = outcome {
            self.report("couldn't publish NATS message", &e);
        }
    }

    async fn flush_bus(&self) {
        let outcome = tokio::time::timeout(self.flush_timeout, self.bus.flush())
            .await
            .unwrap_or(Err(BusError::Timeout(self.flush_timeout)));
        if let Err(e) = outcome {
            self.report("couldn't flush NATS connection", &e);
        }
    }

    fn report(&self, what: &str, err: &BusError) {
        warn!(app = %self.app, error = %err, "{}", what);
        self.sink.write_line(&format!("{}: {}: {}", LOGGING_ERROR_PREFIX, what, err));
    }
}

impl<B, S> fmt::Debug for NatsLogger<B, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NatsLogger")
            .field("app", &self.app)
            .field("subjects", &self.subjects)
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .finish()
    }
}

/// `[<app>] [<code>] <message>`
pub fn format_line(app: &str, severity: Severity, message: impl Display) -> String {
    format!("[{}] [{}] {}", app, severity.code(), message)
}

fn validate_application(app: &str) -> Result<(), LoggerError> {
    if app.is_empty() {
        return Err(LoggerError::EmptyApplication);
    }
    // whitespace splits the PUB line; `*` and `>` are wildcard tokens;
    // an empty token between dots is not a valid subject
    if app.chars().any(|c| c.is_whitespace() || c == '*' || c == '>')
        || app.starts_with('.')
        || app.ends_with('.')
        || app.contains("..")
    {
        return Err(LoggerError::InvalidApplication(app.to_string()));
    }
    Ok(())
}
