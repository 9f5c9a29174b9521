use async_nats::{Client, ConnectOptions};
use async_trait::async_trait;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::debug;

use crate::config::LoggerConfig;
use crate::error::{BusError, LoggerError};

/// The slice of a message-bus client the logger needs.
///
/// `publish` hands a message to the client's outbound buffer and returns
/// without waiting for the server. `flush` waits until everything buffered
/// has been written and acknowledged. `close` releases the connection and
/// must be safe to call more than once.
#[async_trait]
pub trait MessageBus: Send + Sync {
    async fn publish(&self, subject: &str, payload: String) -> Result<(), BusError>;
    async fn flush(&self) -> Result<(), BusError>;
    async fn close(&self) -> Result<(), BusError>;
}

#[async_trait]
impl<T: MessageBus + ?Sized> MessageBus for Arc<T> {
    async fn publish(&self, subject: &str, payload: String) -> Result<(), BusError> {
        (**self).publish(subject, payload).await
    }

    async fn flush(&self) -> Result<(), BusError> {
        (**self).flush().await
    }

    async fn close(&self) -> Result<(), BusError> {
        (**self).close().await
    }
}

/// NATS connection owned by a single logger
pub struct NatsBus {
    client: RwLock<Option<Client>>,
    server_url: String,
}

impl NatsBus {
    /// Connect to NATS server. `name` is reported to the server as the
    /// connection name.
    pub async fn connect(server_url: &str, name: &str, config: &LoggerConfig) -> Result<Self, LoggerError> {
        if server_url.is_empty() {
            return Err(LoggerError::EmptyUrl);
        }

        let connect_options = ConnectOptions::new()
            .name(name)
            .connection_timeout(config.connect_timeout)
            .max_reconnects(config.max_reconnects)
            .reconnect_delay_callback(|attempts| {
                // exponential backoff: 1000ms * 2^attempts, capped at 8000ms
                let exp = 2u64.saturating_pow(attempts as u32);
                let backoff = 1000u64.saturating_mul(exp);
                Duration::from_millis(std::cmp::min(backoff, 8000u64))
            });

        let connecting = async_nats::connect_with_options(server_url, connect_options);
        let client = tokio::time::timeout(config.connect_timeout, connecting)
            .await
            .map_err(|_| LoggerError::ConnectTimeout(config.connect_timeout))??;
        debug!(url = server_url, name, "connected to nats");

        Ok(Self {
            client: RwLock::new(Some(client)),
            server_url: server_url.to_string(),
        })
    }

    /// Get connection info
    pub fn server_info(&self) -> &str {
        &self.server_url
    }

    fn client(&self) -> Result<Client, BusError> {
        self.client
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(BusError::Closed)
    }
}

#[async_trait]
impl MessageBus for NatsBus {
    async fn publish(&self, subject: &str, payload: String) -> Result<(), BusError> {
        let client = self.client()?;
        client
            .publish(subject.to_string(), payload.into())
            .await
            .map_err(|e| BusError::Publish(e.to_string()))
    }

    async fn flush(&self) -> Result<(), BusError> {
        let client = self.client()?;
        client.flush().await.map_err(|e| BusError::Flush(e.to_string()))
    }

    async fn close(&self) -> Result<(), BusError> {
        // The connection task shuts down once the last clone is dropped.
        let taken = self.client.write().unwrap_or_else(PoisonError::into_inner).take();
        if taken.is_some() {
            debug!(url = %self.server_info(), "released nats connection");
        }
        Ok(())
    }
}
