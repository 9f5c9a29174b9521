use std::env;
use std::time::Duration;

pub const CONNECT_TIMEOUT_ENV: &str = "NATSLOG_CONNECT_TIMEOUT";
pub const FLUSH_TIMEOUT_ENV: &str = "NATSLOG_FLUSH_TIMEOUT";
pub const PUBLISH_TIMEOUT_ENV: &str = "NATSLOG_PUBLISH_TIMEOUT";
pub const MAX_RECONNECTS_ENV: &str = "NATSLOG_MAX_RECONNECTS";

/// Timeouts and reconnect limits for a logger's bus connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Upper bound on the initial connection attempt.
    pub connect_timeout: Duration,
    /// Upper bound on a flush, including the one done before a fatal exit.
    pub flush_timeout: Duration,
    /// Upper bound on handing a message to the client's outbound buffer.
    pub publish_timeout: Duration,
    pub max_reconnects: usize,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            flush_timeout: Duration::from_secs(2),
            publish_timeout: Duration::from_secs(1),
            max_reconnects: 5,
        }
    }
}

impl LoggerConfig {
    /// Read overrides from the environment. Durations use humantime syntax
    /// (`250ms`, `3s`); anything unparsable keeps the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            connect_timeout: duration_var(CONNECT_TIMEOUT_ENV).unwrap_or(defaults.connect_timeout),
            flush_timeout: duration_var(FLUSH_TIMEOUT_ENV).unwrap_or(defaults.flush_timeout),
            publish_timeout: duration_var(PUBLISH_TIMEOUT_ENV).unwrap_or(defaults.publish_timeout),
            max_reconnects: env::var(MAX_RECONNECTS_ENV)
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.max_reconnects),
        }
    }
}

fn duration_var(name: &str) -> Option<Duration> {
    env::var(name)
        .ok()
        .and_then(|v| humantime::parse_duration(v.trim()).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to serialize tests that modify environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for name in [CONNECT_TIMEOUT_ENV, FLUSH_TIMEOUT_ENV, PUBLISH_TIMEOUT_ENV, MAX_RECONNECTS_ENV] {
            env::remove_var(name);
        }
    }

    #[test]
    fn test_config_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        assert_eq!(LoggerConfig::from_env(), LoggerConfig::default());
    }

    #[test]
    fn test_config_override() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var(CONNECT_TIMEOUT_ENV, "250ms");
        env::set_var(FLUSH_TIMEOUT_ENV, "3s");
        env::set_var(MAX_RECONNECTS_ENV, "12");
        let config = LoggerConfig::from_env();
        assert_eq!(config.connect_timeout, Duration::from_millis(250));
        assert_eq!(config.flush_timeout, Duration::from_secs(3));
        assert_eq!(config.publish_timeout, Duration::from_secs(1));
        assert_eq!(config.max_reconnects, 12);
        clear_env();
    }

    #[test]
    fn test_config_garbage_falls_back() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var(PUBLISH_TIMEOUT_ENV, "soon");
        env::set_var(MAX_RECONNECTS_ENV, "-1");
        let config = LoggerConfig::from_env();
        assert_eq!(config.publish_timeout, Duration::from_secs(1));
        assert_eq!(config.max_reconnects, 5);
        clear_env();
    }
}
