use clap::Parser;
use natslog::{LoggerConfig, NatsLogger};
use rand::seq::SliceRandom;
use rand::Rng;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_APP_NAME: &str = "demoapp";
const DEFAULT_NATS_URL: &str = "nats://127.0.0.1:4222";

const USERS: &[&str] = &["alice", "bob", "carol", "dave", "erin", "frank", "grace", "heidi"];
const DOMAINS: &[&str] = &["example.com", "example.org", "mail.test", "corp.invalid"];

/// Publishes random log traffic through a NATS logger until interrupted
#[derive(Debug, Parser)]
#[command(name = "natslog-demo")]
struct Args {
    /// Application name
    #[arg(long, default_value = DEFAULT_APP_NAME)]
    app: String,

    /// URL of the NATS server
    #[arg(long, env = "NATS_URL", default_value = DEFAULT_NATS_URL)]
    url: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = LoggerConfig::from_env();

    info!(app = %args.app, url = %args.url, "Connecting to NATS");
    let logger = match NatsLogger::connect_with_config(&args.app, &args.url, &config).await {
        Ok(logger) => Arc::new(logger),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let traffic = tokio::spawn(generate_log_statements(logger.clone()));

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received SIGINT, closing logger..."),
        Err(e) => error!("Failed to listen for SIGINT: {}", e),
    }
    traffic.abort();
    let _ = traffic.await;

    logger.close().await;
}

/// Roughly half info, half error, every 50-500ms.
async fn generate_log_statements(logger: Arc<NatsLogger>) {
    loop {
        let (is_info, email, ip, pause_ms) = {
            let mut rng = rand::thread_rng();
            let user = USERS.choose(&mut rng).copied().unwrap_or("user");
            let domain = DOMAINS.choose(&mut rng).copied().unwrap_or("example.com");
            (
                rng.gen_bool(0.5),
                format!("{}{}@{}", user, rng.gen_range(1..100), domain),
                Ipv4Addr::from(rng.gen::<u32>()),
                rng.gen_range(50..500),
            )
        };

        if is_info {
            logger.info(format!("Received email {} from IP {}.", email, ip)).await;
        } else {
            logger.error(format!("Error reported by {} at IP {}.", email, ip)).await;
        }

        tokio::time::sleep(Duration::from_millis(pause_ms)).await;
    }
}
