use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ifypixels::{config::Config, storage::OutputStorage, web::WebServer};

#[derive(Parser)]
#[command(name = "ifypixels")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Image demo services: background removal and size comparison")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the background-removal upload app
    Remove {
        /// Listening IP address
        #[arg(short = 'H', long, value_name = "IP")]
        host: Option<String>,

        /// Listening port
        #[arg(short, long, value_name = "PORT")]
        port: Option<u16>,
    },
    /// Serve the size-comparison app
    Compare {
        /// Listening IP address
        #[arg(short = 'H', long, value_name = "IP")]
        host: Option<String>,

        /// Listening port
        #[arg(short, long, value_name = "PORT")]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging with specified level
    let log_filter = if cli.log_level == "trace" {
        format!("ifypixels={},tower_http=trace", cli.log_level)
    } else {
        format!("ifypixels={}", cli.log_level)
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ifypixels v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration from specified file
    std::env::set_var("CONFIG_FILE", &cli.config);
    let mut config = Config::load()?;
    info!("Configuration loaded from: {}", cli.config);

    let server = match cli.command {
        Command::Remove { host, port } => {
            if let Some(host) = host {
                config.removal.host = host;
            }
            if let Some(port) = port {
                config.removal.port = port;
            }

            let storage = OutputStorage::new(config.storage.output_path.clone());
            storage.ensure_output_dir().await?;
            info!("Output directory ready: {}", storage.output_dir().display());

            WebServer::removal(&config)?
        }
        Command::Compare { host, port } => {
            if let Some(host) = host {
                config.compare.host = host;
            }
            if let Some(port) = port {
                config.compare.port = port;
            }

            WebServer::compare(&config)?
        }
    };

    info!("Starting web server on {}:{}", server.host(), server.port());
    server.serve().await?;

    Ok(())
}
