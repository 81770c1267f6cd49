//! cloudiot-token CLI - exchange a device credential for a GCP access token

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cloudiot_token::cli::{Cli, Commands};
use cloudiot_token::{generate_gcp_access_token, Config, IotTokenError};

/// Exit code when the token service rejects or never answers the exchange
const EXIT_EXCHANGE_FAILED: u8 = 3;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| "info".into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::GenerateGcpAccessToken(args) => {
            let config = match Config::from_args(&args, &cli.endpoint) {
                Ok(config) => config,
                Err(e) => {
                    error!("{}", e);
                    return ExitCode::FAILURE;
                }
            };

            match generate_gcp_access_token(&config).await {
                Ok(token) => {
                    info!("Generated access token for device {}", config.device_id);
                    println!("{}", token);
                    ExitCode::SUCCESS
                }
                Err(IotTokenError::Api(e)) => {
                    error!("Token exchange failed: {}", e);
                    ExitCode::from(EXIT_EXCHANGE_FAILED)
                }
                Err(e) => {
                    error!("{}", e);
                    ExitCode::FAILURE
                }
            }
        }
    }
}
