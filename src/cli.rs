//! Command-line surface of the `cloudiot-token` binary
//!
//! Each field of `generateGcpAccessToken` may be given positionally, in the
//! order shown in the usage line, or by flag. Defaults are applied later by
//! [`Config::resolve`](crate::config::Config::resolve).

use crate::iot_token::client::DEFAULT_TOKEN_ENDPOINT;
use clap::{Args, Parser, Subcommand};

/// Mint device JWTs and exchange them for Google Cloud access tokens
#[derive(Parser, Debug)]
#[command(name = "cloudiot-token")]
#[command(about = "Exchange a Cloud IoT device credential for a GCP access token", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Base URL of the token service
    #[arg(long, env = "CLOUDIOT_TOKEN_ENDPOINT", default_value = DEFAULT_TOKEN_ENDPOINT, global = true)]
    pub endpoint: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a GCP access token for a device
    #[command(name = "generateGcpAccessToken")]
    GenerateGcpAccessToken(GenerateArgs),
}

#[derive(Args, Debug, Default, Clone)]
pub struct GenerateArgs {
    /// Cloud region of the registry [default: us-central1]
    #[arg(short = 'c', long = "cloudRegion", value_name = "REGION")]
    pub cloud_region: Option<String>,

    /// The Project ID to use. Defaults to the value of the GCLOUD_PROJECT or GOOGLE_CLOUD_PROJECT environment variables
    #[arg(short = 'p', long = "projectId", value_name = "PROJECT")]
    pub project_id: Option<String>,

    /// The Registry ID to use
    #[arg(short = 'r', long = "registryId", value_name = "REGISTRY")]
    pub registry_id: Option<String>,

    /// The Device ID to use
    #[arg(short = 'd', long = "deviceId", value_name = "DEVICE")]
    pub device_id: Option<String>,

    /// The scope of the generated gcp token. Space delimited string
    #[arg(short = 's', long = "scopes", value_name = "SCOPES")]
    pub scopes: Option<String>,

    /// The algorithm for the device certificate [default: RS256]
    #[arg(short = 'a', long = "algorithm", value_name = "ALG")]
    pub algorithm: Option<String>,

    /// Path to the device private key
    #[arg(long = "certificateFile", alias = "ce", value_name = "PATH")]
    pub certificate_file: Option<String>,

    #[arg(value_name = "cloudRegion", conflicts_with = "cloud_region")]
    pub cloud_region_pos: Option<String>,

    #[arg(value_name = "projectId", conflicts_with = "project_id")]
    pub project_id_pos: Option<String>,

    #[arg(value_name = "registryId", conflicts_with = "registry_id")]
    pub registry_id_pos: Option<String>,

    #[arg(value_name = "deviceId", conflicts_with = "device_id")]
    pub device_id_pos: Option<String>,

    #[arg(value_name = "scopes", conflicts_with = "scopes")]
    pub scopes_pos: Option<String>,

    #[arg(value_name = "algorithm", conflicts_with = "algorithm")]
    pub algorithm_pos: Option<String>,

    #[arg(value_name = "certificateFile", conflicts_with = "certificate_file")]
    pub certificate_file_pos: Option<String>,
}

impl GenerateArgs {
    pub fn cloud_region(&self) -> Option<&str> {
        pick(&self.cloud_region_pos, &self.cloud_region)
    }

    pub fn project_id(&self) -> Option<&str> {
        pick(&self.project_id_pos, &self.project_id)
    }

    pub fn registry_id(&self) -> Option<&str> {
        pick(&self.registry_id_pos, &self.registry_id)
    }

    pub fn device_id(&self) -> Option<&str> {
        pick(&self.device_id_pos, &self.device_id)
    }

    pub fn scopes(&self) -> Option<&str> {
        pick(&self.scopes_pos, &self.scopes)
    }

    pub fn algorithm(&self) -> Option<&str> {
        pick(&self.algorithm_pos, &self.algorithm)
    }

    pub fn certificate_file(&self) -> Option<&str> {
        pick(&self.certificate_file_pos, &self.certificate_file)
    }
}

fn pick<'a>(positional: &'a Option<String>, flag: &'a Option<String>) -> Option<&'a str> {
    positional.as_deref().or(flag.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate_args(argv: &[&str]) -> GenerateArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::GenerateGcpAccessToken(args) => args,
        }
    }

    #[test]
    fn test_positional_arguments_in_order() {
        let args = generate_args(&[
            "cloudiot-token",
            "generateGcpAccessToken",
            "europe-west1",
            "proj1",
            "reg1",
            "dev1",
            "a b",
            "ES256",
            "key.pem",
        ]);
        assert_eq!(args.cloud_region(), Some("europe-west1"));
        assert_eq!(args.project_id(), Some("proj1"));
        assert_eq!(args.registry_id(), Some("reg1"));
        assert_eq!(args.device_id(), Some("dev1"));
        assert_eq!(args.scopes(), Some("a b"));
        assert_eq!(args.algorithm(), Some("ES256"));
        assert_eq!(args.certificate_file(), Some("key.pem"));
    }

    #[test]
    fn test_short_flags() {
        let args = generate_args(&[
            "cloudiot-token",
            "generateGcpAccessToken",
            "-p",
            "proj1",
            "-r",
            "reg1",
            "-d",
            "dev1",
            "-s",
            "scope1 scope2",
            "--certificateFile",
            "key.pem",
        ]);
        assert_eq!(args.cloud_region(), None);
        assert_eq!(args.algorithm(), None);
        assert_eq!(args.project_id(), Some("proj1"));
        assert_eq!(args.scopes(), Some("scope1 scope2"));
        assert_eq!(args.certificate_file(), Some("key.pem"));
    }

    #[test]
    fn test_ce_alias_for_certificate_file() {
        let args = generate_args(&["cloudiot-token", "generateGcpAccessToken", "--ce", "key.pem"]);
        assert_eq!(args.certificate_file(), Some("key.pem"));
    }

    #[test]
    fn test_flag_requires_value() {
        let result = Cli::try_parse_from(["cloudiot-token", "generateGcpAccessToken", "--registryId"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_same_field_positional_and_flag_conflicts() {
        let result = Cli::try_parse_from([
            "cloudiot-token",
            "generateGcpAccessToken",
            "-c",
            "asia-east1",
            "europe-west1",
        ]);
        assert!(result.is_err());
    }
}
