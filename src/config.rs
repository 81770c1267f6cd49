use crate::cli::GenerateArgs;
use crate::iot_token::client::ExchangeRequest;
use crate::iot_token::types::IotTokenError;
use std::path::PathBuf;

pub const DEFAULT_CLOUD_REGION: &str = "us-central1";
pub const DEFAULT_ALGORITHM: &str = "RS256";

/// Environment variables consulted, in order, when no project ID is given
pub const PROJECT_ENV_VARS: [&str; 2] = ["GCLOUD_PROJECT", "GOOGLE_CLOUD_PROJECT"];

/// Everything one token generation needs
///
/// Built once at startup from the command line and the environment, then
/// passed by reference into the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub cloud_region: String,
    pub project_id: String,
    pub registry_id: String,
    pub device_id: String,
    /// Space delimited list of OAuth scopes
    pub scopes: String,
    pub algorithm: String,
    /// Path to the PEM-encoded device private key
    pub certificate_file: PathBuf,
    /// Base URL of the token service
    pub endpoint: String,
}

impl Config {
    /// Resolve a configuration from parsed arguments and the process environment
    pub fn from_args(args: &GenerateArgs, endpoint: &str) -> Result<Self, IotTokenError> {
        Self::resolve(args, endpoint, |name| std::env::var(name).ok())
    }

    /// Resolve a configuration, looking up environment defaults through `env`
    ///
    /// An empty environment variable counts as unset. An argument given
    /// explicitly as an empty string is rejected.
    pub fn resolve<F>(args: &GenerateArgs, endpoint: &str, env: F) -> Result<Self, IotTokenError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let project_id = explicit(args.project_id(), "projectId")?
            .map(str::to_string)
            .or_else(|| {
                PROJECT_ENV_VARS
                    .iter()
                    .filter_map(|name| env(*name))
                    .find(|value| !value.is_empty())
            })
            .ok_or_else(|| {
                IotTokenError::Config(
                    "Missing required argument: projectId (or set GCLOUD_PROJECT / GOOGLE_CLOUD_PROJECT)"
                        .to_string(),
                )
            })?;

        let config = Self {
            cloud_region: explicit(args.cloud_region(), "cloudRegion")?
                .unwrap_or(DEFAULT_CLOUD_REGION)
                .to_string(),
            project_id,
            registry_id: required(args.registry_id(), "registryId")?,
            device_id: required(args.device_id(), "deviceId")?,
            scopes: required(args.scopes(), "scopes")?,
            algorithm: explicit(args.algorithm(), "algorithm")?
                .unwrap_or(DEFAULT_ALGORITHM)
                .to_string(),
            certificate_file: PathBuf::from(required(args.certificate_file(), "certificateFile")?),
            endpoint: endpoint.to_string(),
        };

        config.validate_endpoint()?;

        tracing::debug!(
            "Resolved configuration: project={}, region={}, registry={}, device={}, algorithm={}, endpoint={}",
            config.project_id,
            config.cloud_region,
            config.registry_id,
            config.device_id,
            config.algorithm,
            config.endpoint
        );
        Ok(config)
    }

    /// Check the endpoint is an absolute http(s) URL with a clean host
    fn validate_endpoint(&self) -> Result<(), IotTokenError> {
        let url = url::Url::parse(&self.endpoint).map_err(|e| {
            IotTokenError::Config(format!("Invalid endpoint URL '{}': {}", self.endpoint, e))
        })?;

        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(IotTokenError::Config(format!(
                "Endpoint must use http or https, got '{}'",
                url.scheme()
            )));
        }

        match url.host() {
            Some(url::Host::Domain(domain)) => {
                let clean = domain
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.');
                if !clean {
                    return Err(IotTokenError::Config(format!(
                        "Endpoint host '{}' contains invalid characters",
                        domain
                    )));
                }
            }
            Some(_) => {}
            None => {
                return Err(IotTokenError::Config(format!(
                    "Endpoint URL '{}' has no host",
                    self.endpoint
                )));
            }
        }

        if url.query().is_some() {
            return Err(IotTokenError::Config(
                "Endpoint URL must not carry a query string".to_string(),
            ));
        }

        Ok(())
    }

    /// Descriptor for the token exchange call
    pub fn exchange_request(&self) -> ExchangeRequest {
        ExchangeRequest {
            cloud_region: self.cloud_region.clone(),
            project_id: self.project_id.clone(),
            registry_id: self.registry_id.clone(),
            device_id: self.device_id.clone(),
            scope: self.scopes.clone(),
        }
    }
}

/// An argument that may be omitted but must not be given as `""`
fn explicit<'a>(value: Option<&'a str>, name: &str) -> Result<Option<&'a str>, IotTokenError> {
    match value {
        Some("") => Err(IotTokenError::Config(format!(
            "Argument {} must not be empty",
            name
        ))),
        other => Ok(other),
    }
}

fn required(value: Option<&str>, name: &str) -> Result<String, IotTokenError> {
    explicit(value, name)?
        .map(str::to_string)
        .ok_or_else(|| IotTokenError::Config(format!("Missing required argument: {}", name)))
}
