//! Cloud IoT token SDK
//!
//! Exchange a Cloud IoT Core device credential for a Google Cloud access
//! token.
//!
//! This crate provides:
//! - Device JWT minting (RS/PS/ES/HS/EdDSA) with a fixed 20-minute lifetime
//! - A client for the `generateAccessToken` endpoint of the token service
//! - A typed configuration resolved from CLI arguments and the environment
//!
//! # Example
//!
//! ```no_run
//! use cloudiot_token::{load_private_key, mint_device_jwt, ExchangeRequest, TokenClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let key = load_private_key("rsa_private.pem")?;
//! let jwt = mint_device_jwt("my-project", "RS256", &key)?;
//!
//! let request = ExchangeRequest {
//!     cloud_region: "us-central1".to_string(),
//!     project_id: "my-project".to_string(),
//!     registry_id: "my-registry".to_string(),
//!     device_id: "my-device".to_string(),
//!     scope: "https://www.googleapis.com/auth/cloud-platform".to_string(),
//! };
//!
//! let token = TokenClient::default().exchange(&request, &jwt).await?;
//! println!("{}", token);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod iot_token;

// Re-export commonly used types and functions
pub use config::Config;
pub use iot_token::{
    client::{ExchangeRequest, TokenClient, DEFAULT_TOKEN_ENDPOINT},
    generate_gcp_access_token,
    jwt::{
        load_private_key, mint_device_jwt, mint_device_jwt_at, parse_algorithm, DeviceClaims,
        DEVICE_JWT_LIFETIME_SECS,
    },
    types::{ApiError, ExchangedToken, IotTokenError},
};
