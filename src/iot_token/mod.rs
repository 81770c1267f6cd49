//! Cloud IoT device token module
//!
//! ## Token Flow
//!
//! 1. Read the device private key from disk
//! 2. Sign a device JWT (`iat`, `exp = iat + 20m`, `aud = project ID`)
//! 3. POST it as a bearer token to the device's `generateAccessToken` URL
//! 4. Hand the response body back to the caller untouched

pub mod client;
pub mod jwt;
pub mod types;

pub use client::{ExchangeRequest, TokenClient, DEFAULT_TOKEN_ENDPOINT};
pub use jwt::{load_private_key, mint_device_jwt, DeviceClaims};
pub use types::{ApiError, ExchangedToken, IotTokenError};

use crate::config::Config;

/// Run the whole flow for one device: read key, mint JWT, exchange it
///
/// Key and signing failures are fatal and returned before any request is
/// made. Exchange failures come back as `IotTokenError::Api`.
pub async fn generate_gcp_access_token(config: &Config) -> Result<ExchangedToken, IotTokenError> {
    let key = load_private_key(&config.certificate_file)?;
    let assertion = mint_device_jwt(&config.project_id, &config.algorithm, &key)?;

    let client = TokenClient::new(config.endpoint.clone());
    let token = client.exchange(&config.exchange_request(), &assertion).await?;
    Ok(token)
}
