use crate::iot_token::types::{ApiError, ExchangedToken};

/// Default Cloud IoT token service endpoint
pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://cloudiottoken.googleapis.com";

/// Identifies the device whose JWT is being exchanged, and the scopes wanted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeRequest {
    pub cloud_region: String,
    pub project_id: String,
    pub registry_id: String,
    pub device_id: String,
    /// Space delimited list of OAuth scopes
    pub scope: String,
}

impl ExchangeRequest {
    /// Build the `generateAccessToken` URL for this device
    ///
    /// Identifiers are interpolated as-is. Nothing here percent-encodes them,
    /// so a scope of `a b` appears literally as `?scope=a b`.
    pub fn url(&self, base_url: &str) -> String {
        format!(
            "{}/v1alpha1/projects/{}/locations/{}/registries/{}/devices/{}:generateAccessToken?scope={}",
            base_url.trim_end_matches('/'),
            self.project_id,
            self.cloud_region,
            self.registry_id,
            self.device_id,
            self.scope
        )
    }
}

/// HTTP client for the Cloud IoT token service
#[derive(Debug, Clone)]
pub struct TokenClient {
    /// Base URL of the token service
    base_url: String,
    /// HTTP client for making requests
    client: reqwest::Client,
}

impl Default for TokenClient {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_ENDPOINT)
    }
}

impl TokenClient {
    /// Create a client for the token service at `base_url`
    ///
    /// # Example
    ///
    /// ```no_run
    /// use cloudiot_token::TokenClient;
    ///
    /// let client = TokenClient::new("https://cloudiottoken.googleapis.com");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        tracing::debug!("Creating TokenClient with base URL: {}", base_url);

        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Get the base URL for this client
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exchange a signed device JWT for a Cloud access token
    ///
    /// Sends one POST with an empty JSON body and the JWT as a bearer token.
    /// A 2xx response body is returned verbatim. Anything else is logged and
    /// returned as an `ApiError`; the request is never retried.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use cloudiot_token::{ExchangeRequest, TokenClient};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = TokenClient::default();
    /// let request = ExchangeRequest {
    ///     cloud_region: "us-central1".to_string(),
    ///     project_id: "my-project".to_string(),
    ///     registry_id: "my-registry".to_string(),
    ///     device_id: "my-device".to_string(),
    ///     scope: "https://www.googleapis.com/auth/cloud-platform".to_string(),
    /// };
    ///
    /// let token = client.exchange(&request, "eyJhbGci...").await?;
    /// println!("{}", token);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn exchange(
        &self,
        request: &ExchangeRequest,
        assertion: &str,
    ) -> Result<ExchangedToken, ApiError> {
        let url = request.url(&self.base_url);

        tracing::info!(
            "Exchanging device JWT for access token: project={}, region={}, registry={}, device={}",
            request.project_id,
            request.cloud_region,
            request.registry_id,
            request.device_id
        );
        tracing::debug!("Sending token exchange request to: {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", assertion))
            .header("Cache-Control", "no-cache")
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Received error: failed to send token exchange request: {}", e);
                ApiError::from(e)
            })?;

        let status = response.status();
        tracing::debug!("Received response with status: {}", status);

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            tracing::error!(
                "Received error: token exchange failed: HTTP {} - {}",
                status.as_u16(),
                error_body
            );

            return Err(ApiError::Http {
                status: status.as_u16(),
                message: error_body,
            });
        }

        let body = response.text().await.map_err(|e| {
            tracing::error!("Received error: failed to read token response body: {}", e);
            ApiError::Request(format!("Failed to read response body: {}", e))
        })?;

        tracing::info!("Access token issued ({} bytes)", body.len());
        Ok(ExchangedToken::new(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(scope: &str) -> ExchangeRequest {
        ExchangeRequest {
            cloud_region: "us-central1".to_string(),
            project_id: "proj1".to_string(),
            registry_id: "reg1".to_string(),
            device_id: "dev1".to_string(),
            scope: scope.to_string(),
        }
    }

    #[test]
    fn test_url_is_literal() {
        let url = request("a b").url(DEFAULT_TOKEN_ENDPOINT);
        assert_eq!(
            url,
            "https://cloudiottoken.googleapis.com/v1alpha1/projects/proj1/locations/us-central1/registries/reg1/devices/dev1:generateAccessToken?scope=a b"
        );
    }

    #[test]
    fn test_url_trims_trailing_slash_on_base() {
        let url = request("s").url("http://localhost:8080/");
        assert!(url.starts_with("http://localhost:8080/v1alpha1/projects/proj1/"));
    }

    #[test]
    fn test_default_client_uses_public_endpoint() {
        let client = TokenClient::default();
        assert_eq!(client.base_url(), "https://cloudiottoken.googleapis.com");
    }
}
