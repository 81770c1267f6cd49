use crate::iot_token::types::IotTokenError;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Validity window of a device JWT, in seconds (20 minutes)
pub const DEVICE_JWT_LIFETIME_SECS: i64 = 20 * 60;

/// Claims carried by a device JWT
///
/// The token service only looks at these three fields. The audience is the
/// Cloud project that owns the device registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceClaims {
    /// Issued at time (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Audience - the project ID
    pub aud: String,
}

impl DeviceClaims {
    /// Build claims issued at `issued_at`, expiring `DEVICE_JWT_LIFETIME_SECS` later
    pub fn new(project_id: impl Into<String>, issued_at: i64) -> Self {
        Self {
            iat: issued_at,
            exp: issued_at + DEVICE_JWT_LIFETIME_SECS,
            aud: project_id.into(),
        }
    }
}

/// Map an algorithm name such as `RS256` to a signing algorithm
pub fn parse_algorithm(name: &str) -> Result<Algorithm, IotTokenError> {
    Algorithm::from_str(name)
        .map_err(|_| IotTokenError::Signing(format!("Unsupported signing algorithm: {}", name)))
}

/// Read the device private key from disk
///
/// Errors are returned as-is; a missing key is fatal for the caller.
pub fn load_private_key(path: impl AsRef<Path>) -> Result<Vec<u8>, IotTokenError> {
    let path = path.as_ref();
    tracing::debug!("Reading device private key from {}", path.display());

    std::fs::read(path).map_err(|source| {
        tracing::error!("Failed to read private key {}: {}", path.display(), source);
        IotTokenError::KeyFile {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Turn raw key material into an encoding key for the algorithm's family
///
/// HMAC algorithms take the bytes as the shared secret; every other family
/// expects a PEM-encoded private key.
fn encoding_key(algorithm: Algorithm, key_material: &[u8]) -> Result<EncodingKey, IotTokenError> {
    let key = match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
            return Ok(EncodingKey::from_secret(key_material));
        }
        Algorithm::ES256 | Algorithm::ES384 => EncodingKey::from_ec_pem(key_material),
        Algorithm::EdDSA => EncodingKey::from_ed_pem(key_material),
        // RS* and PS*
        _ => EncodingKey::from_rsa_pem(key_material),
    };

    key.map_err(|e| {
        IotTokenError::Signing(format!(
            "Key material is not a valid {:?} private key: {}",
            algorithm, e
        ))
    })
}

/// Sign a device JWT with an explicit issue time
///
/// `mint_device_jwt` calls this with the current time.
pub fn mint_device_jwt_at(
    project_id: &str,
    algorithm: &str,
    key_material: &[u8],
    issued_at: i64,
) -> Result<String, IotTokenError> {
    let alg = parse_algorithm(algorithm)?;
    let key = encoding_key(alg, key_material)?;
    let claims = DeviceClaims::new(project_id, issued_at);

    let token = encode(&Header::new(alg), &claims, &key).inspect_err(|e| {
        tracing::error!("Failed to sign device JWT with {}: {}", algorithm, e);
    })?;

    tracing::debug!(
        "Minted device JWT: alg={}, aud={}, iat={}, exp={}",
        algorithm,
        claims.aud,
        claims.iat,
        claims.exp
    );
    Ok(token)
}

/// Sign a device JWT for `project_id`, valid for the next 20 minutes
///
/// # Arguments
///
/// * `project_id` - Cloud project ID, used as the `aud` claim
/// * `algorithm` - JWT algorithm name, e.g. `RS256` or `ES256`
/// * `key_material` - PEM private key (or the raw secret for `HS*`)
///
/// # Example
///
/// ```no_run
/// use cloudiot_token::{load_private_key, mint_device_jwt};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let key = load_private_key("rsa_private.pem")?;
/// let jwt = mint_device_jwt("my-project", "RS256", &key)?;
/// println!("{}", jwt);
/// # Ok(())
/// # }
/// ```
pub fn mint_device_jwt(
    project_id: &str,
    algorithm: &str,
    key_material: &[u8],
) -> Result<String, IotTokenError> {
    mint_device_jwt_at(
        project_id,
        algorithm,
        key_material,
        chrono::Utc::now().timestamp(),
    )
}
