/// RS256 access tokens for store services.
///
/// Keys are installed once at startup with [`initialize_jwt_keys`] and are
/// immutable afterwards. Tokens carry the caller's numeric user id, username
/// and staff flag so that permission checks do not need a database round trip.
///
/// ```no_run
/// use crypto_core::jwt;
///
/// let private_key = std::env::var("JWT_PRIVATE_KEY_PEM").unwrap();
/// let public_key = std::env::var("JWT_PUBLIC_KEY_PEM").unwrap();
/// jwt::initialize_jwt_keys(&private_key, &public_key).unwrap();
///
/// let token = jwt::generate_access_token(7, "alice", false, 3600).unwrap();
/// let claims = jwt::validate_token(&token).unwrap().claims;
/// assert_eq!(claims.user_id().unwrap(), 7);
/// ```
use anyhow::{anyhow, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

/// Only asymmetric signing is accepted.
const JWT_ALGORITHM: Algorithm = Algorithm::RS256;

const ACCESS_TOKEN_TYPE: &str = "access";

/// Claims carried by a store access token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: user id as a decimal string
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    pub token_type: String,
    pub username: String,
    #[serde(default)]
    pub is_staff: bool,
}

impl Claims {
    /// Parse the numeric user id out of `sub`
    pub fn user_id(&self) -> Result<i64> {
        self.sub
            .parse::<i64>()
            .map_err(|e| anyhow!("Invalid user id in token subject: {e}"))
    }
}

/// Body returned to clients after a successful login
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

static JWT_ENCODING_KEY: OnceCell<EncodingKey> = OnceCell::new();
static JWT_DECODING_KEY: OnceCell<DecodingKey> = OnceCell::new();

/// Install the RSA key pair used to sign and verify tokens.
///
/// Fails when a PEM is malformed or when keys were already installed.
pub fn initialize_jwt_keys(private_key_pem: &str, public_key_pem: &str) -> Result<()> {
    let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
        .map_err(|e| anyhow!("Failed to parse RSA private key: {e}"))?;
    let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
        .map_err(|e| anyhow!("Failed to parse RSA public key: {e}"))?;

    JWT_ENCODING_KEY
        .set(encoding_key)
        .map_err(|_| anyhow!("JWT encoding key already initialized"))?;
    JWT_DECODING_KEY
        .set(decoding_key)
        .map_err(|_| anyhow!("JWT decoding key already initialized"))?;

    tracing::debug!("JWT keys initialized");
    Ok(())
}

/// True once [`initialize_jwt_keys`] has succeeded
pub fn keys_initialized() -> bool {
    JWT_ENCODING_KEY.get().is_some() && JWT_DECODING_KEY.get().is_some()
}

fn get_encoding_key() -> Result<&'static EncodingKey> {
    JWT_ENCODING_KEY.get().ok_or_else(|| {
        anyhow!("JWT keys not initialized. Call initialize_jwt_keys() during startup.")
    })
}

fn get_decoding_key() -> Result<&'static DecodingKey> {
    JWT_DECODING_KEY.get().ok_or_else(|| {
        anyhow!("JWT keys not initialized. Call initialize_jwt_keys() during startup.")
    })
}

/// Sign an access token for `user_id` valid for `ttl_secs` seconds
pub fn generate_access_token(
    user_id: i64,
    username: &str,
    is_staff: bool,
    ttl_secs: i64,
) -> Result<String> {
    if ttl_secs <= 0 {
        return Err(anyhow!("Token lifetime must be positive, got {ttl_secs}"));
    }

    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(ttl_secs)).timestamp(),
        token_type: ACCESS_TOKEN_TYPE.to_string(),
        username: username.to_string(),
        is_staff,
    };

    encode(&Header::new(JWT_ALGORITHM), &claims, get_encoding_key()?)
        .map_err(|e| anyhow!("Failed to generate access token: {e}"))
}

/// Sign an access token and wrap it in the login response body
pub fn issue_token_response(
    user_id: i64,
    username: &str,
    is_staff: bool,
    ttl_secs: i64,
) -> Result<TokenResponse> {
    Ok(TokenResponse {
        access_token: generate_access_token(user_id, username, is_staff, ttl_secs)?,
        token_type: "Bearer".to_string(),
        expires_in: ttl_secs,
    })
}

/// Verify signature, expiry and token type, returning the decoded claims
pub fn validate_token(token: &str) -> Result<TokenData<Claims>> {
    let mut validation = Validation::new(JWT_ALGORITHM);
    validation.validate_exp = true;
    validation.leeway = 0;

    let data = decode::<Claims>(token, get_decoding_key()?, &validation)
        .map_err(|e| anyhow!("Token validation failed: {e}"))?;

    if data.claims.token_type != ACCESS_TOKEN_TYPE {
        return Err(anyhow!(
            "Unexpected token type: {}",
            data.claims.token_type
        ));
    }

    Ok(data)
}
