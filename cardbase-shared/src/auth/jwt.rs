/// JWT token generation and validation module
///
/// Tokens are signed using HS256 (HMAC-SHA256) and carry the numeric user
/// identity as their subject. Two token shapes exist:
///
/// - **Access token**: issued after a successful OAuth login, 8 hour
///   lifetime, presented as `Authorization: Bearer <token>` on every API
///   request.
/// - **Login state token**: a short-lived (10 minute) token wrapping a
///   random nonce, used as the OAuth `state` parameter so CSRF protection
///   needs no server-side session storage.
///
/// # Example
///
/// ```
/// use cardbase_shared::auth::jwt::{create_access_token, validate_access_token, Claims};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let token = create_access_token(42, "secret-key-at-least-32-bytes-long!!")?;
/// let claims = validate_access_token(&token, "secret-key-at-least-32-bytes-long!!")?;
/// assert_eq!(claims.sub, 42);
/// # Ok(())
/// # }
/// ```

use base64::Engine;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Issuer written into and required from every token
const ISSUER: &str = "cardbase";

/// Access token lifetime
const ACCESS_TOKEN_HOURS: i64 = 8;

/// Login state token lifetime
const STATE_TOKEN_MINUTES: i64 = 10;

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,
}

/// Access token claims
///
/// Standard claims plus nothing else: the subject is the stable numeric
/// user identity and that is all the rest of the system consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID
    pub sub: i64,

    /// Issuer - always "cardbase"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates access token claims for a user with the default lifetime
    pub fn new(user_id: i64) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::hours(ACCESS_TOKEN_HOURS);

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }
}

/// Login state claims, used for the OAuth CSRF round-trip
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StateClaims {
    /// Random nonce; its only job is to make every state unique
    nonce: String,

    /// Issuer - always "cardbase"
    iss: String,

    /// Expiration time (Unix timestamp)
    exp: i64,
}

fn decode_claims<T: for<'de> Deserialize<'de>>(token: &str, secret: &str) -> Result<T, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);

    let key = DecodingKey::from_secret(secret.as_bytes());

    decode::<T>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
            _ => JwtError::ValidationError(e.to_string()),
        })
}

/// Creates an access token for a user
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn create_access_token(user_id: i64, secret: &str) -> Result<String, JwtError> {
    let claims = Claims::new(user_id);
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, &claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates an access token and extracts its claims
///
/// Verifies the signature, expiry, and issuer.
///
/// # Errors
///
/// Returns `JwtError::Expired` for expired tokens, or
/// `JwtError::ValidationError` for any other validation failure
pub fn validate_access_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    decode_claims(token, secret)
}

/// Creates a signed OAuth state parameter
///
/// The state is a 10 minute JWT wrapping 32 bytes of randomness, so the
/// callback can verify it statelessly.
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn create_login_state(secret: &str) -> Result<String, JwtError> {
    let mut nonce_bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);
    let nonce = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(nonce_bytes);

    let claims = StateClaims {
        nonce,
        iss: ISSUER.to_string(),
        exp: (Utc::now() + Duration::minutes(STATE_TOKEN_MINUTES)).timestamp(),
    };

    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, &claims, &key)
        .map_err(|e| JwtError::CreateError(format!("State encoding failed: {}", e)))
}

/// Verifies an OAuth state parameter produced by [`create_login_state`]
///
/// # Errors
///
/// Returns `JwtError::Expired` when the login took longer than the state
/// lifetime, or `JwtError::ValidationError` for a forged or mangled state
pub fn verify_login_state(state: &str, secret: &str) -> Result<(), JwtError> {
    decode_claims::<StateClaims>(state, secret).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes!!";

    #[test]
    fn test_access_token_round_trip() {
        let token = create_access_token(42, SECRET).unwrap();
        let claims = validate_access_token(&token, SECRET).unwrap();

        assert_eq!(claims.sub, 42);
        assert_eq!(claims.iss, "cardbase");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_access_token_rejects_wrong_secret() {
        let token = create_access_token(42, SECRET).unwrap();
        let result = validate_access_token(&token, "another-secret-of-sufficient-len!");

        assert!(matches!(result, Err(JwtError::ValidationError(_))));
    }

    #[test]
    fn test_access_token_rejects_garbage() {
        let result = validate_access_token("not-a-token", SECRET);
        assert!(matches!(result, Err(JwtError::ValidationError(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        let claims = Claims {
            sub: 1,
            iss: "cardbase".to_string(),
            iat: Utc::now().timestamp() - 600,
            exp: Utc::now().timestamp() - 300,
        };
        let header = Header::new(Algorithm::HS256);
        let key = EncodingKey::from_secret(SECRET.as_bytes());
        let token = encode(&header, &claims, &key).unwrap();

        assert!(matches!(
            validate_access_token(&token, SECRET),
            Err(JwtError::Expired)
        ));
    }

    #[test]
    fn test_login_state_round_trip() {
        let state = create_login_state(SECRET).unwrap();
        assert!(verify_login_state(&state, SECRET).is_ok());
    }

    #[test]
    fn test_login_states_are_unique() {
        let a = create_login_state(SECRET).unwrap();
        let b = create_login_state(SECRET).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_login_state_rejects_access_token() {
        // An access token is not a valid state: different claim shape.
        let token = create_access_token(42, SECRET).unwrap();
        assert!(verify_login_state(&token, SECRET).is_err());
    }
}
