/// JWT Token Issuance and Verification
///
/// Tokens are stateless: validity is the signature plus `exp`, nothing is
/// stored server-side.

use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::Claims;
use crate::configuration::AuthSettings;
use crate::error::{AppError, AuthError};

/// Lifetime used when the caller does not pass one
pub const DEFAULT_ACCESS_TOKEN_TTL_MINUTES: i64 = 15;

/// Issue a signed access token asserting `subject`
///
/// # Arguments
/// * `subject` - Username the token speaks for
/// * `ttl` - Token lifetime, 15 minutes when `None`
/// * `settings` - Secret and signing algorithm
///
/// # Errors
/// Returns error if signing fails
pub fn issue_access_token(
    subject: &str,
    ttl: Option<Duration>,
    settings: &AuthSettings,
) -> Result<String, AppError> {
    let ttl = ttl.unwrap_or_else(|| Duration::minutes(DEFAULT_ACCESS_TOKEN_TTL_MINUTES));
    let claims = Claims::new(subject, ttl);

    encode(
        &Header::new(settings.algorithm),
        &claims,
        &EncodingKey::from_secret(settings.secret_key.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// Verify an access token and return its subject
///
/// # Errors
/// * `TokenMalformed` - not a decodable JWT, or required claims missing
/// * `TokenSignatureInvalid` - wrong secret or algorithm
/// * `TokenExpired` - `exp` is not in the future
/// * `SubjectMissing` - no usable `sub` claim
pub fn verify_access_token(token: &str, settings: &AuthSettings) -> Result<String, AuthError> {
    let mut validation = Validation::new(settings.algorithm);
    validation.leeway = 0;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.secret_key.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        let reason = match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                AuthError::TokenSignatureInvalid
            }
            _ => AuthError::TokenMalformed,
        };
        tracing::debug!(error = %e, reason = %reason, "JWT validation error");
        reason
    })?;

    // jsonwebtoken accepts exp == now; a token is already dead at that second
    if claims.is_expired() {
        return Err(AuthError::TokenExpired);
    }

    claims
        .subject()
        .map(str::to_string)
        .ok_or(AuthError::SubjectMissing)
}
