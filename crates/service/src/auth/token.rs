//! HS256 session tokens carrying the account's identity and role.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::domain::{AuthUser, SessionClaims};
use super::errors::AuthError;

pub fn issue(user: &AuthUser, secret: &str, ttl: Duration, now: DateTime<Utc>) -> Result<String, AuthError> {
    let claims = SessionClaims {
        id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        role: user.role,
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };
    encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AuthError::TokenError(e.to_string()))
}

/// Signature and expiry are both checked, with no clock leeway.
pub fn verify(token: &str, secret: &str) -> Result<SessionClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    decode::<SessionClaims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::InvalidToken("token expired".into()),
            _ => AuthError::InvalidToken(e.to_string()),
        })
}
