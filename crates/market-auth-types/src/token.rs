//! JWT access-token issuance and validation.

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;
#[cfg(any(feature = "USE_ONLY_IN_API_SERVICE", test))]
use serde::Serialize;
use uuid::Uuid;

/// Access-token lifetime in seconds (7 days).
pub const ACCESS_TOKEN_TTL: u64 = 60 * 60 * 24 * 7;

/// User identity extracted from a validated access token.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub user_id: Uuid,
    /// `iat` — compared against the user's session-invalidation watermark.
    pub issued_at: u64,
    pub expires_at: u64,
}

/// Errors returned by [`validate_access_token`].
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

/// JWT claims payload shared by token creation (api service) and validation
/// (api extractor, realtime gateway).
///
/// `iat` rides in the token so validators can reject tokens issued before the
/// user's `accept_token_after` watermark without re-contacting the issuer.
///
/// [`Deserialize`] is always available — all consumers validate tokens.
/// [`Serialize`] requires the **`USE_ONLY_IN_API_SERVICE`** cargo feature;
/// only the api service enables it because it is the sole token issuer.
#[derive(Debug, Deserialize)]
#[cfg_attr(any(feature = "USE_ONLY_IN_API_SERVICE", test), derive(Serialize))]
pub struct JwtClaims {
    /// User ID (UUID string).
    pub sub: String,
    /// Issuance timestamp (seconds since UNIX epoch).
    pub iat: u64,
    /// Expiration timestamp (seconds since UNIX epoch).
    pub exp: u64,
}

/// Decode and validate a JWT, returning raw claims.
///
/// Validation: HS256, exp checked, required claims: `exp` + `sub`.
/// Default leeway = 60s — tolerates clock skew between services.
fn decode_jwt(token: &str, secret: &str) -> Result<JwtClaims, TokenError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<JwtClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        _ => TokenError::Malformed,
    })?;

    Ok(data.claims)
}

/// Validate an access-token value, returning the parsed identity.
pub fn validate_access_token(token: &str, secret: &str) -> Result<TokenInfo, TokenError> {
    let claims = decode_jwt(token, secret)?;
    let user_id = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| TokenError::Malformed)?;
    Ok(TokenInfo {
        user_id,
        issued_at: claims.iat,
        expires_at: claims.exp,
    })
}

/// Issue an access token for `user_id`, valid from `issued_at` (seconds since
/// UNIX epoch) for [`ACCESS_TOKEN_TTL`]. Returns the token and its expiry.
///
/// Requires the `USE_ONLY_IN_API_SERVICE` feature.
#[cfg(any(feature = "USE_ONLY_IN_API_SERVICE", test))]
pub fn issue_access_token(
    user_id: Uuid,
    issued_at: u64,
    secret: &str,
) -> Result<(String, u64), jsonwebtoken::errors::Error> {
    use jsonwebtoken::{EncodingKey, Header, encode};

    let exp = issued_at + ACCESS_TOKEN_TTL;
    let claims = JwtClaims {
        sub: user_id.to_string(),
        iat: issued_at,
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok((token, exp))
}
