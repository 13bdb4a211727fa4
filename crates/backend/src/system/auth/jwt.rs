use contracts::system::auth::TokenClaims;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::shared::error::ApiError;

/// Validates an HS256 token issued by the identity provider and extracts claims
pub fn validate_token(secret: &str, token: &str) -> Result<TokenClaims, ApiError> {
    if secret.is_empty() {
        return Err(ApiError::Unauthorized("token_invalid"));
    }
    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => ApiError::Unauthorized("token_expired"),
        _ => {
            tracing::debug!("Rejected token: {}", e);
            ApiError::Unauthorized("token_invalid")
        }
    })?;

    if token_data.claims.sub.trim().is_empty() {
        return Err(ApiError::Unauthorized("token_invalid"));
    }
    Ok(token_data.claims)
}

/// Token from the `x-authorization` value; a `Bearer` scheme is optional
/// and matched case-insensitively
pub fn token_from_header(value: Option<&str>) -> Result<&str, ApiError> {
    let raw = value.map(str::trim).unwrap_or_default();
    let token = match raw.get(..6) {
        Some(scheme) if scheme.eq_ignore_ascii_case("bearer") => {
            let rest = &raw[6..];
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                rest.trim()
            } else {
                raw
            }
        }
        _ => raw,
    };
    if token.is_empty() {
        return Err(ApiError::Unauthorized("token_missing"));
    }
    Ok(token)
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;
    use contracts::system::auth::TokenClaims;
    use jsonwebtoken::{encode, EncodingKey, Header};

    /// Signs a token the way the identity provider does
    pub fn issue_token(secret: &str, user_id: &str, ttl_secs: i64) -> String {
        let now = Utc::now().timestamp();
        let claims = TokenClaims {
            sub: user_id.to_string(),
            email: None,
            exp: (now + ttl_secs) as usize,
            iat: now as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::issue_token;
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_valid_token() {
        let token = issue_token(SECRET, "user-1", 3600);
        let claims = validate_token(SECRET, &token).unwrap();
        assert_eq!(claims.sub, "user-1");
    }

    #[test]
    fn test_expired_token() {
        let token = issue_token(SECRET, "user-1", -7200);
        assert!(matches!(
            validate_token(SECRET, &token),
            Err(ApiError::Unauthorized("token_expired"))
        ));
    }

    #[test]
    fn test_wrong_secret_and_garbage() {
        let token = issue_token("other-secret", "user-1", 3600);
        assert!(matches!(
            validate_token(SECRET, &token),
            Err(ApiError::Unauthorized("token_invalid"))
        ));
        assert!(matches!(
            validate_token(SECRET, "not-a-jwt"),
            Err(ApiError::Unauthorized("token_invalid"))
        ));
    }

    #[test]
    fn test_unconfigured_secret_rejects_everything() {
        let token = issue_token(SECRET, "user-1", 3600);
        assert!(matches!(
            validate_token("", &token),
            Err(ApiError::Unauthorized("token_invalid"))
        ));
    }

    #[test]
    fn test_token_from_header() {
        assert_eq!(token_from_header(Some("Bearer abc")).unwrap(), "abc");
        assert_eq!(token_from_header(Some("abc")).unwrap(), "abc");
        assert!(matches!(
            token_from_header(None),
            Err(ApiError::Unauthorized("token_missing"))
        ));
        assert!(matches!(
            token_from_header(Some("Bearer  ")),
            Err(ApiError::Unauthorized("token_missing"))
        ));
    }

    #[test]
    fn test_token_from_header_blank_bearer_is_missing() {
        for value in ["Bearer", "bearer ", "  BEARER\t", ""] {
            assert!(
                matches!(
                    token_from_header(Some(value)),
                    Err(ApiError::Unauthorized("token_missing"))
                ),
                "{value:?}"
            );
        }
        assert_eq!(token_from_header(Some("bearer  xyz ")).unwrap(), "xyz");
        assert_eq!(token_from_header(Some("Bearerxyz")).unwrap(), "Bearerxyz");
    }
}
