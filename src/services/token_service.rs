use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;
use uuid::Uuid;

use crate::config::SecuritySettings;
use crate::errors::{InternalError, TokenError};
use crate::types::internal::Claims;

/// A freshly minted access token together with its metadata
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub jti: String,
    pub expires_at: i64,
}

/// Manages JWT generation and validation
///
/// The signing secret lives in process configuration and is never embedded
/// in the token. Verification is read-only.
pub struct TokenService {
    secret: String,
    issuer: String,
    audience: String,
    lifetime_secs: i64,
}

impl TokenService {
    pub fn new(settings: &SecuritySettings) -> Self {
        Self {
            secret: settings.jwt_secret.clone(),
            issuer: settings.jwt_issuer.clone(),
            audience: settings.jwt_audience.clone(),
            lifetime_secs: settings.token_lifetime_secs,
        }
    }

    /// Issue a token for an authenticated subject
    pub fn issue(&self, user_id: &str) -> Result<IssuedToken, InternalError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue with an explicit clock; the time-sensitive paths are tested
    /// through this entry point
    pub fn issue_at(&self, user_id: &str, now: DateTime<Utc>) -> Result<IssuedToken, InternalError> {
        let iat = now.timestamp();
        let claims = Claims {
            iss: self.issuer.clone(),
            sub: user_id.to_string(),
            aud: self.audience.clone(),
            exp: iat + self.lifetime_secs,
            nbf: iat,
            iat,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| InternalError::crypto("encode_jwt", e.to_string()))?;

        Ok(IssuedToken {
            token,
            jti: claims.jti,
            expires_at: claims.exp,
        })
    }

    /// Verify a bearer token and return its claims
    ///
    /// Checks signature, expiry, not-before, issuer and audience with zero
    /// leeway. Resolving the subject to a user is the auth service's job.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.validate_nbf = true;
        validation.leeway = 0;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        })?;

        Ok(token_data.claims)
    }

    pub fn lifetime_secs(&self) -> i64 {
        self.lifetime_secs
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("lifetime_secs", &self.lifetime_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_settings() -> SecuritySettings {
        SecuritySettings {
            jwt_secret: "test-secret-key-minimum-32-characters-long".to_string(),
            jwt_issuer: "bookstash".to_string(),
            jwt_audience: "bookstash-api".to_string(),
            token_lifetime_secs: 4 * 60 * 60,
            password_pepper: "test-pepper-minimum-32-characters-long!".to_string(),
            lockout_threshold: 5,
            lockout_duration_secs: 900,
            max_roles_per_user: 10,
            max_permissions_per_role: 50,
        }
    }

    fn service() -> TokenService {
        TokenService::new(&test_settings())
    }

    #[test]
    fn test_issue_then_verify_round_trips() {
        let service = service();
        let issued = service.issue("user-123").unwrap();

        let claims = service.verify(&issued.token).unwrap();
        assert_eq!(claims.sub, "user-123");
        assert_eq!(claims.iss, "bookstash");
        assert_eq!(claims.aud, "bookstash-api");
        assert_eq!(claims.jti, issued.jti);
    }

    #[test]
    fn test_issued_claims_carry_four_hour_lifetime() {
        let service = service();
        let issued = service.issue("user-123").unwrap();
        let claims = service.verify(&issued.token).unwrap();

        assert_eq!(claims.exp - claims.iat, 4 * 60 * 60);
        assert_eq!(claims.nbf, claims.iat);
        assert_eq!(issued.expires_at, claims.exp);
    }

    #[test]
    fn test_each_token_gets_unique_jti() {
        let service = service();
        let first = service.issue("user-123").unwrap();
        let second = service.issue("user-123").unwrap();

        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn test_verify_fails_with_wrong_secret() {
        let issued = service().issue("user-123").unwrap();

        let mut other_settings = test_settings();
        other_settings.jwt_secret = "wrong-secret-key-minimum-32-characters!".to_string();
        let other = TokenService::new(&other_settings);

        match other.verify(&issued.token) {
            Err(TokenError::Invalid) => {}
            other => panic!("Expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_verify_fails_on_single_byte_tampering() {
        let service = service();
        let issued = service.issue("user-123").unwrap();

        // Flip one character of the signature segment
        let mut tampered = issued.token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        match service.verify(&tampered) {
            Err(TokenError::Invalid) => {}
            other => panic!("Expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let service = service();
        // Issued far enough in the past that exp has already passed
        let issued_at = Utc::now() - chrono::Duration::seconds(4 * 60 * 60 + 10);
        let issued = service.issue_at("user-123", issued_at).unwrap();

        match service.verify(&issued.token) {
            Err(TokenError::Expired) => {}
            other => panic!("Expected Expired, got {other:?}"),
        }
    }

    #[test]
    fn test_verify_rejects_not_yet_valid_token() {
        let service = service();
        let issued = service
            .issue_at("user-123", Utc::now() + chrono::Duration::seconds(120))
            .unwrap();

        match service.verify(&issued.token) {
            Err(TokenError::Invalid) => {}
            other => panic!("Expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_verify_rejects_wrong_audience() {
        let issued = service().issue("user-123").unwrap();

        let mut other_settings = test_settings();
        other_settings.jwt_audience = "some-other-service".to_string();
        let other = TokenService::new(&other_settings);

        match other.verify(&issued.token) {
            Err(TokenError::Invalid) => {}
            other => panic!("Expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_verify_rejects_garbage() {
        match service().verify("not.a.jwt") {
            Err(TokenError::Invalid) => {}
            other => panic!("Expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_debug_does_not_expose_secret() {
        let debug_output = format!("{:?}", service());

        assert!(!debug_output.contains("test-secret-key"));
        assert!(debug_output.contains("<redacted>"));
    }
}
