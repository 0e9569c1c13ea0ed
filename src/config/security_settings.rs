use std::env;
use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Security configuration loaded once at startup
///
/// Environment override → default priority, validated on load. Secrets are
/// redacted from Debug output.
pub struct SecuritySettings {
    /// HS256 signing secret; required, minimum 32 bytes
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    /// Access token lifetime in seconds
    pub token_lifetime_secs: i64,

    /// Secret mixed into Argon2 hashing; required
    pub password_pepper: String,

    /// Failed attempts before the account locks
    pub lockout_threshold: u32,
    /// Lock duration in seconds once the threshold is reached
    pub lockout_duration_secs: i64,

    pub max_roles_per_user: usize,
    pub max_permissions_per_role: usize,
}

impl SecuritySettings {
    /// Load settings from environment variables
    ///
    /// JWT_SECRET and PASSWORD_PEPPER are required; everything else falls
    /// back to a validated default.
    pub fn from_env() -> Result<Self, SettingsError> {
        let jwt_secret = env::var("JWT_SECRET").map_err(|_| SettingsError::Missing("JWT_SECRET"))?;
        Self::validate_secret("JWT_SECRET", &jwt_secret)?;

        let password_pepper =
            env::var("PASSWORD_PEPPER").map_err(|_| SettingsError::Missing("PASSWORD_PEPPER"))?;
        Self::validate_secret("PASSWORD_PEPPER", &password_pepper)?;

        Ok(Self {
            jwt_secret,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "bookstash".to_string()),
            jwt_audience: env::var("JWT_AUDIENCE").unwrap_or_else(|_| "bookstash-api".to_string()),
            token_lifetime_secs: Self::parse_positive_i64(
                "TOKEN_LIFETIME_SECS",
                env::var("TOKEN_LIFETIME_SECS").ok(),
                4 * 60 * 60,
            )?,
            password_pepper,
            lockout_threshold: Self::parse_threshold(env::var("LOCKOUT_THRESHOLD").ok())?,
            lockout_duration_secs: Self::parse_positive_i64(
                "LOCKOUT_DURATION_SECS",
                env::var("LOCKOUT_DURATION_SECS").ok(),
                15 * 60,
            )?,
            max_roles_per_user: Self::parse_limit(
                "MAX_ROLES_PER_USER",
                env::var("MAX_ROLES_PER_USER").ok(),
                10,
            )?,
            max_permissions_per_role: Self::parse_limit(
                "MAX_PERMISSIONS_PER_ROLE",
                env::var("MAX_PERMISSIONS_PER_ROLE").ok(),
                50,
            )?,
        })
    }

    fn validate_secret(name: &'static str, value: &str) -> Result<(), SettingsError> {
        if value.len() < 32 {
            return Err(SettingsError::Invalid {
                name,
                reason: "must be at least 32 characters".to_string(),
            });
        }
        Ok(())
    }

    fn parse_positive_i64(
        name: &'static str,
        value: Option<String>,
        default: i64,
    ) -> Result<i64, SettingsError> {
        match value {
            None => Ok(default),
            Some(raw) => {
                let parsed = raw.parse::<i64>().map_err(|e| SettingsError::Invalid {
                    name,
                    reason: e.to_string(),
                })?;
                if parsed <= 0 {
                    return Err(SettingsError::Invalid {
                        name,
                        reason: "must be a positive number of seconds".to_string(),
                    });
                }
                Ok(parsed)
            }
        }
    }

    fn parse_threshold(value: Option<String>) -> Result<u32, SettingsError> {
        match value {
            None => Ok(5),
            Some(raw) => {
                let parsed = raw.parse::<u32>().map_err(|e| SettingsError::Invalid {
                    name: "LOCKOUT_THRESHOLD",
                    reason: e.to_string(),
                })?;
                if parsed == 0 {
                    return Err(SettingsError::Invalid {
                        name: "LOCKOUT_THRESHOLD",
                        reason: "must be at least 1".to_string(),
                    });
                }
                Ok(parsed)
            }
        }
    }

    fn parse_limit(
        name: &'static str,
        value: Option<String>,
        default: usize,
    ) -> Result<usize, SettingsError> {
        match value {
            None => Ok(default),
            Some(raw) => {
                let parsed = raw.parse::<usize>().map_err(|e| SettingsError::Invalid {
                    name,
                    reason: e.to_string(),
                })?;
                if parsed == 0 {
                    return Err(SettingsError::Invalid {
                        name,
                        reason: "must be at least 1".to_string(),
                    });
                }
                Ok(parsed)
            }
        }
    }
}

impl fmt::Debug for SecuritySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecuritySettings")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_issuer", &self.jwt_issuer)
            .field("jwt_audience", &self.jwt_audience)
            .field("token_lifetime_secs", &self.token_lifetime_secs)
            .field("password_pepper", &"<redacted>")
            .field("lockout_threshold", &self.lockout_threshold)
            .field("lockout_duration_secs", &self.lockout_duration_secs)
            .field("max_roles_per_user", &self.max_roles_per_user)
            .field("max_permissions_per_role", &self.max_permissions_per_role)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_secret_rejects_short_values() {
        assert!(SecuritySettings::validate_secret("JWT_SECRET", "too-short").is_err());
        assert!(
            SecuritySettings::validate_secret("JWT_SECRET", "a-secret-of-exactly-32-chars-yes")
                .is_ok()
        );
    }

    #[test]
    fn test_parse_positive_i64_defaults_and_validates() {
        assert_eq!(
            SecuritySettings::parse_positive_i64("TOKEN_LIFETIME_SECS", None, 14400).unwrap(),
            14400
        );
        assert_eq!(
            SecuritySettings::parse_positive_i64(
                "TOKEN_LIFETIME_SECS",
                Some("3600".to_string()),
                14400
            )
            .unwrap(),
            3600
        );
        assert!(SecuritySettings::parse_positive_i64(
            "TOKEN_LIFETIME_SECS",
            Some("0".to_string()),
            14400
        )
        .is_err());
        assert!(SecuritySettings::parse_positive_i64(
            "TOKEN_LIFETIME_SECS",
            Some("not_a_number".to_string()),
            14400
        )
        .is_err());
    }

    #[test]
    fn test_parse_threshold_defaults_to_five() {
        assert_eq!(SecuritySettings::parse_threshold(None).unwrap(), 5);
        assert_eq!(
            SecuritySettings::parse_threshold(Some("3".to_string())).unwrap(),
            3
        );
        assert!(SecuritySettings::parse_threshold(Some("0".to_string())).is_err());
    }

    #[test]
    fn test_parse_limit_defaults_and_validates() {
        assert_eq!(
            SecuritySettings::parse_limit("MAX_ROLES_PER_USER", None, 10).unwrap(),
            10
        );
        assert!(
            SecuritySettings::parse_limit("MAX_ROLES_PER_USER", Some("0".to_string()), 10).is_err()
        );
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let settings = SecuritySettings {
            jwt_secret: "super-secret-jwt-key-minimum-32-chars!!".to_string(),
            jwt_issuer: "bookstash".to_string(),
            jwt_audience: "bookstash-api".to_string(),
            token_lifetime_secs: 14400,
            password_pepper: "super-secret-pepper-minimum-32-chars!!!".to_string(),
            lockout_threshold: 5,
            lockout_duration_secs: 900,
            max_roles_per_user: 10,
            max_permissions_per_role: 50,
        };

        let debug_output = format!("{:?}", settings);
        assert!(!debug_output.contains("super-secret-jwt-key"));
        assert!(!debug_output.contains("super-secret-pepper"));
        assert_eq!(debug_output.matches("<redacted>").count(), 2);
    }
}
