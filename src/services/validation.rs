use crate::errors::RbacError;

/// Centralized validation rules
pub const USERNAME_MIN_LENGTH: usize = 3;
pub const USERNAME_MAX_LENGTH: usize = 100;
pub const PASSWORD_MIN_LENGTH: usize = 8;
pub const NAME_MAX_LENGTH: usize = 100;
pub const EMAIL_MAX_LENGTH: usize = 255;

const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Validate and normalize a username
///
/// 3-100 characters, letters/digits/underscore/dot/hyphen only.
pub fn validate_username(value: &str) -> Result<String, RbacError> {
    let value = value.trim();

    if value.len() < USERNAME_MIN_LENGTH {
        return Err(RbacError::validation(
            "username",
            format!("must be at least {USERNAME_MIN_LENGTH} characters long"),
        ));
    }
    if value.len() > USERNAME_MAX_LENGTH {
        return Err(RbacError::validation(
            "username",
            format!("must be at most {USERNAME_MAX_LENGTH} characters long"),
        ));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return Err(RbacError::validation(
            "username",
            "must contain only letters, numbers, underscores, dots and hyphens",
        ));
    }

    Ok(value.to_string())
}

/// Validate password strength
///
/// At least 8 characters with one uppercase, one lowercase, one digit and
/// one special character.
pub fn validate_password(value: &str) -> Result<(), RbacError> {
    if value.len() < PASSWORD_MIN_LENGTH {
        return Err(RbacError::validation(
            "password",
            format!("must be at least {PASSWORD_MIN_LENGTH} characters"),
        ));
    }
    if !value.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(RbacError::validation(
            "password",
            "must contain at least one uppercase letter",
        ));
    }
    if !value.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(RbacError::validation(
            "password",
            "must contain at least one lowercase letter",
        ));
    }
    if !value.chars().any(|c| c.is_ascii_digit()) {
        return Err(RbacError::validation(
            "password",
            "must contain at least one number",
        ));
    }
    if !value.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c)) {
        return Err(RbacError::validation(
            "password",
            "must contain at least one special character",
        ));
    }

    Ok(())
}

/// Validate and normalize an email address
///
/// Deliberately shallow: one '@' with non-empty local and domain parts, a
/// dot in the domain. Real verification happens out of band.
pub fn validate_email(value: &str) -> Result<String, RbacError> {
    let value = value.trim();

    if value.is_empty() || value.len() > EMAIL_MAX_LENGTH {
        return Err(RbacError::validation(
            "email",
            format!("must be between 1 and {EMAIL_MAX_LENGTH} characters"),
        ));
    }

    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(RbacError::validation("email", "is not a valid address"));
    }

    Ok(value.to_string())
}

/// Validate and normalize an entity display name (role, permission)
pub fn validate_name(value: &str, field: &'static str) -> Result<String, RbacError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(RbacError::validation(field, "cannot be empty"));
    }
    if value.len() > NAME_MAX_LENGTH {
        return Err(RbacError::validation(
            field,
            format!("must be at most {NAME_MAX_LENGTH} characters long"),
        ));
    }

    Ok(value.to_string())
}
