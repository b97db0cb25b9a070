/// Field validators shared by direct creation, updates, and CSV import
///
/// All three write paths apply the same rules:
///
/// - name: 2-100 characters after trimming, restricted to letters,
///   digits, whitespace, `-`, `_` and `.`
/// - email: RFC-plausible format, at most 254 characters, normalized
///   to trimmed lowercase before any comparison or storage
/// - password: non-empty, at most 500 characters, no surrounding
///   whitespace (the raw value is hashed elsewhere, never stored)
use validator::ValidateEmail;

use crate::error::{DirectoryError, DirectoryResult};

/// Maximum email length (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Maximum raw password length
pub const MAX_PASSWORD_LEN: usize = 500;

fn name_char_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || c.is_whitespace() || matches!(c, '-' | '_' | '.')
}

/// Validates and trims an account name
pub fn validate_name(raw: &str) -> DirectoryResult<String> {
    let name = raw.trim();
    if name.chars().count() < 2 || name.chars().count() > 100 {
        return Err(DirectoryError::validation(
            "name",
            "Name must be 2-100 characters",
        ));
    }
    if !name.chars().all(name_char_allowed) {
        return Err(DirectoryError::validation(
            "name",
            "Name contains invalid characters",
        ));
    }
    Ok(name.to_string())
}

/// Normalizes and validates an email address
///
/// Returns the trimmed, lowercased form; all uniqueness checks and
/// storage operate on this normalized value.
pub fn normalize_email(raw: &str) -> DirectoryResult<String> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err(DirectoryError::validation("email", "Email is required"));
    }
    if !email.validate_email() {
        return Err(DirectoryError::validation("email", "Invalid email format"));
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err(DirectoryError::validation(
            "email",
            "Email address is too long (max 254 characters)",
        ));
    }
    Ok(email)
}

/// Validates a raw password prior to hashing
pub fn validate_password(raw: &str) -> DirectoryResult<()> {
    if raw.is_empty() {
        return Err(DirectoryError::validation(
            "password",
            "Password is required",
        ));
    }
    if raw.len() > MAX_PASSWORD_LEN {
        return Err(DirectoryError::validation(
            "password",
            "Password is too long (max 500 characters)",
        ));
    }
    if raw.trim() != raw {
        return Err(DirectoryError::validation(
            "password",
            "Password cannot have leading or trailing whitespace",
        ));
    }
    Ok(())
}
