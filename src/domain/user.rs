use chrono::{DateTime, Utc};

use super::errors::{check_length, DomainError};

// Column sizes of the users table.
const NAME_MAX: usize = 255;
const PHONE_MAX: usize = 50;
const EMAIL_MAX: usize = 255;
const ADDRESS_MAX: usize = 255;

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    /// Argon2 PHC string, see `application::password`.
    pub password_hash: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

/// A user ready to be persisted; the password is already hashed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
    pub address: String,
}

/// Sign-up data as submitted by the client.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PasswordChange {
    pub current: String,
    pub new: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub password: Option<PasswordChange>,
}

/// Checks the profile fields against the sizes of their columns.
pub fn validate_profile(
    name: &str,
    phone: &str,
    email: &str,
    address: &str,
) -> Result<(), DomainError> {
    check_length("name", name, NAME_MAX)?;
    check_length("phone", phone, PHONE_MAX)?;
    check_length("email", email, EMAIL_MAX)?;
    check_length("address", address, ADDRESS_MAX)
}

/// Loose structural check: one `@`, non-empty local part, dotted domain.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_fields_fit_their_columns() {
        let email = format!("{}@example.com", "j".repeat(243));
        assert_eq!(email.len(), 255);
        assert!(validate_profile("Juan", "+54 11", &email, "").is_ok());
        assert!(validate_profile("Juan", "+54 11", &format!("j{}", email), "").is_err());
        assert!(validate_profile(&"n".repeat(256), "", "juan@example.com", "").is_err());
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("juan@example.com"));
        assert!(!is_valid_email("juan.example.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("juan@localhost"));
        assert!(!is_valid_email("juan@@example.com"));
        assert!(!is_valid_email("juan perez@example.com"));
    }
}
