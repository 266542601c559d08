use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::ports::UserRepository;
use crate::domain::user::{is_valid_email, validate_profile, NewUser, Registration, User, UserPatch};

use super::password::{hash_password, verify_password};

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    pub fn create_user(&self, registration: Registration) -> Result<User, DomainError> {
        let email = normalize_email(&registration.email);
        if registration.name.trim().is_empty() {
            return Err(DomainError::validation("name must not be empty"));
        }
        if !is_valid_email(&email) {
            return Err(DomainError::validation(format!("'{}' is not a valid email", email)));
        }
        if registration.password.is_empty() {
            return Err(DomainError::validation("password must not be empty"));
        }
        let name = registration.name.trim().to_string();
        validate_profile(&name, &registration.phone, &email, &registration.address)?;
        self.ensure_email_free(&email)?;

        let user = self.repo.create(NewUser {
            name,
            phone: registration.phone,
            email,
            password_hash: hash_password(&registration.password)?,
            address: registration.address,
        })?;
        log::info!("Registered user {}", user.id);
        Ok(user)
    }

    pub fn get_user(&self, id: i64) -> Result<User, DomainError> {
        self.repo
            .find_by_id(id)?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<User, DomainError> {
        let email = normalize_email(email);
        self.repo
            .find_by_email(&email)?
            .ok_or_else(|| DomainError::NotFound(format!("User with email {} not found", email)))
    }

    pub fn list_users(&self) -> Result<Vec<User>, DomainError> {
        self.repo.find_all()
    }

    pub fn update_user(&self, id: i64, patch: UserPatch) -> Result<User, DomainError> {
        let mut user = self.get_user(id)?;

        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("name must not be empty"));
            }
            user.name = name.trim().to_string();
        }
        if let Some(phone) = patch.phone {
            user.phone = phone;
        }
        if let Some(address) = patch.address {
            user.address = address;
        }
        if let Some(email) = patch.email {
            let email = normalize_email(&email);
            if !is_valid_email(&email) {
                return Err(DomainError::validation(format!("'{}' is not a valid email", email)));
            }
            if email != user.email {
                self.ensure_email_free(&email)?;
                user.email = email;
            }
        }
        if let Some(change) = patch.password {
            if !verify_password(&change.current, &user.password_hash) {
                log::warn!("Rejected password change for user {}", id);
                return Err(DomainError::Unauthorized(
                    "current password does not match".to_string(),
                ));
            }
            if change.new.is_empty() {
                return Err(DomainError::validation("password must not be empty"));
            }
            user.password_hash = hash_password(&change.new)?;
        }
        validate_profile(&user.name, &user.phone, &user.email, &user.address)?;

        self.repo.update(&user)
    }

    pub fn delete_user(&self, id: i64) -> Result<(), DomainError> {
        if !self.repo.delete(id)? {
            return Err(DomainError::not_found("User", id));
        }
        log::info!("Deleted user {} with their orders and wishlist", id);
        Ok(())
    }

    /// Returns the user when `password` matches the stored hash.
    pub fn verify_password(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let rejected = || DomainError::Unauthorized("invalid email or password".to_string());
        let user = self
            .repo
            .find_by_email(&normalize_email(email))?
            .ok_or_else(rejected)?;
        if !verify_password(password, &user.password_hash) {
            return Err(rejected());
        }
        Ok(user)
    }

    fn ensure_email_free(&self, email: &str) -> Result<(), DomainError> {
        if self.repo.find_by_email(email)?.is_some() {
            return Err(DomainError::Conflict(format!(
                "a user with email {} already exists",
                email
            )));
        }
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
