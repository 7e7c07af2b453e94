use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Utc};

use super::Ulid;

/// Longest profile description we accept.
const MAX_DESCRIPTION_LENGTH: usize = 200;

#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct User {
    /// The unique identifier for the user.
    pub id: Ulid,
    /// The username of the user, stored lowercase and unique.
    pub username: String,
    /// The hashed password of the user. (argon2)
    pub password_hash: String,
    /// The profile description of the user.
    pub description: String,
    /// The id of the active profile picture, if one was uploaded.
    pub profile_picture_id: Option<Ulid>,
    /// The object storage path of the active profile picture.
    pub profile_picture_path: Option<String>,
    /// The time the user was created.
    pub created_at: DateTime<Utc>,
    /// The time the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Uses argon2 to verify the password hash against the provided password.
    pub fn verify_password(&self, password: &str) -> bool {
        let hash = match PasswordHash::new(&self.password_hash) {
            Ok(hash) => hash,
            Err(err) => {
                tracing::error!("failed to parse password hash: {}", err);
                return false;
            }
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok()
    }

    /// Generates a new password hash using argon2.
    pub fn hash_password(password: &str) -> String {
        let salt = SaltString::generate(&mut OsRng);

        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .expect("failed to hash password");

        hash.to_string()
    }

    /// Validates a username.
    pub fn validate_username(username: &str) -> Result<(), &'static str> {
        if username.len() < 3 {
            return Err("Username must be at least 3 characters long");
        }

        if username.len() > 20 {
            return Err("Username must be at most 20 characters long");
        }

        if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err("Username must only contain alphanumeric characters and underscores");
        }

        Ok(())
    }

    /// Validates a password.
    pub fn validate_password(password: &str) -> Result<(), &'static str> {
        if password.len() < 8 {
            return Err("Password must be at least 8 characters long");
        }

        if password.len() > 100 {
            return Err("Password must be at most 100 characters long");
        }

        if !password.chars().any(|c| c.is_ascii_lowercase()) {
            return Err("Password must contain at least one lowercase character");
        }

        if !password.chars().any(|c| c.is_ascii_uppercase()) {
            return Err("Password must contain at least one uppercase character");
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err("Password must contain at least one digit");
        }

        Ok(())
    }

    /// Validates a profile description.
    pub fn validate_description(description: &str) -> Result<(), &'static str> {
        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err("Too long description");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_round_trip() {
        let user = User {
            password_hash: User::hash_password("hunter2!Hunter2"),
            ..Default::default()
        };

        assert!(user.verify_password("hunter2!Hunter2"));
        assert!(!user.verify_password("hunter2!hunter2"));
        assert!(!user.verify_password(""));
    }

    #[test]
    fn username_rules() {
        assert!(User::validate_username("wanderer_1").is_ok());
        assert!(User::validate_username("ab").is_err());
        assert!(User::validate_username("has spaces").is_err());
        assert!(User::validate_username(&"a".repeat(21)).is_err());
    }

    #[test]
    fn password_rules() {
        assert!(User::validate_password("Str0ngpass").is_ok());
        assert!(User::validate_password("short1A").is_err());
        assert!(User::validate_password("alllowercase1").is_err());
        assert!(User::validate_password("ALLUPPERCASE1").is_err());
        assert!(User::validate_password("NoDigitsHere").is_err());
    }

    #[test]
    fn description_length_cap() {
        assert!(User::validate_description(&"x".repeat(200)).is_ok());
        assert_eq!(
            User::validate_description(&"x".repeat(201)),
            Err("Too long description")
        );
    }
}
