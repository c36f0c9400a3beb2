use std::ops::{Deref, DerefMut};

use argon2::Error as Argon2Error;
use mongodb::bson::{to_bson, Bson};
use serde::{Deserialize, Serialize};

use crate::model::mongodb::Id;

/// The two privilege levels a user can hold.
///
/// Stored on the user document and carried in auth token claims as a
/// lowercase string.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Voter,
    Admin,
}

impl From<Role> for Bson {
    fn from(role: Role) -> Self {
        to_bson(&role).expect("Serialisation is infallible")
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Voter => "voter",
                Self::Admin => "admin",
            }
        )
    }
}

/// Core user data.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCore {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

impl UserCore {
    /// Create a user with a freshly hashed password.
    pub fn new(
        name: String,
        email: String,
        password: &str,
        role: Role,
    ) -> Result<Self, Argon2Error> {
        let salt: [u8; 16] = rand::random();
        let password_hash =
            argon2::hash_encoded(password.as_bytes(), &salt, &argon2::Config::default())?;
        Ok(Self {
            name,
            email,
            password_hash,
            role,
        })
    }

    /// Check whether the given password is correct.
    pub fn verify_password<T: AsRef<[u8]>>(&self, password: T) -> bool {
        // Unwrap safe because the only way to create a UserCore is via `new`,
        // so the hash is always well-formed.
        argon2::verify_encoded(&self.password_hash, password.as_ref()).unwrap()
    }
}

/// A user without an ID.
pub type NewUser = UserCore;

/// A user from the database, with their unique ID.
#[derive(Debug, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub user: UserCore,
}

impl Deref for User {
    type Target = UserCore;

    fn deref(&self) -> &Self::Target {
        &self.user
    }
}

impl DerefMut for User {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.user
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_and_verify() {
        let user = UserCore::new(
            "Asha Rao".to_string(),
            "asha@college.edu".to_string(),
            "hunter2",
            Role::Voter,
        )
        .unwrap();

        assert!(user.verify_password("hunter2"));
        assert!(!user.verify_password("hunter3"));
        assert!(!user.verify_password(""));
        // The plaintext never ends up in the encoded hash.
        assert!(!user.password_hash.contains("hunter2"));
    }

    #[test]
    fn role_string_round_trip() {
        for role in [Role::Voter, Role::Admin] {
            let json = rocket::serde::json::serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{role}\""));
            let back: Role = rocket::serde::json::serde_json::from_str(&json).unwrap();
            assert_eq!(back, role);
        }
    }
}
