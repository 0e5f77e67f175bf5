use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity - represents a registered author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The identity this user acts as once authenticated.
    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.id,
            username: self.username.clone(),
        }
    }
}

/// A user that has not been stored yet. The store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            username,
            email,
            password_hash,
            is_staff: false,
            created_at: Utc::now(),
        }
    }
}

/// Authenticated identity passed explicitly into every mutating operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i64,
    pub username: String,
}

impl Actor {
    pub fn new(user_id: i64, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
        }
    }

    /// Whether this actor authored the entity owned by `author_id`.
    pub fn owns(&self, author_id: i64) -> bool {
        self.user_id == author_id
    }
}
