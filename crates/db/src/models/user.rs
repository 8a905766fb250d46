//! User entity model and DTOs.

use byeolpedia_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub collector_name: String,
    pub profile_pic: Option<String>,
    pub password_hash: String,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub collector_name: String,
    pub profile_pic: Option<String>,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            collector_name: user.collector_name.clone(),
            profile_pic: user.profile_pic.clone(),
            created_at: user.created_at,
        }
    }
}

/// Profile view: the public user fields plus live collection totals.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: UserResponse,
    pub total_albums: i64,
    pub total_photocards: i64,
    pub total_lightsticks: i64,
}

/// DTO for creating a new user. The email is expected lower-cased.
#[derive(Debug)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub collector_name: String,
    pub password_hash: String,
}

/// Self-service profile changes. All fields are optional.
#[derive(Debug, Default)]
pub struct UpdateProfile {
    pub collector_name: Option<String>,
    /// `Some(None)` removes the picture.
    pub profile_pic: Option<Option<String>>,
}
