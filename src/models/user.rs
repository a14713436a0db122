// src/models/user.rs

use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::sync::LazyLock;
use validator::Validate;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9 ()\-]{5,19}$").unwrap());

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Unique email, the login identifier.
    pub email: String,

    /// Argon2 password hash.
    /// Skipped during serialization to prevent leaking sensitive data.
    #[serde(skip)]
    pub password: String,

    pub first_name: String,
    pub last_name: String,

    pub phone: Option<String>,

    /// User role: 'adopter' or 'shelter'.
    /// NULL until the user explicitly picks one after signup; once set it
    /// gates which mutations the user may perform.
    pub role: Option<String>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl User {
    /// Display name as denormalized into snapshots.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Aggregated profile data for the current user.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,

    /// Shelters: number of pets listed. Adopters: number of approved requests.
    pub pets_count: i64,
    /// Requests still awaiting a decision, from this user's perspective.
    pub pending_requests: i64,
}

/// DTO for creating a new user (Registration).
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "A valid email address is required."))]
    pub email: String,

    #[validate(length(
        min = 8,
        max = 128,
        message = "Password length must be between 8 and 128 characters."
    ))]
    pub password: String,

    #[validate(length(min = 1, max = 50))]
    pub first_name: String,

    #[validate(length(min = 1, max = 50))]
    pub last_name: String,

    #[validate(custom(function = validate_phone))]
    pub phone: Option<String>,
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// DTO for the one-shot role selection step.
#[derive(Debug, Deserialize, Validate)]
pub struct SelectRoleRequest {
    #[validate(custom(function = validate_role))]
    pub role: String,
}

/// DTO for profile updates. All fields optional; only the provided ones change.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub last_name: Option<String>,

    #[validate(custom(function = validate_phone))]
    pub phone: Option<String>,
}

pub fn validate_role(role: &str) -> Result<(), validator::ValidationError> {
    if role != "adopter" && role != "shelter" {
        return Err(validator::ValidationError::new("invalid_role"));
    }
    Ok(())
}

fn validate_phone(phone: &str) -> Result<(), validator::ValidationError> {
    if !PHONE_RE.is_match(phone) {
        return Err(validator::ValidationError::new("invalid_phone"));
    }
    Ok(())
}
