// src/models/shelter.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::pet::validate_url_string;

/// Represents the 'shelters' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Shelter {
    pub id: i64,

    pub owner_id: i64,

    pub name: String,
    pub city: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub description: String,

    pub image_url: Option<String>,

    pub rating: f64,
    pub reviews: i32,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for registering a shelter profile.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateShelterRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(length(min = 1, max = 100))]
    pub city: String,

    #[validate(length(min = 1, max = 200))]
    pub address: String,

    #[validate(length(min = 1, max = 30))]
    pub phone: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 20000))]
    pub description: String,

    #[validate(length(max = 500), custom(function = validate_url_string))]
    pub image_url: Option<String>,
}
