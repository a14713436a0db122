// src/models/pet.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use url::Url;
use validator::Validate;

pub const PET_TYPES: [&str; 5] = ["Dog", "Cat", "Bird", "Rabbit", "Other"];

/// Represents the 'pets' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Pet {
    pub id: i64,

    pub owner_id: i64,
    /// Owner contact snapshot, captured at listing time.
    pub owner_name: String,
    pub owner_email: String,

    pub name: String,

    /// Species: Dog, Cat, Bird, Rabbit or Other.
    pub pet_type: String,

    pub breed: Option<String>,

    /// Free text, e.g. "2 years".
    pub age: String,

    pub gender: String,
    pub size: String,
    pub city: String,

    pub description: String,
    pub medical_history: Option<String>,

    pub vaccinated: bool,
    pub spayed_neutered: bool,

    pub image_url: Option<String>,

    /// 'available' until an adoption request is approved.
    pub status: String,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for listing a new pet.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePetRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(custom(function = validate_pet_type))]
    pub pet_type: String,

    #[validate(length(min = 1, max = 100))]
    pub breed: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub age: String,

    #[validate(length(min = 1, max = 20))]
    pub gender: String,

    #[validate(length(min = 1, max = 20))]
    pub size: String,

    #[validate(length(min = 1, max = 100))]
    pub city: String,

    #[validate(length(min = 1, max = 20000))]
    pub description: String,

    #[validate(length(min = 1, max = 20000))]
    pub medical_history: Option<String>,

    #[serde(default)]
    pub vaccinated: bool,

    #[serde(default)]
    pub spayed_neutered: bool,

    #[validate(length(max = 500), custom(function = validate_url_string))]
    pub image_url: Option<String>,
}

/// DTO for editing a pet. All fields optional; only the provided ones change.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePetRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(custom(function = validate_pet_type))]
    pub pet_type: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub breed: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub age: Option<String>,

    #[validate(length(min = 1, max = 20))]
    pub gender: Option<String>,

    #[validate(length(min = 1, max = 20))]
    pub size: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,

    #[validate(length(min = 1, max = 20000))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 20000))]
    pub medical_history: Option<String>,

    pub vaccinated: Option<bool>,

    pub spayed_neutered: Option<bool>,

    #[validate(length(max = 500), custom(function = validate_url_string))]
    pub image_url: Option<String>,

    #[validate(custom(function = validate_pet_status))]
    pub status: Option<String>,
}

/// Query parameters for listing pets.
/// Equality filters only; free-text search stays client-side.
#[derive(Debug, Deserialize)]
pub struct PetListParams {
    pub pet_type: Option<String>,
    pub status: Option<String>,
    pub owner_id: Option<i64>,
    pub city: Option<String>,
}

pub fn validate_pet_type(pet_type: &str) -> Result<(), validator::ValidationError> {
    if !PET_TYPES.contains(&pet_type) {
        return Err(validator::ValidationError::new("invalid_pet_type"));
    }
    Ok(())
}

fn validate_pet_status(status: &str) -> Result<(), validator::ValidationError> {
    if status != "available" && status != "unavailable" {
        return Err(validator::ValidationError::new("invalid_status"));
    }
    Ok(())
}

/// Validates that a string is a correctly formatted URL.
pub fn validate_url_string(url: &str) -> Result<(), validator::ValidationError> {
    if Url::parse(url).is_err() {
        return Err(validator::ValidationError::new("invalid_url"));
    }
    Ok(())
}
