// src/models/story.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::pet::{validate_pet_type, validate_url_string};

/// Represents the 'stories' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Story {
    pub id: i64,

    pub author_id: i64,
    /// Author display name snapshot, captured at posting time.
    pub author_name: String,

    pub title: String,
    pub content: String,

    /// Species the story is about, used for filtering.
    pub pet_type: String,

    pub image_url: Option<String>,

    // Engagement counters, incremented atomically in the store.
    pub likes: i32,
    pub comments: i32,
    pub shares: i32,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for posting a new success story.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateStoryRequest {
    #[validate(length(min = 1, max = 150))]
    pub title: String,

    #[validate(length(min = 1, max = 20000))]
    pub content: String,

    #[validate(custom(function = validate_pet_type))]
    pub pet_type: String,

    #[validate(length(max = 500), custom(function = validate_url_string))]
    pub image_url: Option<String>,
}

/// Query parameters for listing stories.
#[derive(Debug, Deserialize)]
pub struct StoryListParams {
    pub pet_type: Option<String>,
}
