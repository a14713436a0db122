// src/models/article.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::pet::validate_url_string;

/// Represents the 'articles' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,

    pub title: String,

    /// E.g. 'health', 'training', 'nutrition'.
    pub category: String,

    pub summary: String,
    pub content: String,

    pub author: String,

    /// E.g. "5 min read".
    pub read_time: String,

    pub image_url: Option<String>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for publishing an article.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateArticleRequest {
    #[validate(length(min = 1, max = 150))]
    pub title: String,

    #[validate(length(min = 1, max = 50))]
    pub category: String,

    #[validate(length(min = 1, max = 500))]
    pub summary: String,

    #[validate(length(min = 1, max = 50000))]
    pub content: String,

    #[validate(length(min = 1, max = 100))]
    pub author: String,

    #[validate(length(min = 1, max = 20))]
    pub read_time: String,

    #[validate(length(max = 500), custom(function = validate_url_string))]
    pub image_url: Option<String>,
}

/// Query parameters for listing articles.
#[derive(Debug, Deserialize)]
pub struct ArticleListParams {
    pub category: Option<String>,
}
