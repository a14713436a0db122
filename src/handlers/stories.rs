// src/handlers/stories.rs

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        story::{CreateStoryRequest, Story, StoryListParams},
        user::User,
    },
    utils::{html::clean_html, jwt::Claims},
};

/// Lists success stories, optionally filtered by species, newest first.
pub async fn list_stories(
    State(pool): State<PgPool>,
    Query(params): Query<StoryListParams>,
) -> Result<impl IntoResponse, AppError> {
    let stories = sqlx::query_as::<_, Story>(
        r#"
        SELECT * FROM stories
        WHERE ($1::TEXT IS NULL OR pet_type = $1)
        ORDER BY created_at DESC
        "#,
    )
    .bind(&params.pet_type)
    .fetch_all(&pool)
    .await?;

    Ok(Json(stories))
}

/// Retrieves a single story by ID.
pub async fn get_story(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let story = sqlx::query_as::<_, Story>("SELECT * FROM stories WHERE id = $1")
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Story not found".to_string()))?;

    Ok(Json(story))
}

/// Share a new success story.
/// Requires: Login (any role).
pub async fn create_story(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateStoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user_id = claims.sub.parse::<i64>().unwrap_or(0);

    // Author display name snapshot
    let author = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    let story = sqlx::query_as::<_, Story>(
        r#"
        INSERT INTO stories (author_id, author_name, title, content, pet_type, image_url)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(author.id)
    .bind(author.display_name())
    .bind(&payload.title)
    .bind(clean_html(&payload.content))
    .bind(&payload.pet_type)
    .bind(&payload.image_url)
    .fetch_one(&pool)
    .await?;

    Ok((StatusCode::CREATED, Json(story)))
}

/// Bump one of a story's engagement counters.
///
/// A single atomic UPDATE; concurrent bumps never lose increments.
pub async fn engage_story(
    State(pool): State<PgPool>,
    Path((id, field)): Path<(i64, String)>,
) -> Result<impl IntoResponse, AppError> {
    let query = match field.as_str() {
        "likes" => "UPDATE stories SET likes = likes + 1, updated_at = now() WHERE id = $1",
        "comments" => "UPDATE stories SET comments = comments + 1, updated_at = now() WHERE id = $1",
        "shares" => "UPDATE stories SET shares = shares + 1, updated_at = now() WHERE id = $1",
        _ => {
            return Err(AppError::BadRequest(format!(
                "Unknown engagement field '{}'",
                field
            )));
        }
    };

    let result = sqlx::query(query).bind(id).execute(&pool).await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Story not found".to_string()));
    }

    Ok(Json(json!({ "id": id, "field": field })))
}
