// src/handlers/newsletter.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::{error::AppError, models::newsletter::SubscribeRequest};

/// Subscribe an email address to the newsletter.
/// Append-only; resubscribing simply adds another row, as the original
/// marketing flow expects.
pub async fn subscribe(
    State(pool): State<PgPool>,
    Json(payload): Json<SubscribeRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    sqlx::query("INSERT INTO newsletter (email) VALUES ($1)")
        .bind(&payload.email)
        .execute(&pool)
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "subscribed": true }))))
}
