// src/handlers/shelters.rs

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppError,
    models::shelter::{CreateShelterRequest, Shelter},
    utils::{html::clean_html, jwt::Claims},
};

/// Lists shelter profiles, newest first.
pub async fn list_shelters(State(pool): State<PgPool>) -> Result<impl IntoResponse, AppError> {
    let shelters =
        sqlx::query_as::<_, Shelter>("SELECT * FROM shelters ORDER BY created_at DESC")
            .fetch_all(&pool)
            .await?;

    Ok(Json(shelters))
}

/// Register a shelter profile.
/// Requires: Login + 'shelter' role.
pub async fn create_shelter(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateShelterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    if claims.role.as_deref() != Some("shelter") {
        return Err(AppError::Forbidden(
            "Only shelter accounts can register a shelter profile".to_string(),
        ));
    }

    let user_id = claims.sub.parse::<i64>().unwrap_or(0);

    let shelter = sqlx::query_as::<_, Shelter>(
        r#"
        INSERT INTO shelters (owner_id, name, city, address, phone, email, description, image_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&payload.name)
    .bind(&payload.city)
    .bind(&payload.address)
    .bind(&payload.phone)
    .bind(&payload.email)
    .bind(clean_html(&payload.description))
    .bind(&payload.image_url)
    .fetch_one(&pool)
    .await?;

    Ok((StatusCode::CREATED, Json(shelter)))
}
