// src/handlers/adoption.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        adoption::{AdoptionRequest, SubmitAdoptionRequest},
        pet::Pet,
        user::User,
    },
    utils::{html::clean_html, jwt::Claims},
};

/// Submit an adoption request for a pet.
/// Requires: Login + 'adopter' role. The caller must not own the pet.
///
/// Pet and adopter display fields are denormalized into the new row at
/// this moment (snapshot on write); later edits to the pet or the
/// profiles do not rewrite the request.
pub async fn submit_request(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SubmitAdoptionRequest>,
) -> Result<impl IntoResponse, AppError> {
    // 1. Validate payload
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let message = payload.message.trim();
    if message.is_empty() {
        return Err(AppError::BadRequest(
            "Adoption message must not be empty".to_string(),
        ));
    }

    if claims.role.as_deref() != Some("adopter") {
        return Err(AppError::Forbidden(
            "Only adopters can submit adoption requests".to_string(),
        ));
    }

    let adopter_id = claims.sub.parse::<i64>().unwrap_or(0);

    // 2. Resolve the pet; its row carries the owner contact snapshot.
    let pet = sqlx::query_as::<_, Pet>("SELECT * FROM pets WHERE id = $1")
        .bind(payload.pet_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Pet not found".to_string()))?;

    if pet.owner_id == adopter_id {
        return Err(AppError::Forbidden(
            "You cannot request to adopt your own pet".to_string(),
        ));
    }

    if pet.status != "available" {
        return Err(AppError::Conflict(
            "This pet is no longer available for adoption".to_string(),
        ));
    }

    // 3. At most one in-flight request per (adopter, pet).
    let pending = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM adoption_requests WHERE adopter_id = $1 AND pet_id = $2 AND status = 'pending'",
    )
    .bind(adopter_id)
    .bind(payload.pet_id)
    .fetch_one(&pool)
    .await?;

    if pending > 0 {
        return Err(AppError::Conflict(
            "You already have a pending request for this pet".to_string(),
        ));
    }

    // 4. Adopter snapshot fields.
    let adopter = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(adopter_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    // 5. Insert the request; status defaults to 'pending'.
    let request = sqlx::query_as::<_, AdoptionRequest>(
        r#"
        INSERT INTO adoption_requests
            (pet_id, pet_name, pet_type, pet_image,
             adopter_id, adopter_name, adopter_email, adopter_phone,
             owner_id, owner_name, owner_email, message)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING *
        "#,
    )
    .bind(pet.id)
    .bind(&pet.name)
    .bind(&pet.pet_type)
    .bind(&pet.image_url)
    .bind(adopter.id)
    .bind(adopter.display_name())
    .bind(&adopter.email)
    .bind(&adopter.phone)
    .bind(pet.owner_id)
    .bind(&pet.owner_name)
    .bind(&pet.owner_email)
    .bind(clean_html(message))
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        // The partial unique index closes the duplicate-submit race.
        if e.to_string().contains("unique constraint") || e.to_string().contains("23505") {
            AppError::Conflict("You already have a pending request for this pet".to_string())
        } else {
            AppError::from(e)
        }
    })?;

    Ok((StatusCode::CREATED, Json(request)))
}

/// Approve a pending adoption request.
/// Requires: Login + being the request's owner.
///
/// Approval takes the pet off the market and closes out every other
/// pending request for it, all in one transaction.
pub async fn approve_request(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.sub.parse::<i64>().unwrap_or(0);

    let mut tx = pool.begin().await?;

    let request =
        sqlx::query_as::<_, AdoptionRequest>("SELECT * FROM adoption_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::NotFound("Adoption request not found".to_string()))?;

    if request.owner_id != user_id {
        return Err(AppError::Forbidden(
            "Only the pet's owner can respond to this request".to_string(),
        ));
    }

    if request.status != "pending" {
        return Err(AppError::Conflict(format!(
            "Request has already been {}",
            request.status
        )));
    }

    // Guarded transition: of two concurrent decisions exactly one wins.
    let result = sqlx::query(
        "UPDATE adoption_requests SET status = 'approved', updated_at = now() WHERE id = $1 AND status = 'pending'",
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::Conflict("Request is no longer pending".to_string()));
    }

    // The adopted pet comes off the market.
    sqlx::query("UPDATE pets SET status = 'unavailable', updated_at = now() WHERE id = $1")
        .bind(request.pet_id)
        .execute(&mut *tx)
        .await?;

    // Remaining pending requests for this pet are closed out.
    sqlx::query(
        "UPDATE adoption_requests SET status = 'rejected', updated_at = now() WHERE pet_id = $1 AND status = 'pending' AND id <> $2",
    )
    .bind(request.pet_id)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(Json(json!({ "id": id, "status": "approved" })))
}

/// Reject a pending adoption request.
/// Requires: Login + being the request's owner.
pub async fn reject_request(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.sub.parse::<i64>().unwrap_or(0);

    let request =
        sqlx::query_as::<_, AdoptionRequest>("SELECT * FROM adoption_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&pool)
            .await?
            .ok_or(AppError::NotFound("Adoption request not found".to_string()))?;

    if request.owner_id != user_id {
        return Err(AppError::Forbidden(
            "Only the pet's owner can respond to this request".to_string(),
        ));
    }

    if request.status != "pending" {
        return Err(AppError::Conflict(format!(
            "Request has already been {}",
            request.status
        )));
    }

    let result = sqlx::query(
        "UPDATE adoption_requests SET status = 'rejected', updated_at = now() WHERE id = $1 AND status = 'pending'",
    )
    .bind(id)
    .execute(&pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::Conflict("Request is no longer pending".to_string()));
    }

    Ok(Json(json!({ "id": id, "status": "rejected" })))
}

/// List the caller's adoption requests, newest first.
///
/// Adopters see the requests they submitted; shelter owners see the
/// requests targeting their pets.
pub async fn list_requests(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.sub.parse::<i64>().unwrap_or(0);

    let role = claims.role.clone().ok_or(AppError::Forbidden(
        "Select a role before viewing adoption requests".to_string(),
    ))?;

    let query = if role == "adopter" {
        "SELECT * FROM adoption_requests WHERE adopter_id = $1 ORDER BY created_at DESC"
    } else {
        "SELECT * FROM adoption_requests WHERE owner_id = $1 ORDER BY created_at DESC"
    };

    let requests = sqlx::query_as::<_, AdoptionRequest>(query)
        .bind(user_id)
        .fetch_all(&pool)
        .await?;

    Ok(Json(requests))
}
