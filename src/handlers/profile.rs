// src/handlers/profile.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    error::AppError,
    models::user::{MeResponse, UpdateProfileRequest, User},
    utils::jwt::Claims,
};
use validator::Validate;

/// Get current user's profile and statistics.
///
/// The counters depend on the role: shelters see how many pets they have
/// listed, adopters how many requests of theirs were approved; both see
/// their share of still-pending requests.
pub async fn get_me(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.sub.parse::<i64>().unwrap_or(0);

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    let (pets_count, pending_requests) = match user.role.as_deref() {
        Some("shelter") => {
            let pets = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pets WHERE owner_id = $1")
                .bind(user_id)
                .fetch_one(&pool)
                .await?;
            let pending = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM adoption_requests WHERE owner_id = $1 AND status = 'pending'",
            )
            .bind(user_id)
            .fetch_one(&pool)
            .await?;
            (pets, pending)
        }
        Some("adopter") => {
            let adopted = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM adoption_requests WHERE adopter_id = $1 AND status = 'approved'",
            )
            .bind(user_id)
            .fetch_one(&pool)
            .await?;
            let pending = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM adoption_requests WHERE adopter_id = $1 AND status = 'pending'",
            )
            .bind(user_id)
            .fetch_one(&pool)
            .await?;
            (adopted, pending)
        }
        _ => (0, 0),
    };

    Ok(Json(MeResponse {
        id: user.id,
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        phone: user.phone,
        role: user.role,
        created_at: user.created_at,
        pets_count,
        pending_requests,
    }))
}

/// Update the current user's profile fields.
/// Only the owning user can reach this handler; the id comes from the token.
pub async fn update_profile(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user_id = claims.sub.parse::<i64>().unwrap_or(0);

    if payload.email.is_none()
        && payload.first_name.is_none()
        && payload.last_name.is_none()
        && payload.phone.is_none()
    {
        return Err(AppError::BadRequest("No fields to update".to_string()));
    }

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE users SET ");
    let mut separated = builder.separated(", ");

    if let Some(email) = payload.email {
        separated.push("email = ");
        separated.push_bind_unseparated(email);
    }

    if let Some(first_name) = payload.first_name {
        separated.push("first_name = ");
        separated.push_bind_unseparated(first_name);
    }

    if let Some(last_name) = payload.last_name {
        separated.push("last_name = ");
        separated.push_bind_unseparated(last_name);
    }

    if let Some(phone) = payload.phone {
        separated.push("phone = ");
        separated.push_bind_unseparated(phone);
    }

    separated.push("updated_at = now()");

    builder.push(" WHERE id = ");
    builder.push_bind(user_id);
    builder.push(" RETURNING *");

    let user = builder
        .build_query_as::<User>()
        .fetch_optional(&pool)
        .await
        .map_err(|e| {
            if e.to_string().contains("unique constraint") || e.to_string().contains("23505") {
                AppError::Conflict("Email is already registered".to_string())
            } else {
                AppError::from(e)
            }
        })?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user))
}
