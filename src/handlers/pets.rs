// src/handlers/pets.rs

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::{PgPool, Postgres, QueryBuilder};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        pet::{CreatePetRequest, Pet, PetListParams, UpdatePetRequest},
        user::User,
    },
    utils::{html::clean_html, jwt::Claims},
};

/// Lists pets, optionally filtered by species, status, owner or city.
/// Equality filters with a fixed newest-first order; free-text search is
/// the client's business.
pub async fn list_pets(
    State(pool): State<PgPool>,
    Query(params): Query<PetListParams>,
) -> Result<impl IntoResponse, AppError> {
    let pets = sqlx::query_as::<_, Pet>(
        r#"
        SELECT * FROM pets
        WHERE ($1::TEXT IS NULL OR pet_type = $1)
          AND ($2::TEXT IS NULL OR status = $2)
          AND ($3::BIGINT IS NULL OR owner_id = $3)
          AND ($4::TEXT IS NULL OR city = $4)
        ORDER BY created_at DESC
        "#,
    )
    .bind(&params.pet_type)
    .bind(&params.status)
    .bind(params.owner_id)
    .bind(&params.city)
    .fetch_all(&pool)
    .await?;

    Ok(Json(pets))
}

/// Retrieves a single pet by ID.
pub async fn get_pet(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let pet = sqlx::query_as::<_, Pet>("SELECT * FROM pets WHERE id = $1")
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Pet not found".to_string()))?;

    Ok(Json(pet))
}

/// List a new pet for adoption.
/// Requires: Login + 'shelter' role.
///
/// The owner's contact fields are denormalized into the pet row so that
/// adoption requests can snapshot them without a join.
pub async fn create_pet(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreatePetRequest>,
) -> Result<impl IntoResponse, AppError> {
    // 1. Validate payload
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    if claims.role.as_deref() != Some("shelter") {
        return Err(AppError::Forbidden(
            "Only shelters can list pets".to_string(),
        ));
    }

    let user_id = claims.sub.parse::<i64>().unwrap_or(0);

    // 2. Owner contact snapshot
    let owner = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    // 3. Insert; status defaults to 'available'.
    let pet = sqlx::query_as::<_, Pet>(
        r#"
        INSERT INTO pets
            (owner_id, owner_name, owner_email, name, pet_type, breed, age,
             gender, size, city, description, medical_history, vaccinated,
             spayed_neutered, image_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
        RETURNING *
        "#,
    )
    .bind(owner.id)
    .bind(owner.display_name())
    .bind(&owner.email)
    .bind(&payload.name)
    .bind(&payload.pet_type)
    .bind(&payload.breed)
    .bind(&payload.age)
    .bind(&payload.gender)
    .bind(&payload.size)
    .bind(&payload.city)
    .bind(clean_html(&payload.description))
    .bind(payload.medical_history.as_deref().map(clean_html))
    .bind(payload.vaccinated)
    .bind(payload.spayed_neutered)
    .bind(&payload.image_url)
    .fetch_one(&pool)
    .await?;

    Ok((StatusCode::CREATED, Json(pet)))
}

/// Edit a pet listing.
/// Requires: Login + ownership of the pet.
pub async fn update_pet(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdatePetRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user_id = claims.sub.parse::<i64>().unwrap_or(0);

    let pet = sqlx::query_as::<_, Pet>("SELECT * FROM pets WHERE id = $1")
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Pet not found".to_string()))?;

    if pet.owner_id != user_id {
        return Err(AppError::Forbidden(
            "Only the owner can edit this pet".to_string(),
        ));
    }

    let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE pets SET ");
    let mut separated = builder.separated(", ");

    if let Some(name) = payload.name {
        separated.push("name = ");
        separated.push_bind_unseparated(name);
    }

    if let Some(pet_type) = payload.pet_type {
        separated.push("pet_type = ");
        separated.push_bind_unseparated(pet_type);
    }

    if let Some(breed) = payload.breed {
        separated.push("breed = ");
        separated.push_bind_unseparated(breed);
    }

    if let Some(age) = payload.age {
        separated.push("age = ");
        separated.push_bind_unseparated(age);
    }

    if let Some(gender) = payload.gender {
        separated.push("gender = ");
        separated.push_bind_unseparated(gender);
    }

    if let Some(size) = payload.size {
        separated.push("size = ");
        separated.push_bind_unseparated(size);
    }

    if let Some(city) = payload.city {
        separated.push("city = ");
        separated.push_bind_unseparated(city);
    }

    if let Some(description) = payload.description {
        separated.push("description = ");
        separated.push_bind_unseparated(clean_html(&description));
    }

    if let Some(medical_history) = payload.medical_history {
        separated.push("medical_history = ");
        separated.push_bind_unseparated(clean_html(&medical_history));
    }

    if let Some(vaccinated) = payload.vaccinated {
        separated.push("vaccinated = ");
        separated.push_bind_unseparated(vaccinated);
    }

    if let Some(spayed_neutered) = payload.spayed_neutered {
        separated.push("spayed_neutered = ");
        separated.push_bind_unseparated(spayed_neutered);
    }

    if let Some(image_url) = payload.image_url {
        separated.push("image_url = ");
        separated.push_bind_unseparated(image_url);
    }

    if let Some(status) = payload.status {
        separated.push("status = ");
        separated.push_bind_unseparated(status);
    }

    separated.push("updated_at = now()");

    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(" RETURNING *");

    let updated = builder
        .build_query_as::<Pet>()
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Pet not found".to_string()))?;

    Ok(Json(updated))
}

/// Delete a pet listing.
/// Requires: Login + ownership of the pet.
///
/// Adoption requests targeting the pet are kept: they carry their own
/// snapshot of it.
pub async fn delete_pet(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.sub.parse::<i64>().unwrap_or(0);

    let pet = sqlx::query_as::<_, Pet>("SELECT * FROM pets WHERE id = $1")
        .bind(id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Pet not found".to_string()))?;

    if pet.owner_id != user_id {
        return Err(AppError::Forbidden(
            "Only the owner can delete this pet".to_string(),
        ));
    }

    sqlx::query("DELETE FROM pets WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
