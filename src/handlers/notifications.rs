// src/handlers/notifications.rs

use axum::{Extension, Json, extract::State};
use sqlx::PgPool;

use crate::{
    models::adoption::{AdoptionRequest, NotificationFeed, project_notifications},
    utils::jwt::Claims,
};

/// Derive the caller's notification feed from their adoption requests.
///
/// This is a stateless read-time projection: there is no notification
/// store and no persisted read flags. The handler is infallible by
/// contract; the bell widget consuming it must never crash the page, so
/// a store failure degrades to an empty feed.
pub async fn list_notifications(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Json<NotificationFeed> {
    let user_id = claims.sub.parse::<i64>().unwrap_or(0);

    let Some(role) = claims.role.clone() else {
        // No role yet means no requests in either direction.
        return Json(NotificationFeed::default());
    };

    let query = if role == "adopter" {
        "SELECT * FROM adoption_requests WHERE adopter_id = $1 ORDER BY created_at DESC"
    } else {
        "SELECT * FROM adoption_requests WHERE owner_id = $1 ORDER BY created_at DESC"
    };

    match sqlx::query_as::<_, AdoptionRequest>(query)
        .bind(user_id)
        .fetch_all(&pool)
        .await
    {
        Ok(requests) => Json(project_notifications(&requests, &role)),
        Err(e) => {
            tracing::warn!("Failed to load notifications for user {}: {}", user_id, e);
            Json(NotificationFeed::default())
        }
    }
}
