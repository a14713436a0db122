// src/models/adoption.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'adoption_requests' table in the database.
///
/// Pet, adopter and owner display fields are snapshots captured at
/// submission time, not live joins: renaming a pet later must not
/// rewrite the history of old requests.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AdoptionRequest {
    pub id: i64,

    pub pet_id: i64,
    pub pet_name: String,
    pub pet_type: String,
    pub pet_image: Option<String>,

    pub adopter_id: i64,
    pub adopter_name: String,
    pub adopter_email: String,
    pub adopter_phone: Option<String>,

    /// The pet's owner at submission time.
    pub owner_id: i64,
    pub owner_name: String,
    pub owner_email: String,

    /// Free-text message from the adopter to the owner.
    pub message: String,

    /// 'pending' -> 'approved' | 'rejected'. Terminal states never transition.
    pub status: String,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for submitting an adoption request.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitAdoptionRequest {
    pub pet_id: i64,

    #[validate(length(
        min = 1,
        max = 2000,
        message = "Adoption message must be between 1 and 2000 characters."
    ))]
    pub message: String,
}

/// A single derived notification. Never persisted: the feed is recomputed
/// from adoption requests on every read.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    /// Id of the underlying adoption request.
    pub id: i64,
    /// 'request-status' for adopters, 'new-request' for shelters.
    pub kind: String,
    pub title: String,
    pub message: String,
    /// Underlying request status.
    pub status: String,
    pub timestamp: Option<chrono::DateTime<chrono::Utc>>,
    /// Always false: there is no persisted read-state.
    pub read: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct NotificationFeed {
    pub notifications: Vec<Notification>,
    /// Count of underlying requests still pending, not of unread items.
    pub unread_count: usize,
}

/// Maps a user's adoption requests onto their notification feed.
///
/// Adopters see the fate of their own requests; shelter owners see
/// incoming requests for their pets. The unread counter is derived from
/// `status == 'pending'` alone, so re-running the projection over
/// unchanged data always yields the same count.
pub fn project_notifications(requests: &[AdoptionRequest], role: &str) -> NotificationFeed {
    let notifications: Vec<Notification> = requests
        .iter()
        .map(|request| {
            let (kind, title, message) = if role == "adopter" {
                (
                    "request-status".to_string(),
                    format!("Request {}", request.status),
                    format!(
                        "Your adoption request for {} has been {}",
                        request.pet_name, request.status
                    ),
                )
            } else {
                (
                    "new-request".to_string(),
                    "New Adoption Request".to_string(),
                    format!("{} wants to adopt {}", request.adopter_name, request.pet_name),
                )
            };

            Notification {
                id: request.id,
                kind,
                title,
                message,
                status: request.status.clone(),
                timestamp: request.created_at,
                read: false,
            }
        })
        .collect();

    let unread_count = requests.iter().filter(|r| r.status == "pending").count();

    NotificationFeed {
        notifications,
        unread_count,
    }
}
