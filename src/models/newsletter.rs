// src/models/newsletter.rs

use serde::Deserialize;
use validator::Validate;

/// DTO for newsletter signup. Append-only; the subscription row itself
/// is never read back by the application.
#[derive(Debug, Deserialize, Validate)]
pub struct SubscribeRequest {
    #[validate(email(message = "A valid email address is required."))]
    pub email: String,
}
