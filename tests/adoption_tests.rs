// tests/adoption_tests.rs
//
// End-to-end coverage of the adoption request workflow and the derived
// notification feed.

use petcare_backend::{config::Config, routes, state::AppState};
use sqlx::postgres::PgPoolOptions;

async fn spawn_app() -> String {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url: database_url.clone(),
        jwt_secret: "adoption_test_secret".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
    };

    let state = AppState { pool, config };
    let app = routes::create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

/// Registers a fresh user, logs in, and optionally selects a role.
/// Returns the bearer token (carrying the role if one was picked).
async fn register_user(client: &reqwest::Client, address: &str, role: Option<&str>) -> String {
    let email = format!("u_{}@example.com", &uuid::Uuid::new_v4().to_string()[..8]);
    let password = "password123";

    let registered = client
        .post(&format!("{}/api/auth/register", address))
        .json(&serde_json::json!({
            "email": email,
            "password": password,
            "first_name": "Casey",
            "last_name": "Rivera"
        }))
        .send()
        .await
        .expect("Register failed");
    assert_eq!(registered.status().as_u16(), 201);

    let login: serde_json::Value = client
        .post(&format!("{}/api/auth/login", address))
        .json(&serde_json::json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Login failed")
        .json()
        .await
        .expect("Failed to parse login json");

    let mut token = login["token"].as_str().expect("Token not found").to_string();

    if let Some(role) = role {
        let selected: serde_json::Value = client
            .post(&format!("{}/api/auth/role", address))
            .header("Authorization", format!("Bearer {}", token))
            .json(&serde_json::json!({ "role": role }))
            .send()
            .await
            .expect("Role selection failed")
            .json()
            .await
            .expect("Failed to parse role json");

        token = selected["token"]
            .as_str()
            .expect("Fresh token not found")
            .to_string();
    }

    token
}

async fn create_pet(client: &reqwest::Client, address: &str, token: &str, name: &str) -> i64 {
    let response = client
        .post(&format!("{}/api/pets", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({
            "name": name,
            "pet_type": "Dog",
            "age": "2 years",
            "gender": "Male",
            "size": "Medium",
            "city": "Lahore",
            "description": "Friendly, house-trained, loves long walks."
        }))
        .send()
        .await
        .expect("Create pet failed");
    assert_eq!(response.status().as_u16(), 201);

    let pet: serde_json::Value = response.json().await.unwrap();
    pet["id"].as_i64().unwrap()
}

async fn submit_request(
    client: &reqwest::Client,
    address: &str,
    token: &str,
    pet_id: i64,
    message: &str,
) -> reqwest::Response {
    client
        .post(&format!("{}/api/requests", address))
        .header("Authorization", format!("Bearer {}", token))
        .json(&serde_json::json!({ "pet_id": pet_id, "message": message }))
        .send()
        .await
        .expect("Submit request failed")
}

async fn list_requests(
    client: &reqwest::Client,
    address: &str,
    token: &str,
) -> Vec<serde_json::Value> {
    client
        .get(&format!("{}/api/requests", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("List requests failed")
        .json()
        .await
        .expect("Failed to parse requests json")
}

async fn notifications(
    client: &reqwest::Client,
    address: &str,
    token: &str,
) -> serde_json::Value {
    client
        .get(&format!("{}/api/notifications", address))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Notifications failed")
        .json()
        .await
        .expect("Failed to parse notifications json")
}

#[tokio::test]
async fn empty_message_is_rejected_without_creating_a_request() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let shelter = register_user(&client, &address, Some("shelter")).await;
    let adopter = register_user(&client, &address, Some("adopter")).await;
    let pet_id = create_pet(&client, &address, &shelter, "Biscuit").await;

    // Act + Assert: empty and whitespace-only messages
    let response = submit_request(&client, &address, &adopter, pet_id, "").await;
    assert_eq!(response.status().as_u16(), 400);

    let response = submit_request(&client, &address, &adopter, pet_id, "   ").await;
    assert_eq!(response.status().as_u16(), 400);

    // No document was created
    let requests = list_requests(&client, &address, &adopter).await;
    assert!(requests.is_empty());
}

#[tokio::test]
async fn only_adopters_can_submit_requests() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let shelter = register_user(&client, &address, Some("shelter")).await;
    let other_shelter = register_user(&client, &address, Some("shelter")).await;
    let unroled = register_user(&client, &address, None).await;
    let pet_id = create_pet(&client, &address, &shelter, "Biscuit").await;

    // Act + Assert: shelter role
    let response = submit_request(&client, &address, &other_shelter, pet_id, "I love dogs").await;
    assert_eq!(response.status().as_u16(), 403);

    // Act + Assert: no role selected yet
    let response = submit_request(&client, &address, &unroled, pet_id, "I love dogs").await;
    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn submitting_for_a_missing_pet_is_not_found() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();
    let adopter = register_user(&client, &address, Some("adopter")).await;

    // Act
    let response = submit_request(&client, &address, &adopter, 99999999, "I love dogs").await;

    // Assert
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn duplicate_pending_requests_are_prevented() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let shelter = register_user(&client, &address, Some("shelter")).await;
    let adopter = register_user(&client, &address, Some("adopter")).await;
    let pet_id = create_pet(&client, &address, &shelter, "Biscuit").await;

    let first = submit_request(&client, &address, &adopter, pet_id, "I love dogs").await;
    assert_eq!(first.status().as_u16(), 201);

    // Act
    let second = submit_request(&client, &address, &adopter, pet_id, "Me again").await;

    // Assert
    assert_eq!(second.status().as_u16(), 409);
    let requests = list_requests(&client, &address, &adopter).await;
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn full_adoption_flow() {
    // Arrange: shelter S, adopter A, unrelated user B, pet P
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let shelter = register_user(&client, &address, Some("shelter")).await;
    let adopter = register_user(&client, &address, Some("adopter")).await;
    let bystander = register_user(&client, &address, Some("adopter")).await;
    let pet_id = create_pet(&client, &address, &shelter, "Biscuit").await;

    // A submits a request
    let response = submit_request(&client, &address, &adopter, pet_id, "I love dogs").await;
    assert_eq!(response.status().as_u16(), 201);
    let request: serde_json::Value = response.json().await.unwrap();
    let request_id = request["id"].as_i64().unwrap();
    assert_eq!(request["status"], "pending");
    assert_eq!(request["pet_name"], "Biscuit");
    assert_eq!(request["message"], "I love dogs");

    // S's feed: one new-request notification, unread count 1
    let feed = notifications(&client, &address, &shelter).await;
    assert_eq!(feed["unread_count"], 1);
    assert_eq!(feed["notifications"][0]["kind"], "new-request");
    assert_eq!(feed["notifications"][0]["title"], "New Adoption Request");
    let message = feed["notifications"][0]["message"].as_str().unwrap();
    assert!(message.contains("wants to adopt Biscuit"));

    // The derived feed is stable across repeated reads
    let again = notifications(&client, &address, &shelter).await;
    assert_eq!(again["unread_count"], 1);

    // A's side: the pending request counts as unread
    let feed = notifications(&client, &address, &adopter).await;
    assert_eq!(feed["unread_count"], 1);
    assert_eq!(feed["notifications"][0]["kind"], "request-status");
    assert_eq!(feed["notifications"][0]["title"], "Request pending");

    // B is not the owner: approval and rejection are both forbidden
    for action in ["approve", "reject"] {
        let response = client
            .post(&format!("{}/api/requests/{}/{}", address, request_id, action))
            .header("Authorization", format!("Bearer {}", bystander))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 403);
    }

    // ... and the status is untouched
    let requests = list_requests(&client, &address, &adopter).await;
    assert_eq!(requests[0]["status"], "pending");

    // S approves
    let response = client
        .post(&format!("{}/api/requests/{}/approve", address, request_id))
        .header("Authorization", format!("Bearer {}", shelter))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);

    // Terminal state: neither approve nor reject may run again
    for action in ["approve", "reject"] {
        let response = client
            .post(&format!("{}/api/requests/{}/{}", address, request_id, action))
            .header("Authorization", format!("Bearer {}", shelter))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 409);
    }

    // A's feed now reports the approval, and nothing is pending anymore
    let feed = notifications(&client, &address, &adopter).await;
    assert_eq!(feed["unread_count"], 0);
    assert_eq!(feed["notifications"][0]["title"], "Request approved");
    let message = feed["notifications"][0]["message"].as_str().unwrap();
    assert!(message.contains("has been approved"));

    // The pet came off the market
    let pet: serde_json::Value = client
        .get(&format!("{}/api/pets/{}", address, pet_id))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .unwrap();
    assert_eq!(pet["status"], "unavailable");
}

#[tokio::test]
async fn approve_cascade_closes_out_sibling_requests() {
    // Arrange: two adopters race for the same pet
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let shelter = register_user(&client, &address, Some("shelter")).await;
    let first_adopter = register_user(&client, &address, Some("adopter")).await;
    let second_adopter = register_user(&client, &address, Some("adopter")).await;
    let pet_id = create_pet(&client, &address, &shelter, "Biscuit").await;

    let response = submit_request(&client, &address, &first_adopter, pet_id, "I love dogs").await;
    let winner: serde_json::Value = response.json().await.unwrap();
    let winner_id = winner["id"].as_i64().unwrap();

    let response = submit_request(&client, &address, &second_adopter, pet_id, "Pick me!").await;
    assert_eq!(response.status().as_u16(), 201);

    let requests = list_requests(&client, &address, &shelter).await;
    assert_eq!(requests.len(), 2);

    // Act: approve the first request
    let response = client
        .post(&format!("{}/api/requests/{}/approve", address, winner_id))
        .header("Authorization", format!("Bearer {}", shelter))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);

    // Assert: the sibling request was auto-rejected
    let requests = list_requests(&client, &address, &second_adopter).await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["status"], "rejected");

    // ... and new submissions bounce off the unavailable pet
    let third_adopter = register_user(&client, &address, Some("adopter")).await;
    let response = submit_request(&client, &address, &third_adopter, pet_id, "Too late?").await;
    assert_eq!(response.status().as_u16(), 409);
}

#[tokio::test]
async fn reject_leaves_pet_available() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let shelter = register_user(&client, &address, Some("shelter")).await;
    let adopter = register_user(&client, &address, Some("adopter")).await;
    let pet_id = create_pet(&client, &address, &shelter, "Biscuit").await;

    let response = submit_request(&client, &address, &adopter, pet_id, "I love dogs").await;
    let request: serde_json::Value = response.json().await.unwrap();
    let request_id = request["id"].as_i64().unwrap();

    // Act
    let response = client
        .post(&format!("{}/api/requests/{}/reject", address, request_id))
        .header("Authorization", format!("Bearer {}", shelter))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);

    // Assert: rejection is terminal but the pet stays on the market
    let requests = list_requests(&client, &address, &adopter).await;
    assert_eq!(requests[0]["status"], "rejected");

    let pet: serde_json::Value = client
        .get(&format!("{}/api/pets/{}", address, pet_id))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .unwrap();
    assert_eq!(pet["status"], "available");

    // ... and the adopter may try again
    let response = submit_request(&client, &address, &adopter, pet_id, "Second chance?").await;
    assert_eq!(response.status().as_u16(), 201);
}

#[tokio::test]
async fn request_lists_are_scoped_and_newest_first() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let first_shelter = register_user(&client, &address, Some("shelter")).await;
    let second_shelter = register_user(&client, &address, Some("shelter")).await;
    let adopter = register_user(&client, &address, Some("adopter")).await;

    let first_pet = create_pet(&client, &address, &first_shelter, "Biscuit").await;
    let second_pet = create_pet(&client, &address, &second_shelter, "Mochi").await;

    submit_request(&client, &address, &adopter, first_pet, "I love dogs").await;
    submit_request(&client, &address, &adopter, second_pet, "Mochi looks great").await;

    // Act + Assert: the adopter sees both, newest first
    let requests = list_requests(&client, &address, &adopter).await;
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0]["pet_name"], "Mochi");
    assert_eq!(requests[1]["pet_name"], "Biscuit");

    // Each shelter only sees requests for its own pets
    let requests = list_requests(&client, &address, &first_shelter).await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["pet_name"], "Biscuit");

    let requests = list_requests(&client, &address, &second_shelter).await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["pet_name"], "Mochi");
}

#[tokio::test]
async fn snapshots_survive_pet_renames() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let shelter = register_user(&client, &address, Some("shelter")).await;
    let adopter = register_user(&client, &address, Some("adopter")).await;
    let pet_id = create_pet(&client, &address, &shelter, "Biscuit").await;

    submit_request(&client, &address, &adopter, pet_id, "I love dogs").await;

    // Act: rename the pet after the request was written
    let response = client
        .put(&format!("{}/api/pets/{}", address, pet_id))
        .header("Authorization", format!("Bearer {}", shelter))
        .json(&serde_json::json!({ "name": "Sir Biscuit III" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 200);

    // Assert: the request still shows the name captured at submission
    let requests = list_requests(&client, &address, &adopter).await;
    assert_eq!(requests[0]["pet_name"], "Biscuit");
}

#[tokio::test]
async fn pet_mutations_are_owner_only() {
    // Arrange
    let address = spawn_app().await;
    let client = reqwest::Client::new();

    let owner = register_user(&client, &address, Some("shelter")).await;
    let other = register_user(&client, &address, Some("shelter")).await;
    let pet_id = create_pet(&client, &address, &owner, "Biscuit").await;

    // Act + Assert: edits and deletes by a non-owner are forbidden
    let response = client
        .put(&format!("{}/api/pets/{}", address, pet_id))
        .header("Authorization", format!("Bearer {}", other))
        .json(&serde_json::json!({ "name": "Stolen" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 403);

    let response = client
        .delete(&format!("{}/api/pets/{}", address, pet_id))
        .header("Authorization", format!("Bearer {}", other))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 403);

    // Adopters cannot list pets at all
    let adopter = register_user(&client, &address, Some("adopter")).await;
    let response = client
        .post(&format!("{}/api/pets", address))
        .header("Authorization", format!("Bearer {}", adopter))
        .json(&serde_json::json!({
            "name": "Rogue",
            "pet_type": "Cat",
            "age": "1 year",
            "gender": "Female",
            "size": "Small",
            "city": "Karachi",
            "description": "Not allowed anyway."
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 403);

    // The owner's delete works
    let response = client
        .delete(&format!("{}/api/pets/{}", address, pet_id))
        .header("Authorization", format!("Bearer {}", owner))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 204);
}
