// src/routes.rs

use axum::{
    Router, http::Method, middleware,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{
        adoption, articles, auth, newsletter, notifications, pets, profile, shelters, stories,
    },
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, pets, requests, notifications, ...).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (Database Pool + Config).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    // let governor_conf = GovernorConfigBuilder::default()
    //     .per_second(2)
    //     .burst_size(5)
    //     .finish()
    //     .unwrap();

    // let governor_conf = Arc::new(governor_conf);

    let require_auth = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        // Protected: the one-shot role selection
        .merge(
            Router::new()
                .route("/role", post(auth::select_role))
                .layer(require_auth.clone()),
        );

    let pet_routes = Router::new()
        .route("/", get(pets::list_pets))
        .route("/{id}", get(pets::get_pet))
        .merge(
            Router::new()
                .route("/", post(pets::create_pet))
                .route("/{id}", put(pets::update_pet).delete(pets::delete_pet))
                .layer(require_auth.clone()),
        );

    let request_routes = Router::new()
        .route(
            "/",
            get(adoption::list_requests).post(adoption::submit_request),
        )
        .route("/{id}/approve", post(adoption::approve_request))
        .route("/{id}/reject", post(adoption::reject_request))
        .layer(require_auth.clone());

    let notification_routes = Router::new()
        .route("/", get(notifications::list_notifications))
        .layer(require_auth.clone());

    let profile_routes = Router::new()
        .route("/me", get(profile::get_me))
        .route("/", put(profile::update_profile))
        .layer(require_auth.clone());

    let story_routes = Router::new()
        .route("/", get(stories::list_stories))
        .route("/{id}", get(stories::get_story))
        .route("/{id}/engagement/{field}", post(stories::engage_story))
        .merge(
            Router::new()
                .route("/", post(stories::create_story))
                .layer(require_auth.clone()),
        );

    let shelter_routes = Router::new()
        .route("/", get(shelters::list_shelters))
        .merge(
            Router::new()
                .route("/", post(shelters::create_shelter))
                .layer(require_auth.clone()),
        );

    let article_routes = Router::new()
        .route("/", get(articles::list_articles))
        .merge(
            Router::new()
                .route("/", post(articles::create_article))
                .layer(require_auth.clone()),
        );

    let newsletter_routes = Router::new().route("/", post(newsletter::subscribe));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/pets", pet_routes)
        .nest("/api/requests", request_routes)
        .nest("/api/notifications", notification_routes)
        .nest("/api/profile", profile_routes)
        .nest("/api/stories", story_routes)
        .nest("/api/shelters", shelter_routes)
        .nest("/api/articles", article_routes)
        .nest("/api/newsletter", newsletter_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // .layer(GovernorLayer::new(governor_conf))
        .with_state(state)
}
