// src/main.rs

use dotenvy::dotenv;
use petcare_backend::config::Config;
use petcare_backend::routes;
use petcare_backend::state::AppState;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Initialize Database Pool with Retry
    let mut retry_count = 0;
    let pool = loop {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => break pool,
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    panic!("Failed to connect to database after 5 retries: {}", e);
                }
                tracing::warn!(
                    "Database not ready, retrying in 2s... (Attempt {})",
                    retry_count
                );
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    };

    tracing::info!("Database connected...");

    // Run Migrations Automatically
    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations applied successfully.");

    // Seed Starter Articles
    if let Err(e) = seed_starter_articles(&pool).await {
        tracing::error!("Failed to seed starter articles: {:?}", e);
    }

    // Create AppState
    let state = AppState {
        pool: pool.clone(),
        config: config.clone(),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    // Start the server
    axum::serve(listener, app).await.unwrap();
}

/// Seeds the resources section with a starter set of articles so a fresh
/// deployment is not empty. Runs only when the table has no rows.
async fn seed_starter_articles(pool: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        return Ok(());
    }

    tracing::info!("Seeding starter articles...");

    let starters = [
        (
            "New Pet Parent Survival Guide",
            "new-parent",
            "Day-by-day checklist covering supplies, vet visits, bonding, and house rules for the first 30 days with your adopted pet.",
            "Dr. Sara Khan",
            "7 min read",
        ),
        (
            "Vaccination Timeline for Dogs & Cats",
            "health",
            "Up-to-date schedule for core and optional vaccines plus tips to keep records organised.",
            "Happy Paws Clinic",
            "5 min read",
        ),
        (
            "Leash Reactivity: Training Plan That Works",
            "training",
            "Step-by-step desensitisation routine plus printable progress tracker for reactive pups.",
            "K9 Coach Maria",
            "9 min read",
        ),
    ];

    for (title, category, summary, author, read_time) in starters {
        sqlx::query(
            "INSERT INTO articles (title, category, summary, content, author, read_time) VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(title)
        .bind(category)
        .bind(summary)
        .bind(summary)
        .bind(author)
        .bind(read_time)
        .execute(pool)
        .await?;
    }

    tracing::info!("Starter articles seeded successfully.");
    Ok(())
}
