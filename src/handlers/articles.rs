// src/handlers/articles.rs

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    error::AppError,
    models::article::{Article, ArticleListParams, CreateArticleRequest},
    utils::html::clean_html,
};

/// Lists resource articles, optionally filtered by category, newest first.
/// 'all'/'All' means no filter.
pub async fn list_articles(
    State(pool): State<PgPool>,
    Query(params): Query<ArticleListParams>,
) -> Result<impl IntoResponse, AppError> {
    let category = params
        .category
        .filter(|c| c != "all" && c != "All");

    let articles = sqlx::query_as::<_, Article>(
        r#"
        SELECT * FROM articles
        WHERE ($1::TEXT IS NULL OR category = $1)
        ORDER BY created_at DESC
        "#,
    )
    .bind(&category)
    .fetch_all(&pool)
    .await?;

    Ok(Json(articles))
}

/// Publish a resource article.
/// Requires: Login.
pub async fn create_article(
    State(pool): State<PgPool>,
    Json(payload): Json<CreateArticleRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let article = sqlx::query_as::<_, Article>(
        r#"
        INSERT INTO articles (title, category, summary, content, author, read_time, image_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(&payload.title)
    .bind(&payload.category)
    .bind(&payload.summary)
    .bind(clean_html(&payload.content))
    .bind(&payload.author)
    .bind(&payload.read_time)
    .bind(&payload.image_url)
    .fetch_one(&pool)
    .await?;

    Ok((StatusCode::CREATED, Json(article)))
}
