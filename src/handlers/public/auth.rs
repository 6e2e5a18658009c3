// POST /auth/register and POST /auth/login
use axum::response::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{generate_jwt, hash_password, verify_password, Claims};
use crate::config;
use crate::database::models::{User, UserRole};
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
    pub expires_in: u64,
}

/// POST /auth/register - Create an account and receive a JWT
pub async fn register(Json(payload): Json<RegisterRequest>) -> ApiResult<AuthPayload> {
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::bad_request("A valid email address is required"));
    }
    if payload.name.trim().is_empty() {
        return Err(ApiError::bad_request("Name is required"));
    }
    if payload.password.len() < 8 {
        return Err(ApiError::bad_request(
            "Password must be at least 8 characters",
        ));
    }

    let pool = DatabaseManager::pool().await?;

    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&pool)
        .await?;
    if existing.is_some() {
        return Err(ApiError::conflict("An account with this email already exists"));
    }

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (id, email, name, password_hash, role)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(&email)
    .bind(payload.name.trim())
    .bind(hash_password(&payload.password))
    .bind(UserRole::Member)
    .fetch_one(&pool)
    .await?;

    tracing::info!(user_id = %user.id, "registered new user");
    Ok(ApiResponse::created(token_payload(user)?))
}

/// POST /auth/login - Authenticate and receive a JWT
pub async fn login(Json(payload): Json<LoginRequest>) -> ApiResult<AuthPayload> {
    let email = payload.email.trim().to_lowercase();
    let pool = DatabaseManager::pool().await?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    if !verify_password(&payload.password, &user.password_hash) {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    Ok(ApiResponse::success(token_payload(user)?))
}

fn token_payload(user: User) -> Result<AuthPayload, ApiError> {
    let claims = Claims::new(user.id, user.email.clone(), user.role);
    let token = generate_jwt(&claims)?;
    Ok(AuthPayload {
        token,
        user,
        expires_in: config::config().security.jwt_expiry_hours * 3600,
    })
}
