//! Farmer accounts

use bcrypt::{hash, DEFAULT_COST};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::{validate_email, validate_location, validate_password, validate_username, Language};

use crate::error::{AppError, AppResult};

/// Postgres error code for unique constraint violations
const UNIQUE_VIOLATION: &str = "23505";

/// User service
#[derive(Clone)]
pub struct UserService {
    db: PgPool,
}

/// Public user profile; the password hash never leaves the database layer
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub location: Option<String>,
    pub preferred_language: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a user
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub preferred_language: Language,
}

impl CreateUserInput {
    fn check(&self) -> AppResult<()> {
        validate_username(&self.username).map_err(|m| AppError::invalid("username", m))?;
        validate_password(&self.password).map_err(|m| AppError::invalid("password", m))?;
        if let Some(email) = &self.email {
            validate_email(email).map_err(|m| AppError::invalid("email", m))?;
        }
        if let Some(location) = &self.location {
            validate_location(location).map_err(|m| AppError::invalid("location", m))?;
        }
        Ok(())
    }
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Register a farmer
    pub async fn create_user(&self, input: CreateUserInput) -> AppResult<User> {
        input.check()?;

        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, email, location, preferred_language)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, email, location, preferred_language, created_at
            "#,
        )
        .bind(&input.username)
        .bind(&password_hash)
        .bind(&input.email)
        .bind(&input.location)
        .bind(input.preferred_language.code())
        .fetch_one(&self.db)
        .await;

        match result {
            Ok(user) => {
                tracing::info!("Created user {} ({})", user.username, user.id);
                Ok(user)
            }
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                Err(AppError::DuplicateEntry("username".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get a user by ID
    pub async fn get_user(&self, user_id: Uuid) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, location, preferred_language, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))
    }
}
