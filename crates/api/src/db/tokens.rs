//! Bearer token repository.
//!
//! Tokens are opaque random values; only their SHA-256 digest (hex) is
//! stored. Resolution joins straight to the owning user and filters out
//! expired rows, so a token lookup is a single query.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use orchard_core::{Email, UserId};

use super::RepositoryError;
use crate::models::User;

/// Repository for auth token operations.
pub struct TokenRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TokenRepository<'a> {
    /// Create a new token repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a token digest for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        user_id: UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO auth_tokens (user_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Resolve a token digest to its owning user.
    ///
    /// Returns `None` for unknown or expired tokens.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored email is invalid.
    pub async fn resolve(&self, token_hash: &str) -> Result<Option<User>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct Row {
            id: i32,
            name: String,
            email: String,
            avatar: Option<String>,
            created_at: DateTime<Utc>,
        }

        let row = sqlx::query_as::<_, Row>(
            r"
            SELECT u.id, u.name, u.email, u.avatar, u.created_at
            FROM auth_tokens t
            JOIN users u ON u.id = t.user_id
            WHERE t.token_hash = $1 AND t.expires_at > now()
            ",
        )
        .bind(token_hash)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(r) => {
                let email = Email::parse(&r.email).map_err(|e| {
                    RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
                })?;

                Ok(Some(User {
                    id: UserId::new(r.id),
                    name: r.name,
                    email,
                    avatar: r.avatar,
                    created_at: r.created_at,
                }))
            }
            None => Ok(None),
        }
    }

    /// Delete a token, logging its owner out of that session.
    ///
    /// Returns `true` if a token was deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn revoke(&self, token_hash: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM auth_tokens WHERE token_hash = $1")
            .bind(token_hash)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
