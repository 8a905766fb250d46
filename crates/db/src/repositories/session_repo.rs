//! Repository for the `user_sessions` table.

use byeolpedia_core::types::DbId;
use sqlx::PgPool;

use crate::models::session::{CreateSession, UserSession};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, refresh_token_hash, expires_at, is_revoked, \
                       created_at, updated_at";

/// Provides refresh-token session bookkeeping.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSession) -> Result<UserSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_sessions (user_id, refresh_token_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(input.user_id)
            .bind(&input.refresh_token_hash)
            .bind(input.expires_at)
            .fetch_one(pool)
            .await
    }

    /// Revoke the active session for `hash` and return it.
    ///
    /// The check and the revocation are one conditional UPDATE, so of two
    /// concurrent calls with the same token exactly one gets the row back.
    pub async fn consume(pool: &PgPool, hash: &str) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!(
            "UPDATE user_sessions SET is_revoked = true
             WHERE refresh_token_hash = $1
               AND is_revoked = false
               AND expires_at > NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(hash)
            .fetch_optional(pool)
            .await
    }

    /// Revoke a user's session by token hash. Returns `true` if the row was
    /// updated; `false` when it was already revoked or belongs to someone else.
    pub async fn revoke_for_user(
        pool: &PgPool,
        user_id: DbId,
        hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE user_sessions SET is_revoked = true
             WHERE user_id = $1 AND refresh_token_hash = $2 AND is_revoked = false",
        )
        .bind(user_id)
        .bind(hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete `user_id`'s sessions that are revoked or past expiry. Returns
    /// the number of rows removed.
    pub async fn delete_stale_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM user_sessions
             WHERE user_id = $1 AND (is_revoked = true OR expires_at <= NOW())",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
