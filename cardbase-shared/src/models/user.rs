/// User model and database operations
///
/// Users are created on first successful external authentication; the row
/// key is the numeric identity assigned by the OAuth provider, so this
/// table never generates ids of its own. Users are never deleted by this
/// system.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGINT PRIMARY KEY,
///     username VARCHAR(255) NOT NULL UNIQUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use cardbase_shared::models::user::User;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// // Upsert on login: inserts on first sight, refreshes username after.
/// let user = User::upsert(&pool, 583_211, "octocat").await?;
/// assert_eq!(user.id, 583_211);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// User model representing an authenticated account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Stable numeric identity from the external provider
    pub id: i64,

    /// Provider login name; refreshed on every login
    pub username: String,

    /// When the account was first seen
    pub created_at: DateTime<Utc>,

    /// When the account row was last touched
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Inserts the user on first login, refreshes the username afterwards
    ///
    /// The external identity is the primary key, so repeated logins are
    /// idempotent apart from the username refresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn upsert(pool: &PgPool, id: i64, username: &str) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE
                SET username = EXCLUDED.username,
                    updated_at = NOW()
            RETURNING id, username, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(username)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}
