/// Document model and database operations
///
/// Documents are reports within a project: either written by the user or
/// produced by the report-generation backend at creation time. Like cards,
/// documents inherit their owner from the project when created and every
/// query is additionally scoped by `user_id`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE documents (
///     id BIGSERIAL PRIMARY KEY,
///     title VARCHAR(255) NOT NULL,
///     content TEXT NOT NULL DEFAULT '',
///     project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     user_id BIGINT NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Document model representing a report
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Document {
    /// Unique document ID
    pub id: i64,

    /// Document title
    pub title: String,

    /// Document body
    pub content: String,

    /// Project this document belongs to; never changes after creation
    pub project_id: i64,

    /// Owning user, inherited from the project at creation
    pub user_id: i64,

    /// When the document was created
    pub created_at: DateTime<Utc>,

    /// When the document was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDocument {
    /// Document title
    pub title: String,

    /// Document body; when empty the API layer generates one
    #[serde(default)]
    pub content: String,

    /// Parent project
    pub project_id: i64,
}

/// Input for updating a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDocument {
    /// New title
    pub title: String,

    /// New body
    pub content: String,
}

impl Document {
    /// Creates a new document owned by `user_id`
    ///
    /// The caller verifies project ownership first; this method only
    /// persists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails
    pub async fn create(
        pool: &PgPool,
        user_id: i64,
        data: CreateDocument,
    ) -> Result<Self, sqlx::Error> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (title, content, project_id, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, content, project_id, user_id, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.content)
        .bind(data.project_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(document)
    }

    /// Finds a document by ID, scoped to its owner
    ///
    /// Returns `None` both for missing and for foreign documents.
    pub async fn find_by_id(
        pool: &PgPool,
        user_id: i64,
        id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            SELECT id, title, content, project_id, user_id, created_at, updated_at
            FROM documents
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(document)
    }

    /// Lists all documents in a project, scoped to the owner
    pub async fn list_by_project(
        pool: &PgPool,
        user_id: i64,
        project_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let documents = sqlx::query_as::<_, Document>(
            r#"
            SELECT id, title, content, project_id, user_id, created_at, updated_at
            FROM documents
            WHERE project_id = $1 AND user_id = $2
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(documents)
    }

    /// Updates a document's mutable fields, scoped to its owner
    ///
    /// `updated_at` refreshes on every successful mutation. Returns `None`
    /// when no row matched (missing or foreign).
    pub async fn update(
        pool: &PgPool,
        user_id: i64,
        id: i64,
        data: UpdateDocument,
    ) -> Result<Option<Self>, sqlx::Error> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            UPDATE documents
            SET title = $3,
                content = $4,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, title, content, project_id, user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(data.title)
        .bind(data.content)
        .fetch_optional(pool)
        .await?;

        Ok(document)
    }

    /// Deletes a document, scoped to its owner
    ///
    /// Returns `false` when no row matched.
    pub async fn delete(pool: &PgPool, user_id: i64, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
