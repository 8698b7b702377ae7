/// Project model and database operations
///
/// Projects are the top-level containers: every card and document belongs
/// to exactly one project, and a project belongs to exactly one user. The
/// owner is set at creation and never reassigned. Project names are unique
/// across the whole system, not per user.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(255) NOT NULL UNIQUE,
///     description TEXT NOT NULL DEFAULT '',
///     user_id BIGINT NOT NULL REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use cardbase_shared::models::project::{CreateProject, Project};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, user_id: i64) -> Result<(), sqlx::Error> {
/// let project = Project::create(&pool, user_id, CreateProject {
///     name: "Reading list".to_string(),
///     description: "Articles to triage".to_string(),
/// }).await?;
///
/// // Owner-scoped fetch: another user asking for this id gets None.
/// let found = Project::find_by_id(&pool, user_id, project.id).await?;
/// assert!(found.is_some());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Project model representing a container of cards and documents
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID
    pub id: i64,

    /// Project name, unique system-wide
    pub name: String,

    /// Free-form description
    pub description: String,

    /// Owning user; set at creation, never reassigned
    pub user_id: i64,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    /// Project name
    pub name: String,

    /// Free-form description
    pub description: String,
}

/// Input for updating an existing project
///
/// Only name and description are mutable; the owner never changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProject {
    /// New project name
    pub name: String,

    /// New description
    pub description: String,
}

impl Project {
    /// Creates a new project owned by `user_id`
    ///
    /// The owner always comes from the authenticated caller, never from the
    /// payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the name collides with an existing project
    /// (unique constraint) or the database operation fails
    pub async fn create(
        pool: &PgPool,
        user_id: i64,
        data: CreateProject,
    ) -> Result<Self, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, description, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, user_id, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(user_id)
        .fetch_one(pool)
        .await?;

        Ok(project)
    }

    /// Finds a project by ID, scoped to its owner
    ///
    /// Returns `None` both when the project does not exist and when it is
    /// owned by someone else; callers cannot tell the two apart.
    pub async fn find_by_id(
        pool: &PgPool,
        user_id: i64,
        id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, user_id, created_at, updated_at
            FROM projects
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Looks up the owner of a project without scoping
    ///
    /// This is the one unscoped read, used by the ownership guard to decide
    /// between "no such project" and "not yours". It re-reads the
    /// authoritative row on every call; ownership is never cached.
    pub async fn owner_of(pool: &PgPool, id: i64) -> Result<Option<i64>, sqlx::Error> {
        let owner: Option<(i64,)> = sqlx::query_as("SELECT user_id FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(owner.map(|(user_id,)| user_id))
    }

    /// Lists the caller's projects, optionally filtered by a search query
    ///
    /// The query is matched case-insensitively against the project name
    /// with all spaces stripped, so "readinglist" finds "Reading List".
    pub async fn list(
        pool: &PgPool,
        user_id: i64,
        query: Option<&str>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let projects = match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => {
                let term = q.replace(' ', "").to_lowercase();
                sqlx::query_as::<_, Project>(
                    r#"
                    SELECT id, name, description, user_id, created_at, updated_at
                    FROM projects
                    WHERE user_id = $1
                      AND LOWER(REPLACE(name, ' ', '')) LIKE $2
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(user_id)
                .bind(format!("%{}%", term))
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Project>(
                    r#"
                    SELECT id, name, description, user_id, created_at, updated_at
                    FROM projects
                    WHERE user_id = $1
                    ORDER BY created_at DESC
                    "#,
                )
                .bind(user_id)
                .fetch_all(pool)
                .await?
            }
        };

        Ok(projects)
    }

    /// Updates a project's mutable fields, scoped to its owner
    ///
    /// Returns `None` when no row matched (missing or foreign), which the
    /// API layer reports as not found.
    pub async fn update(
        pool: &PgPool,
        user_id: i64,
        id: i64,
        data: UpdateProject,
    ) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET name = $3,
                description = $4,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, name, description, user_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(data.name)
        .bind(data.description)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Deletes a project, scoped to its owner
    ///
    /// Cards and documents under the project are removed by the cascading
    /// foreign keys. Returns `false` when no row matched.
    pub async fn delete(pool: &PgPool, user_id: i64, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
