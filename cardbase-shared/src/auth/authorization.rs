/// Project ownership guard
///
/// Every operation that targets a project — creating a card or document
/// under it, listing its contents, reclassifying it — runs through
/// [`require_project_owner`] before touching project data. The guard
/// re-reads the authoritative projects row on every call; ownership is
/// never cached or inferred from earlier requests.
///
/// Direct-id checks on cards and documents do not use this guard: there the
/// ownership filter is folded into the data query itself
/// (`WHERE id = $1 AND user_id = $2`) and a zero-row result is reported as
/// "not found" without revealing whether the row exists under another
/// owner.
///
/// # Example
///
/// ```no_run
/// use cardbase_shared::auth::authorization::require_project_owner;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool, user_id: i64, project_id: i64) -> Result<(), Box<dyn std::error::Error>> {
/// require_project_owner(&pool, project_id, user_id).await?;
/// // safe to operate on the project's cards from here
/// # Ok(())
/// # }
/// ```

use sqlx::PgPool;

use crate::models::project::Project;

/// Error type for ownership checks
#[derive(Debug, thiserror::Error)]
pub enum OwnershipError {
    /// No such project exists
    #[error("Project {0} not found")]
    ProjectNotFound(i64),

    /// The project exists but belongs to someone else
    #[error("Not the owner of project {0}")]
    NotProjectOwner(i64),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Checks that `user_id` owns `project_id`
///
/// # Returns
///
/// `Ok(())` when the caller owns the project
///
/// # Errors
///
/// - `OwnershipError::ProjectNotFound` when no such project exists
/// - `OwnershipError::NotProjectOwner` when it is owned by another user
/// - `OwnershipError::Database` when the lookup itself fails
pub async fn require_project_owner(
    pool: &PgPool,
    project_id: i64,
    user_id: i64,
) -> Result<(), OwnershipError> {
    let owner = Project::owner_of(pool, project_id)
        .await?
        .ok_or(OwnershipError::ProjectNotFound(project_id))?;

    if owner != user_id {
        return Err(OwnershipError::NotProjectOwner(project_id));
    }

    Ok(())
}
