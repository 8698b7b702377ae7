/// Database models for cardbase
///
/// This module contains all database models and their CRUD operations.
/// Every read and mutation on an owned resource is additionally filtered by
/// `user_id`; a zero-row result is reported as "not found" whether the row
/// is missing or belongs to someone else.
///
/// # Models
///
/// - `user`: User accounts, keyed by the external OAuth identity
/// - `project`: Top-level containers owned by exactly one user
/// - `card`: Atomic notes within a project, with tags and a category label
/// - `document`: Generated or user-written reports within a project
///
/// # Example
///
/// ```no_run
/// use cardbase_shared::models::project::{CreateProject, Project};
/// use cardbase_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example(user_id: i64) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let project = Project::create(&pool, user_id, CreateProject {
///     name: "Research notes".to_string(),
///     description: "Papers and snippets".to_string(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod card;
pub mod document;
pub mod project;
pub mod user;
