/// Project endpoints
///
/// Project CRUD plus the project-scoped operations: bulk reclassification
/// of cards and the tag/category aggregation views.
///
/// # Endpoints
///
/// - `POST /api/projects` - Create a project
/// - `GET /api/projects?q=` - List (optionally search) the caller's projects
/// - `GET /api/projects/:id` - Fetch one project
/// - `PUT /api/projects/:id` - Update name/description
/// - `DELETE /api/projects/:id` - Delete (cascades to cards and documents)
/// - `POST /api/projects/:id/reclassify` - Re-cluster all cards atomically
/// - `GET /api/projects/:id/tags` - Unique tags across the project
/// - `GET /api/projects/:id/categories` - Category groupings

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use cardbase_shared::{
    ai::CategoryGroup,
    auth::{authorization::require_project_owner, middleware::AuthContext},
    cluster::{cluster_project_cards, ClusterSummary},
    models::{
        card::Card,
        project::{CreateProject, Project, UpdateProject},
    },
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create project request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Project name (unique system-wide)
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// Free-form description
    #[serde(default)]
    #[validate(length(max = 10000))]
    pub description: String,
}

/// Update project request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    /// New project name
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// New description
    #[serde(default)]
    #[validate(length(max = 10000))]
    pub description: String,
}

/// Query parameters for listing projects
#[derive(Debug, Deserialize)]
pub struct ListProjectsQuery {
    /// Optional search term, matched against the project name
    pub q: Option<String>,
}

/// Response for the tag aggregation view
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectTagsResponse {
    /// Distinct tags across the project, sorted
    pub tags: Vec<String>,
}

/// Response for the category aggregation view
#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectCategoriesResponse {
    /// Named categories and their member card ids
    pub categories: Vec<CategoryGroup>,
}

/// Creates a project owned by the caller
///
/// # Errors
///
/// - `409 Conflict`: the name is already taken
/// - `422 Unprocessable Entity`: validation failed
pub async fn create_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    req.validate().map_err(ApiError::from_validation)?;

    let project = Project::create(
        &state.db,
        auth.user_id,
        CreateProject {
            name: req.name,
            description: req.description,
        },
    )
    .await?;

    tracing::info!(project_id = project.id, user_id = auth.user_id, "Project created");

    Ok((StatusCode::CREATED, Json(project)))
}

/// Lists the caller's projects, optionally filtered by `?q=`
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListProjectsQuery>,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = Project::list(&state.db, auth.user_id, query.q.as_deref()).await?;

    Ok(Json(projects))
}

/// Fetches one project by id
///
/// # Errors
///
/// - `404 Not Found`: missing or owned by someone else
pub async fn get_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Project>> {
    let project = Project::find_by_id(&state.db, auth.user_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(project))
}

/// Updates a project's name and description
///
/// # Errors
///
/// - `404 Not Found`: missing or owned by someone else
/// - `409 Conflict`: the new name is already taken
pub async fn update_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateProjectRequest>,
) -> ApiResult<Json<Project>> {
    req.validate().map_err(ApiError::from_validation)?;

    let project = Project::update(
        &state.db,
        auth.user_id,
        id,
        UpdateProject {
            name: req.name,
            description: req.description,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(project))
}

/// Deletes a project and everything under it
///
/// # Errors
///
/// - `404 Not Found`: missing or owned by someone else
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let deleted = Project::delete(&state.db, auth.user_id, id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }

    tracing::info!(project_id = id, user_id = auth.user_id, "Project deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Re-clusters every card in the project atomically
///
/// Snapshots all cards, submits them to the classification backend in one
/// batched call, and applies the result as a single reset-then-apply
/// transaction. Either every card reflects the new clustering or none do.
///
/// # Errors
///
/// - `403 Forbidden` / `404 Not Found`: ownership check failed
/// - `400 Bad Request`: the project has no cards
/// - `502 Bad Gateway`: the classification backend failed (no mutation done)
pub async fn reclassify_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ClusterSummary>> {
    let summary = cluster_project_cards(&state.db, state.ai.as_ref(), auth.user_id, id).await?;

    Ok(Json(summary))
}

/// Returns the distinct tags across the project's cards
///
/// # Errors
///
/// - `403 Forbidden` / `404 Not Found`: ownership check failed
pub async fn project_tags(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ProjectTagsResponse>> {
    require_project_owner(&state.db, id, auth.user_id).await?;

    let tags = Card::unique_tags(&state.db, auth.user_id, id).await?;

    Ok(Json(ProjectTagsResponse { tags }))
}

/// Returns the project's category groupings
///
/// Unclassified cards are not reported as a group.
///
/// # Errors
///
/// - `403 Forbidden` / `404 Not Found`: ownership check failed
pub async fn project_categories(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ProjectCategoriesResponse>> {
    require_project_owner(&state.db, id, auth.user_id).await?;

    let categories = Card::categories(&state.db, auth.user_id, id).await?;

    Ok(Json(ProjectCategoriesResponse { categories }))
}
