/// Document endpoints
///
/// Document CRUD with AI report generation on creation. When a document is
/// created without content, the report-generation backend is called with
/// the project's full context (tags, category groupings, card snapshots);
/// if that fails the document is still created with placeholder content.
///
/// # Endpoints
///
/// - `POST /api/documents` - Create a document (content generated if absent)
/// - `GET /api/documents?project_id=` - List a project's documents
/// - `GET /api/documents/:id` - Fetch one document
/// - `PUT /api/documents/:id` - Update title/content
/// - `DELETE /api/documents/:id` - Delete

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
    ai::ReportRequest,
    auth::{authorization::require_project_owner, middleware::AuthContext},
    models::{
        card::Card,
        document::{CreateDocument, Document, UpdateDocument},
    },
};
use serde::Deserialize;
use validator::Validate;

/// Create document request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDocumentRequest {
    /// Document title
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    /// Document body; generated from project context when empty
    #[serde(default)]
    pub content: String,

    /// Parent project
    pub project_id: i64,
}

/// Update document request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateDocumentRequest {
    /// New title
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    /// New body
    pub content: String,
}

/// Query parameters for listing documents
#[derive(Debug, Deserialize)]
pub struct ListDocumentsQuery {
    /// Project to list documents for
    pub project_id: i64,
}

/// Fallback body used when report generation fails
fn placeholder_content(title: &str) -> String {
    format!("<h2>{}</h2><p>Newly created document. Add your content here.</p>", title)
}

/// Creates a document under one of the caller's projects
///
/// An empty content field asks the report-generation backend for a body
/// built from the project's tags, categories, and cards. The call is
/// best-effort: on failure the document is created with placeholder
/// content and the failure is only logged.
///
/// # Errors
///
/// - `403 Forbidden` / `404 Not Found`: the target project is not the
///   caller's
/// - `422 Unprocessable Entity`: validation failed
pub async fn create_document(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateDocumentRequest>,
) -> ApiResult<(StatusCode, Json<Document>)> {
    req.validate().map_err(ApiError::from_validation)?;

    require_project_owner(&state.db, req.project_id, auth.user_id).await?;

    let content = if req.content.trim().is_empty() {
        generate_content(&state, auth.user_id, req.project_id, &req.title).await
    } else {
        req.content
    };

    let document = Document::create(
        &state.db,
        auth.user_id,
        CreateDocument {
            title: req.title,
            content,
            project_id: req.project_id,
        },
    )
    .await?;

    tracing::info!(
        document_id = document.id,
        project_id = document.project_id,
        "Document created"
    );

    Ok((StatusCode::CREATED, Json(document)))
}

/// Builds report content from project context, falling back to a
/// placeholder when the backend fails
async fn generate_content(
    state: &AppState,
    user_id: i64,
    project_id: i64,
    title: &str,
) -> String {
    let context = async {
        let tags = Card::unique_tags(&state.db, user_id, project_id).await?;
        let categories = Card::categories(&state.db, user_id, project_id).await?;
        let cards = Card::snapshot_for_clustering(&state.db, user_id, project_id).await?;
        Ok::<_, sqlx::Error>((tags, categories, cards))
    }
    .await;

    let (tags, categories, cards) = match context {
        Ok(context) => context,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to gather report context; using placeholder");
            return placeholder_content(title);
        }
    };

    let request = ReportRequest {
        topic: title.to_string(),
        tags,
        categories,
        cards,
    };

    match state.ai.generate_report(&request).await {
        Ok(report) => report,
        Err(e) => {
            tracing::warn!(error = %e, "Report generation failed; using placeholder");
            placeholder_content(title)
        }
    }
}

/// Lists a project's documents
///
/// # Errors
///
/// - `403 Forbidden` / `404 Not Found`: ownership check failed
pub async fn list_documents(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListDocumentsQuery>,
) -> ApiResult<Json<Vec<Document>>> {
    require_project_owner(&state.db, query.project_id, auth.user_id).await?;

    let documents = Document::list_by_project(&state.db, auth.user_id, query.project_id).await?;

    Ok(Json(documents))
}

/// Fetches one document by id
///
/// # Errors
///
/// - `404 Not Found`: missing or owned by someone else
pub async fn get_document(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Document>> {
    let document = Document::find_by_id(&state.db, auth.user_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Document not found".to_string()))?;

    Ok(Json(document))
}

/// Updates a document's title and content
///
/// # Errors
///
/// - `404 Not Found`: missing or owned by someone else
pub async fn update_document(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateDocumentRequest>,
) -> ApiResult<Json<Document>> {
    req.validate().map_err(ApiError::from_validation)?;

    let document = Document::update(
        &state.db,
        auth.user_id,
        id,
        UpdateDocument {
            title: req.title,
            content: req.content,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Document not found".to_string()))?;

    Ok(Json(document))
}

/// Deletes a document
///
/// # Errors
///
/// - `404 Not Found`: missing or owned by someone else
pub async fn delete_document(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let deleted = Document::delete(&state.db, auth.user_id, id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Document not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
