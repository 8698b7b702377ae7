/// Card endpoints
///
/// Card CRUD with AI tag enrichment on creation. Creating a card under a
/// project requires owning that project; direct-id operations are scoped
/// by owner inside the query itself.
///
/// # Endpoints
///
/// - `POST /api/cards` - Create a card (tags auto-suggested when absent)
/// - `GET /api/cards?project_id=` - List a project's cards
/// - `GET /api/cards/:id` - Fetch one card
/// - `PUT /api/cards/:id` - Update text/url/tags
/// - `DELETE /api/cards/:id` - Delete

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
    auth::{authorization::require_project_owner, middleware::AuthContext},
    models::card::{Card, CreateCard, UpdateCard},
};
use serde::Deserialize;
use validator::Validate;

/// Create card request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCardRequest {
    /// Note text
    #[validate(length(min = 1, max = 100000))]
    pub text: String,

    /// Optional source URL
    #[serde(default)]
    #[validate(length(max = 2048))]
    pub url: String,

    /// Tags; when empty, suggestions are requested from the AI service
    #[serde(default)]
    pub tags: Vec<String>,

    /// Parent project
    pub project_id: i64,
}

/// Update card request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCardRequest {
    /// New note text
    #[validate(length(min = 1, max = 100000))]
    pub text: String,

    /// New source URL
    #[serde(default)]
    #[validate(length(max = 2048))]
    pub url: String,

    /// New tags
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Query parameters for listing cards
#[derive(Debug, Deserialize)]
pub struct ListCardsQuery {
    /// Project to list cards for
    pub project_id: i64,
}

/// Creates a card under one of the caller's projects
///
/// When the payload carries no tags and non-empty text, the AI service is
/// asked for suggestions. That call is best-effort: on any failure the
/// card is still created with an empty tag set and the failure is only
/// logged.
///
/// # Errors
///
/// - `403 Forbidden` / `404 Not Found`: the target project is not the
///   caller's
/// - `422 Unprocessable Entity`: validation failed
pub async fn create_card(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateCardRequest>,
) -> ApiResult<(StatusCode, Json<Card>)> {
    req.validate().map_err(ApiError::from_validation)?;

    require_project_owner(&state.db, req.project_id, auth.user_id).await?;

    let mut tags = req.tags;
    if tags.is_empty() && !req.text.trim().is_empty() {
        match state.ai.suggest_tags(&req.text).await {
            Ok(suggested) => tags = suggested,
            Err(e) => {
                tracing::warn!(error = %e, "Tag suggestion failed; creating card without tags");
            }
        }
    }

    let card = Card::create(
        &state.db,
        auth.user_id,
        CreateCard {
            text: req.text,
            url: req.url,
            tags,
            project_id: req.project_id,
        },
    )
    .await?;

    tracing::info!(card_id = card.id, project_id = card.project_id, "Card created");

    Ok((StatusCode::CREATED, Json(card)))
}

/// Lists a project's cards
///
/// # Errors
///
/// - `403 Forbidden` / `404 Not Found`: ownership check failed
pub async fn list_cards(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListCardsQuery>,
) -> ApiResult<Json<Vec<Card>>> {
    require_project_owner(&state.db, query.project_id, auth.user_id).await?;

    let cards = Card::list_by_project(&state.db, auth.user_id, query.project_id).await?;

    Ok(Json(cards))
}

/// Fetches one card by id
///
/// # Errors
///
/// - `404 Not Found`: missing or owned by someone else
pub async fn get_card(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Card>> {
    let card = Card::find_by_id(&state.db, auth.user_id, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Card not found".to_string()))?;

    Ok(Json(card))
}

/// Updates a card's content fields
///
/// # Errors
///
/// - `404 Not Found`: missing or owned by someone else
pub async fn update_card(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateCardRequest>,
) -> ApiResult<Json<Card>> {
    req.validate().map_err(ApiError::from_validation)?;

    let card = Card::update(
        &state.db,
        auth.user_id,
        id,
        UpdateCard {
            text: req.text,
            url: req.url,
            tags: req.tags,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Card not found".to_string()))?;

    Ok(Json(card))
}

/// Deletes a card
///
/// # Errors
///
/// - `404 Not Found`: missing or owned by someone else
pub async fn delete_card(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let deleted = Card::delete(&state.db, auth.user_id, id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Card not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT)
}
