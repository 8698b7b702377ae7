/// Authentication endpoints
///
/// GitHub OAuth login flow plus the current-user endpoint. The OAuth
/// mechanics live entirely in this module: the rest of the system only
/// ever sees the verified numeric user id carried by the access token.
///
/// # Endpoints
///
/// - `GET /auth/github` - Redirect to GitHub's authorization page
/// - `GET /auth/github/callback` - Exchange the code, upsert the user,
///   issue an access token
/// - `POST /auth/logout` - Stateless acknowledgment (clients drop the token)
/// - `GET /api/me` - Current user's name (authenticated)
///
/// CSRF protection uses a signed short-lived `state` token verified
/// statelessly on callback, so no server-side session storage is needed.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Redirect,
    Extension, Json,
};
use cardbase_shared::{
    auth::{jwt, middleware::AuthContext},
    models::user::User,
};
use serde::{Deserialize, Serialize};

/// GitHub authorization endpoint
const GITHUB_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";

/// GitHub token exchange endpoint
const GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";

/// GitHub user info endpoint
const GITHUB_USER_URL: &str = "https://api.github.com/user";

/// Query parameters GitHub sends to the callback
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange
    pub code: String,

    /// Signed state issued by `github_login`
    pub state: String,
}

/// GitHub token exchange response
#[derive(Debug, Deserialize)]
struct GithubTokenResponse {
    access_token: String,
}

/// GitHub user info response
#[derive(Debug, Deserialize)]
struct GithubUser {
    /// GitHub's stable numeric id
    id: i64,

    /// GitHub login name
    login: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// User ID
    pub user_id: i64,

    /// Username
    pub username: String,

    /// Access token (8h)
    pub access_token: String,
}

/// Current user response
#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    /// Username
    pub username: String,
}

/// Redirects the browser to GitHub's authorization page
///
/// The `state` parameter is a signed 10-minute token, verified on
/// callback.
pub async fn github_login(State(state): State<AppState>) -> ApiResult<Redirect> {
    let login_state = jwt::create_login_state(state.jwt_secret())?;

    let url = format!(
        "{}?client_id={}&redirect_uri={}&scope=read:user&state={}",
        GITHUB_AUTHORIZE_URL,
        state.config.github.client_id,
        state.config.github.redirect_url,
        login_state,
    );

    Ok(Redirect::temporary(&url))
}

/// OAuth callback: exchanges the code, upserts the user, issues a token
///
/// # Errors
///
/// - `401 Unauthorized`: state verification failed (forged or stale login)
/// - `502 Bad Gateway`: GitHub unreachable or returned an unusable response
pub async fn github_callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> ApiResult<Json<LoginResponse>> {
    jwt::verify_login_state(&query.state, state.jwt_secret())
        .map_err(|_| ApiError::Unauthorized("Invalid or expired login state".to_string()))?;

    let client = reqwest::Client::new();

    let token: GithubTokenResponse = client
        .post(GITHUB_TOKEN_URL)
        .header("Accept", "application/json")
        .form(&[
            ("client_id", state.config.github.client_id.as_str()),
            ("client_secret", state.config.github.client_secret.as_str()),
            ("code", query.code.as_str()),
        ])
        .send()
        .await
        .map_err(|e| ApiError::UpstreamError(format!("GitHub token exchange failed: {}", e)))?
        .json()
        .await
        .map_err(|e| ApiError::UpstreamError(format!("GitHub token response invalid: {}", e)))?;

    let github_user: GithubUser = client
        .get(GITHUB_USER_URL)
        .header("Accept", "application/json")
        .header("User-Agent", "cardbase")
        .bearer_auth(&token.access_token)
        .send()
        .await
        .map_err(|e| ApiError::UpstreamError(format!("GitHub user lookup failed: {}", e)))?
        .json()
        .await
        .map_err(|e| ApiError::UpstreamError(format!("GitHub user response invalid: {}", e)))?;

    let user = User::upsert(&state.db, github_user.id, &github_user.login).await?;

    tracing::info!(user_id = user.id, username = %user.username, "Login successful");

    let access_token = jwt::create_access_token(user.id, state.jwt_secret())?;

    Ok(Json(LoginResponse {
        user_id: user.id,
        username: user.username,
        access_token,
    }))
}

/// Logout acknowledgment
///
/// Access tokens are stateless; logging out is the client discarding its
/// token. The endpoint exists so clients have something to call.
pub async fn logout() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Returns the authenticated user's name
///
/// # Errors
///
/// - `404 Not Found`: the token's subject no longer has a user row
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<MeResponse>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(MeResponse {
        username: user.username,
    }))
}
