//! Account, profile and portrait handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{MultipartForm, ValidatedJson};
use crate::api::middleware::{require_owner, CurrentAccount};
use crate::api::AppState;
use crate::domain::{AccountSummary, PublicProfile};
use crate::errors::{AppError, AppResult};
use crate::services::{AccountUpdate, ProfileUpdate};
use crate::types::{AuthResponse, DataResponse, PortraitResponse};

/// Account listing filter
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListAccountsQuery {
    /// Account type to list; omitted lists nothing
    #[serde(rename = "type")]
    pub role: Option<String>,
}

/// Account edit request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAccountRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    /// Accepted only when equal to the current type
    #[serde(rename = "type", default)]
    pub role: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// Leave empty to keep the current password
    #[serde(default)]
    pub password: Option<String>,
}

/// Profile edit request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// File name of an uploaded portrait
    #[serde(default)]
    pub portrait: Option<String>,
}

/// Create account routes (all require authentication)
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_accounts))
        .route("/users/:id", get(get_account).put(update_account))
        .route("/profile", get(get_profile).post(update_profile))
        .route("/portrait", post(upload_portrait))
}

/// List accounts of one type
#[utoipa::path(
    get,
    path = "/account/users",
    tag = "Accounts",
    params(ListAccountsQuery),
    responses((status = 200, description = "Accounts of the requested type", body = Vec<AccountSummary>)),
    security(("bearer_auth" = []))
)]
pub async fn list_accounts(
    State(state): State<AppState>,
    Query(query): Query<ListAccountsQuery>,
) -> AppResult<Json<DataResponse<Vec<AccountSummary>>>> {
    let accounts = state
        .services
        .accounts()
        .list_by_role(query.role.as_deref())
        .await?;
    Ok(Json(DataResponse::new(accounts)))
}

/// Get an account's public profile
#[utoipa::path(
    get,
    path = "/account/users/{id}",
    tag = "Accounts",
    params(("id" = Uuid, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account found", body = PublicProfile),
        (status = 404, description = "Account not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DataResponse<PublicProfile>>> {
    let profile = state.services.accounts().get_account(id).await?;
    Ok(Json(DataResponse::new(profile)))
}

/// Edit an account (owner only); returns a fresh token
#[utoipa::path(
    put,
    path = "/account/users/{id}",
    tag = "Accounts",
    params(("id" = Uuid, Path, description = "Account ID")),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Account updated", body = AuthResponse),
        (status = 400, description = "Invalid fields or an attempt to change the account type"),
        (status = 403, description = "Not the caller's account"),
        (status = 409, description = "Username or email taken by another account")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_account(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateAccountRequest>,
) -> AppResult<Json<AuthResponse>> {
    require_owner(&current, id)?;

    let account = state
        .services
        .accounts()
        .update_account(
            id,
            AccountUpdate {
                username: payload.username,
                email: payload.email,
                role: payload.role,
                first_name: payload.first_name,
                last_name: payload.last_name,
                password: payload.password,
            },
        )
        .await?;

    let outcome = state.services.auth().issue(&account).await?;
    Ok(Json(AuthResponse::from(outcome)))
}

/// Current account's profile
#[utoipa::path(
    get,
    path = "/account/profile",
    tag = "Profile",
    responses((status = 200, description = "Profile", body = PublicProfile)),
    security(("bearer_auth" = []))
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
) -> AppResult<Json<DataResponse<PublicProfile>>> {
    let profile = state.services.accounts().get_account(current.id).await?;
    Ok(Json(DataResponse::new(profile)))
}

/// Update display names and portrait reference
#[utoipa::path(
    post,
    path = "/account/profile",
    tag = "Profile",
    request_body = UpdateProfileRequest,
    responses((status = 200, description = "Profile updated", body = PublicProfile)),
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<DataResponse<PublicProfile>>> {
    let account = state
        .services
        .profiles()
        .update_profile(
            current.id,
            ProfileUpdate {
                first_name: payload.first_name,
                last_name: payload.last_name,
                portrait: payload.portrait,
            },
        )
        .await?;

    Ok(Json(DataResponse::new(account.profile(current.business_id))))
}

/// Upload a portrait (multipart `user_id` + `file`)
#[utoipa::path(
    post,
    path = "/account/portrait",
    tag = "Profile",
    request_body(content = Object, content_type = "multipart/form-data", description = "user_id and file"),
    responses(
        (status = 200, description = "Portrait stored", body = PortraitResponse),
        (status = 400, description = "user_id or file missing", body = PortraitResponse),
        (status = 403, description = "Not the caller's account")
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_portrait(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    mut form: MultipartForm,
) -> AppResult<Response> {
    let user_id = form.text("user_id").and_then(|v| Uuid::parse_str(v).ok());
    let file = form.take_file("file");

    let (Some(user_id), Some(file)) = (user_id, file) else {
        return Ok((StatusCode::BAD_REQUEST, Json(PortraitResponse { portrait: None })).into_response());
    };

    require_owner(&current, user_id)?;

    let path = state
        .services
        .profiles()
        .upload_portrait(user_id, file)
        .await
        .map_err(|e| match e {
            AppError::InvalidInput(_) => e,
            other => {
                tracing::error!(account_id = %user_id, "Portrait upload failed: {}", other);
                other
            }
        })?;

    Ok(Json(PortraitResponse {
        portrait: Some(path),
    })
    .into_response())
}
