//! Authentication handlers.

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::{MultipartForm, ValidatedJson};
use crate::api::middleware::{require_owner, CurrentAccount};
use crate::api::AppState;
use crate::domain::AddressFields;
use crate::errors::{AppError, AppResult};
use crate::services::{AuthOutcome, BusinessRegistration, SessionClaims, SignupInput};
use crate::types::{AuthResponse, DataResponse, ErrorsResponse};

/// Account signup request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = "pw1")]
    pub password: String,
    /// `consumer` (default) or `business`
    #[serde(rename = "type", default)]
    #[schema(example = "consumer")]
    pub role: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Username or email
    #[validate(length(min = 1, message = "Account is required"))]
    #[schema(example = "alice")]
    pub account: String,
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "pw1")]
    pub password: String,
}

/// Forgotten password request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    #[schema(example = "alice@example.com")]
    pub email: Option<String>,
}

/// Password change request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    /// Defaults to the authenticated account
    #[serde(default)]
    pub user_id: Option<Uuid>,
    pub old_password: String,
    #[validate(length(min = 1, message = "New password is required"))]
    pub password: String,
}

/// Routes reachable without credentials (stricter rate limit)
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/institution", post(register_institution))
        .route("/password/forgot", post(forgot_password))
}

/// Routes that require an authenticated caller
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/token", get(token).post(token))
        .route("/password/change", post(change_password))
}

/// Open a browser session next to the issued token.
async fn with_session(
    state: &AppState,
    jar: CookieJar,
    outcome: AuthOutcome,
) -> (CookieJar, Json<AuthResponse>) {
    let jar = match state.sessions() {
        Some(sessions) => sessions.start(jar, &outcome.claims).await,
        None => jar,
    };
    (jar, Json(AuthResponse::from(outcome)))
}

/// Create an account
#[utoipa::path(
    post,
    path = "/account/signup",
    tag = "Authentication",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created", body = AuthResponse),
        (status = 400, description = "Missing fields, invalid email or unknown type"),
        (status = 409, description = "Username or email already taken")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> AppResult<(CookieJar, Json<AuthResponse>)> {
    let outcome = state
        .services
        .auth()
        .signup(SignupInput {
            username: payload.username,
            email: payload.email,
            password: payload.password,
            role: payload.role,
        })
        .await?;

    Ok(with_session(&state, jar, outcome).await)
}

/// Log in with username or email
#[utoipa::path(
    post,
    path = "/account/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Unknown account or wrong password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<(CookieJar, Json<AuthResponse>)> {
    let outcome = state
        .services
        .auth()
        .login(&payload.account, &payload.password)
        .await
        .map_err(AppError::conceal_account_lookup)?;

    Ok(with_session(&state, jar, outcome).await)
}

/// End the browser session
#[utoipa::path(
    post,
    path = "/account/logout",
    tag = "Authentication",
    responses((status = 200, description = "Session closed", body = ErrorsResponse))
)]
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<ErrorsResponse>) {
    let jar = match state.sessions() {
        Some(sessions) => sessions.end(jar).await,
        None => jar,
    };
    (jar, Json(ErrorsResponse::ok()))
}

/// Claims of the presented token
#[utoipa::path(
    get,
    path = "/account/token",
    tag = "Authentication",
    responses(
        (status = 200, description = "Token claims", body = SessionClaims),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn token(Extension(current): Extension<CurrentAccount>) -> Json<DataResponse<SessionClaims>> {
    Json(DataResponse::new(current.claims()))
}

/// Register a business with its administrator account (multipart form)
#[utoipa::path(
    post,
    path = "/account/institution",
    tag = "Authentication",
    request_body(content = Object, content_type = "multipart/form-data", description = "username, email, password, name, lat, lng, address fields and optional image"),
    responses(
        (status = 200, description = "Business registered", body = AuthResponse),
        (status = 400, description = "Missing fields or bad coordinates"),
        (status = 409, description = "An account with this email exists")
    )
)]
pub async fn register_institution(
    State(state): State<AppState>,
    mut form: MultipartForm,
) -> AppResult<Json<AuthResponse>> {
    let name = form
        .text("name")
        .filter(|n| !n.is_empty())
        .or_else(|| form.text("restaurant"))
        .unwrap_or_default()
        .to_string();

    let registration = BusinessRegistration {
        username: form.text_or_default("username"),
        email: form.text_or_default("email"),
        password: form.raw("password").unwrap_or_default().to_string(),
        name,
        description: form.text_or_default("description"),
        address: AddressFields {
            street: form.text("street").map(str::to_string),
            sub_locality: form.text("sub_locality").map(str::to_string),
            postal_code: form.text("postal_code").map(str::to_string),
            province: form.text("province").map(str::to_string),
            city: form.text("city").map(str::to_string),
            lat: None,
            lng: None,
        },
        lat: form.text("lat").map(str::to_string),
        lng: form.text("lng").map(str::to_string),
        image: form.take_file("image"),
    };

    let outcome = state.services.auth().register_business(registration).await?;
    Ok(Json(AuthResponse::from(outcome)))
}

/// Mail a temporary password
#[utoipa::path(
    post,
    path = "/account/password/forgot",
    tag = "Authentication",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Temporary password sent", body = ErrorsResponse),
        (status = 400, description = "Email missing"),
        (status = 404, description = "No account with this email")
    )
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ForgotPasswordRequest>,
) -> AppResult<Json<ErrorsResponse>> {
    let email = payload.email.unwrap_or_default();
    state.services.auth().request_password_reset(&email).await?;
    Ok(Json(ErrorsResponse::ok()))
}

/// Change the caller's password
#[utoipa::path(
    post,
    path = "/account/password/change",
    tag = "Authentication",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = ErrorsResponse),
        (status = 401, description = "Old password does not match"),
        (status = 403, description = "Not the caller's account")
    ),
    security(("bearer_auth" = []))
)]
pub async fn change_password(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentAccount>,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<Json<ErrorsResponse>> {
    let account_id = payload.user_id.unwrap_or(current.id);
    require_owner(&current, account_id)?;

    state
        .services
        .auth()
        .change_password(account_id, &payload.old_password, &payload.password)
        .await?;

    Ok(Json(ErrorsResponse::ok()))
}
