//! Contact form handler.

use axum::{extract::State, response::Json, routing::post, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::ContactRequest;
use crate::types::SendResponse;

/// Contact form submission
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ContactFormRequest {
    #[serde(default)]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
}

pub fn contact_routes() -> Router<AppState> {
    Router::new().route("/contact", post(contact))
}

/// Forward a contact request to the site mailbox
#[utoipa::path(
    post,
    path = "/account/contact",
    tag = "Contact",
    request_body = ContactFormRequest,
    responses((status = 200, description = "`send` is \"0\" when the mail went out, empty otherwise", body = SendResponse))
)]
pub async fn contact(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ContactFormRequest>,
) -> AppResult<Json<SendResponse>> {
    let sent = state
        .services
        .contact()
        .send(ContactRequest {
            name: payload.name,
            email: payload.email,
            phone: payload.phone,
            message: payload.message,
        })
        .await;

    Ok(Json(SendResponse::from_outcome(sent)))
}
