//! Address handlers.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{Address, AddressFields};
use crate::errors::AppResult;
use crate::types::DataResponse;

/// Create or update an address; `id` selects the record to update
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SaveAddressRequest {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub sub_locality: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude out of range"))]
    #[serde(default)]
    pub lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude out of range"))]
    #[serde(default)]
    pub lng: Option<f64>,
}

impl SaveAddressRequest {
    fn into_parts(self) -> (Option<Uuid>, AddressFields) {
        (
            self.id,
            AddressFields {
                street: self.street,
                sub_locality: self.sub_locality,
                postal_code: self.postal_code,
                province: self.province,
                city: self.city,
                lat: self.lat,
                lng: self.lng,
            },
        )
    }
}

/// Create address routes (all require authentication)
pub fn address_routes() -> Router<AppState> {
    Router::new()
        .route("/addresses", get(list_addresses).post(save_address))
        .route("/addresses/:id", get(get_address).delete(delete_address))
}

/// List addresses
#[utoipa::path(
    get,
    path = "/account/addresses",
    tag = "Addresses",
    responses((status = 200, description = "All addresses", body = Vec<Address>)),
    security(("bearer_auth" = []))
)]
pub async fn list_addresses(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Address>>>> {
    let addresses = state.services.addresses().list_addresses().await?;
    Ok(Json(DataResponse::new(addresses)))
}

/// Get an address
#[utoipa::path(
    get,
    path = "/account/addresses/{id}",
    tag = "Addresses",
    params(("id" = Uuid, Path, description = "Address ID")),
    responses(
        (status = 200, description = "Address found", body = Address),
        (status = 404, description = "Address not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_address(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DataResponse<Address>>> {
    let address = state.services.addresses().get_address(id).await?;
    Ok(Json(DataResponse::new(address)))
}

/// Create an address, or update it when `id` is given
#[utoipa::path(
    post,
    path = "/account/addresses",
    tag = "Addresses",
    request_body = SaveAddressRequest,
    responses(
        (status = 200, description = "Address saved", body = Address),
        (status = 400, description = "Coordinates out of range"),
        (status = 404, description = "Address to update not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn save_address(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SaveAddressRequest>,
) -> AppResult<Json<DataResponse<Address>>> {
    let (id, fields) = payload.into_parts();
    let address = state.services.addresses().save_address(id, fields).await?;
    Ok(Json(DataResponse::new(address)))
}

/// Delete an address; returns the remaining ones, newest first
#[utoipa::path(
    delete,
    path = "/account/addresses/{id}",
    tag = "Addresses",
    params(("id" = Uuid, Path, description = "Address ID")),
    responses(
        (status = 200, description = "Remaining addresses", body = Vec<Address>),
        (status = 404, description = "Address not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_address(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DataResponse<Vec<Address>>>> {
    let remaining = state.services.addresses().delete_address(id).await?;
    Ok(Json(DataResponse::new(remaining)))
}
