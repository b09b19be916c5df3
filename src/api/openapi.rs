//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{account_handler, address_handler, auth_handler, contact_handler};
use crate::domain::{AccountRole, AccountSummary, Address, AddressFields, PublicProfile};
use crate::services::SessionClaims;
use crate::types::{AuthResponse, ErrorsResponse, PortraitResponse, SendResponse};

/// OpenAPI documentation for the Account API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Account API",
        version = "0.1.0",
        description = "Accounts, sessions, business registration, profiles, addresses and contact mail"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::signup,
        auth_handler::login,
        auth_handler::logout,
        auth_handler::token,
        auth_handler::register_institution,
        auth_handler::forgot_password,
        auth_handler::change_password,
        // Account endpoints
        account_handler::list_accounts,
        account_handler::get_account,
        account_handler::update_account,
        account_handler::get_profile,
        account_handler::update_profile,
        account_handler::upload_portrait,
        // Address endpoints
        address_handler::list_addresses,
        address_handler::get_address,
        address_handler::save_address,
        address_handler::delete_address,
        // Contact
        contact_handler::contact,
    ),
    components(
        schemas(
            // Domain types
            AccountRole,
            PublicProfile,
            AccountSummary,
            Address,
            AddressFields,
            SessionClaims,
            // Envelopes
            AuthResponse,
            ErrorsResponse,
            PortraitResponse,
            SendResponse,
            // Request bodies
            auth_handler::SignupRequest,
            auth_handler::LoginRequest,
            auth_handler::ForgotPasswordRequest,
            auth_handler::ChangePasswordRequest,
            account_handler::UpdateAccountRequest,
            account_handler::UpdateProfileRequest,
            address_handler::SaveAddressRequest,
            contact_handler::ContactFormRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Signup, login, sessions and passwords"),
        (name = "Accounts", description = "Account lookup and edits"),
        (name = "Profile", description = "Display names and portraits"),
        (name = "Addresses", description = "Postal addresses"),
        (name = "Contact", description = "Contact form relay")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /account/login"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_account_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/account/signup",
            "/account/login",
            "/account/token",
            "/account/institution",
            "/account/users/{id}",
            "/account/portrait",
            "/account/addresses/{id}",
            "/account/contact",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
