//! Response envelopes understood by existing clients.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::PublicProfile;
use crate::services::AuthOutcome;

/// `{token, data}` returned by signup, login and account edits
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    pub data: PublicProfile,
}

impl From<AuthOutcome> for AuthResponse {
    fn from(outcome: AuthOutcome) -> Self {
        Self {
            token: outcome.token,
            data: outcome.profile,
        }
    }
}

/// `{data}` wrapper
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// `{errors: [...]}`; an empty list means success
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorsResponse {
    pub errors: Vec<u8>,
}

impl ErrorsResponse {
    pub fn ok() -> Self {
        Self { errors: Vec::new() }
    }
}

/// `{portrait}` returned by portrait uploads
#[derive(Debug, Serialize, ToSchema)]
pub struct PortraitResponse {
    #[schema(example = "portraits/550e8400-e29b-41d4-a716-446655440000.png")]
    pub portrait: Option<String>,
}

/// `{send}`: "0" when the mail went out, "" otherwise
#[derive(Debug, Serialize, ToSchema)]
pub struct SendResponse {
    pub send: &'static str,
}

impl SendResponse {
    pub fn from_outcome(sent: bool) -> Self {
        Self {
            send: if sent { "0" } else { "" },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelopes() {
        assert_eq!(serde_json::to_string(&ErrorsResponse::ok()).unwrap(), r#"{"errors":[]}"#);
        assert_eq!(serde_json::to_string(&SendResponse::from_outcome(true)).unwrap(), r#"{"send":"0"}"#);
        assert_eq!(serde_json::to_string(&SendResponse::from_outcome(false)).unwrap(), r#"{"send":""}"#);
        assert_eq!(
            serde_json::to_string(&PortraitResponse { portrait: None }).unwrap(),
            r#"{"portrait":null}"#
        );
    }
}
