//! Shared response types.

mod response;

pub use response::{AuthResponse, DataResponse, ErrorsResponse, PortraitResponse, SendResponse};
