mod link;

pub use link::{
    CreateLinkRequest, CreateLinkResponse, ExpirationInput, LinkResponse, PasswordForm,
};

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
