//! Botany assistant DTOs.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub prompt: String,
    pub system_message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub message: &'static str,
    pub response: String,
}
