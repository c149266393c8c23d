//! Account DTOs.

use agora_core::services::{AuthSession, Registration};
use agora_core::{User, cents_to_dollars};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SUCCESS;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub expertise: Vec<String>,
    #[serde(default)]
    pub is_verified_org: bool,
    pub organization_name: Option<String>,
}

impl From<RegisterRequest> for Registration {
    fn from(req: RegisterRequest) -> Self {
        Self {
            username: req.username,
            password: req.password,
            name: req.name,
            email: req.email,
            expertise: req.expertise,
            is_verified_org: req.is_verified_org,
            organization_name: req.organization_name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub message: &'static str,
    pub token: String,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

impl From<AuthSession> for SessionResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            message: SUCCESS,
            token: session.token,
            username: session.user.username,
            expires_at: session.expires_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UsernameQuery {
    pub username: String,
}

/// Public profile. `earnings` is in dollars.
#[derive(Debug, Serialize)]
pub struct UserProfileDto {
    pub id: i64,
    pub username: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub expertise: Vec<String>,
    pub earnings: f64,
    pub earnings_cents: i64,
    pub total_approved_submissions: i64,
    pub is_verified_org: bool,
    pub organization_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfileDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            earnings: cents_to_dollars(user.earnings_cents),
            earnings_cents: user.earnings_cents,
            username: user.username,
            name: user.name,
            email: user.email,
            expertise: user.expertise,
            total_approved_submissions: user.total_approved_submissions,
            is_verified_org: user.is_verified_org,
            organization_name: user.organization_name,
            created_at: user.created_at,
        }
    }
}
