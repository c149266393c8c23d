//! User account and session types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user.
///
/// The password hash is deliberately absent; repositories expose it only
/// through the credential lookup used at login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub expertise: Vec<String>,
    /// Unpaid reward balance in cents.
    pub earnings_cents: i64,
    pub total_approved_submissions: i64,
    pub is_verified_org: bool,
    pub organization_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Name shown in exports: the full name when set, else the username.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

/// Data for registering a new user.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub expertise: Vec<String>,
    pub is_verified_org: bool,
    pub organization_name: Option<String>,
}

/// An authenticated session issued at login or registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user(name: Option<&str>) -> User {
        User {
            id: 1,
            username: "fern".to_string(),
            name: name.map(str::to_string),
            email: None,
            expertise: vec![],
            earnings_cents: 0,
            total_approved_submissions: 0,
            is_verified_org: false,
            organization_name: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        assert_eq!(user(None).display_name(), "fern");
        assert_eq!(user(Some("  ")).display_name(), "fern");
        assert_eq!(user(Some("Fern Gully")).display_name(), "Fern Gully");
    }

    #[test]
    fn test_session_expiry() {
        let now = Utc::now();
        let session = Session {
            token: "t".to_string(),
            user_id: 1,
            created_at: now,
            expires_at: now + Duration::hours(1),
        };
        assert!(!session.is_expired(now));
        assert!(session.is_expired(now + Duration::hours(2)));
    }
}
