//! Account service - registration, login and session resolution.

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use chrono::{DateTime, Duration, Utc};

use crate::domain::{NewUser, Session, User};
use crate::ports::{CoreError, RepositoryError, SessionRepository, UserRepository};
use crate::utils::validation::{optional_text, require_text};

/// Default session lifetime.
pub const DEFAULT_SESSION_TTL_DAYS: i64 = 7;

/// Argon2id cost parameters for new password hashes.
///
/// Verification always uses the parameters stored in the hash itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordCost {
    pub memory_kib: u32,
    pub iterations: u32,
}

impl Default for PasswordCost {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
        }
    }
}

impl PasswordCost {
    /// Cheapest parameters argon2 accepts. For tests only.
    pub const fn minimal() -> Self {
        Self {
            memory_kib: Params::MIN_M_COST,
            iterations: Params::MIN_T_COST,
        }
    }
}

/// Profile fields accepted at registration.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub expertise: Vec<String>,
    pub is_verified_org: bool,
    pub organization_name: Option<String>,
}

/// A freshly opened session and its user.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
    pub expires_at: DateTime<Utc>,
}

/// Service for accounts and sessions.
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    session_ttl: Duration,
    hasher: Argon2<'static>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        session_ttl: Duration,
        cost: PasswordCost,
    ) -> Result<Self, CoreError> {
        let params = Params::new(cost.memory_kib, cost.iterations, Params::DEFAULT_P_COST, None)
            .map_err(|e| CoreError::Internal(format!("invalid password hashing parameters: {e}")))?;
        Ok(Self {
            users,
            sessions,
            session_ttl,
            hasher: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Register a user and open a session for them.
    ///
    /// Fails with `Conflict("user_exists")` when the username is taken.
    pub async fn register(&self, registration: Registration) -> Result<AuthSession, CoreError> {
        let username = require_text("username", &registration.username)?;
        if registration.password.is_empty() {
            return Err(CoreError::Validation("password is required".to_string()));
        }

        let password_hash = self.hash_password(registration.password).await?;
        let new_user = NewUser {
            username,
            password_hash,
            name: optional_text(registration.name),
            email: optional_text(registration.email),
            expertise: registration
                .expertise
                .into_iter()
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty())
                .collect(),
            is_verified_org: registration.is_verified_org,
            organization_name: optional_text(registration.organization_name),
        };

        let user = self.users.insert(&new_user).await.map_err(|e| match e {
            RepositoryError::AlreadyExists(_) => CoreError::Conflict("user_exists".to_string()),
            other => CoreError::Repository(other),
        })?;

        tracing::info!(user_id = user.id, username = %user.username, "Registered user");
        self.open_session(user).await
    }

    /// Check credentials and open a session.
    ///
    /// Unknown users fail with `NotFound("invalid_user")`, wrong passwords with
    /// `Unauthorized("invalid_password")`.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthSession, CoreError> {
        let credentials = self
            .users
            .get_credentials(username.trim())
            .await
            .map_err(CoreError::not_found_as("invalid_user"))?;

        if !verify_password(password.to_string(), credentials.password_hash).await? {
            tracing::warn!(username = %credentials.user.username, "Rejected login: wrong password");
            return Err(CoreError::Unauthorized("invalid_password".to_string()));
        }

        self.open_session(credentials.user).await
    }

    /// Resolve a bearer token to its user.
    pub async fn authenticate(&self, token: &str) -> Result<User, CoreError> {
        let unauthorized = || CoreError::Unauthorized("Invalid or expired token".to_string());

        let session = self.sessions.find(token).await?.ok_or_else(unauthorized)?;
        if session.is_expired(Utc::now()) {
            self.sessions.delete(token).await?;
            return Err(unauthorized());
        }

        self.users
            .get_by_id(session.user_id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound(_) => unauthorized(),
                other => CoreError::Repository(other),
            })
    }

    pub async fn logout(&self, token: &str) -> Result<(), CoreError> {
        self.sessions.delete(token).await.map_err(CoreError::from)
    }

    /// Public profile of a user.
    pub async fn profile(&self, username: &str) -> Result<User, CoreError> {
        self.users
            .get_by_username(username.trim())
            .await
            .map_err(CoreError::not_found_as("user_not_found"))
    }

    /// Drop expired sessions. Returns how many were removed.
    pub async fn purge_expired_sessions(&self) -> Result<u64, CoreError> {
        self.sessions
            .purge_expired(Utc::now())
            .await
            .map_err(CoreError::from)
    }

    async fn open_session(&self, user: User) -> Result<AuthSession, CoreError> {
        let now = Utc::now();
        let session = Session {
            token: uuid::Uuid::new_v4().to_string(),
            user_id: user.id,
            created_at: now,
            expires_at: now + self.session_ttl,
        };
        self.sessions.create(&session).await?;

        Ok(AuthSession {
            token: session.token,
            user,
            expires_at: session.expires_at,
        })
    }

    /// Runs on the blocking pool.
    async fn hash_password(&self, password: String) -> Result<String, CoreError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            hasher
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| CoreError::Internal(format!("password hashing failed: {e}")))
        })
        .await
        .map_err(|e| CoreError::Internal(format!("password hashing task failed: {e}")))?
    }
}

async fn verify_password(password: String, stored_hash: String) -> Result<bool, CoreError> {
    tokio::task::spawn_blocking(move || {
        PasswordHash::new(&stored_hash).is_ok_and(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
    })
    .await
    .map_err(|e| CoreError::Internal(format!("password check task failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::UserCredentials;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockUserRepo {
        users: Mutex<Vec<(User, String)>>,
    }

    #[async_trait]
    impl UserRepository for MockUserRepo {
        async fn insert(&self, user: &NewUser) -> Result<User, RepositoryError> {
            let mut users = self.users.lock().unwrap();
            if users.iter().any(|(u, _)| u.username == user.username) {
                return Err(RepositoryError::AlreadyExists(user.username.clone()));
            }
            let stored = User {
                id: i64::try_from(users.len()).unwrap() + 1,
                username: user.username.clone(),
                name: user.name.clone(),
                email: user.email.clone(),
                expertise: user.expertise.clone(),
                earnings_cents: 0,
                total_approved_submissions: 0,
                is_verified_org: user.is_verified_org,
                organization_name: user.organization_name.clone(),
                created_at: Utc::now(),
            };
            users.push((stored.clone(), user.password_hash.clone()));
            Ok(stored)
        }
        async fn get_by_id(&self, id: i64) -> Result<User, RepositoryError> {
            let users = self.users.lock().unwrap();
            users
                .iter()
                .find(|(u, _)| u.id == id)
                .map(|(u, _)| u.clone())
                .ok_or_else(|| RepositoryError::NotFound(format!("id={id}")))
        }
        async fn get_by_username(&self, username: &str) -> Result<User, RepositoryError> {
            self.get_credentials(username).await.map(|c| c.user)
        }
        async fn get_credentials(
            &self,
            username: &str,
        ) -> Result<UserCredentials, RepositoryError> {
            let users = self.users.lock().unwrap();
            users
                .iter()
                .find(|(u, _)| u.username == username)
                .map(|(u, h)| UserCredentials {
                    user: u.clone(),
                    password_hash: h.clone(),
                })
                .ok_or_else(|| RepositoryError::NotFound(username.to_string()))
        }
        async fn list_by_ids(&self, _ids: &[i64]) -> Result<Vec<User>, RepositoryError> {
            Ok(vec![])
        }
        async fn debit_earnings(&self, _: i64, _: i64) -> Result<bool, RepositoryError> {
            Ok(false)
        }
        async fn refund_earnings(&self, _: i64, _: i64) -> Result<(), RepositoryError> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockSessionRepo {
        sessions: Mutex<HashMap<String, Session>>,
    }

    #[async_trait]
    impl SessionRepository for MockSessionRepo {
        async fn create(&self, session: &Session) -> Result<(), RepositoryError> {
            self.sessions
                .lock()
                .unwrap()
                .insert(session.token.clone(), session.clone());
            Ok(())
        }
        async fn find(&self, token: &str) -> Result<Option<Session>, RepositoryError> {
            Ok(self.sessions.lock().unwrap().get(token).cloned())
        }
        async fn delete(&self, token: &str) -> Result<(), RepositoryError> {
            self.sessions.lock().unwrap().remove(token);
            Ok(())
        }
        async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
            let mut sessions = self.sessions.lock().unwrap();
            let before = sessions.len();
            sessions.retain(|_, s| !s.is_expired(now));
            Ok((before - sessions.len()) as u64)
        }
    }

    fn service_with_ttl(ttl: Duration) -> AccountService {
        AccountService::new(
            Arc::new(MockUserRepo::default()),
            Arc::new(MockSessionRepo::default()),
            ttl,
            PasswordCost::minimal(),
        )
        .unwrap()
    }

    fn service() -> AccountService {
        service_with_ttl(Duration::days(DEFAULT_SESSION_TTL_DAYS))
    }

    fn registration(username: &str, password: &str) -> Registration {
        Registration {
            username: username.to_string(),
            password: password.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_register_then_authenticate() {
        let service = service();
        let session = service.register(registration("ivy", "pw")).await.unwrap();
        let user = service.authenticate(&session.token).await.unwrap();
        assert_eq!(user.username, "ivy");
    }

    #[tokio::test]
    async fn test_duplicate_username_is_user_exists() {
        let service = service();
        service.register(registration("ivy", "pw")).await.unwrap();
        let err = service.register(registration("ivy", "other")).await.unwrap_err();
        assert!(matches!(err, CoreError::Conflict(ref m) if m == "user_exists"));
    }

    #[tokio::test]
    async fn test_register_requires_fields() {
        let service = service();
        assert!(matches!(
            service.register(registration(" ", "pw")).await,
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            service.register(registration("ivy", "")).await,
            Err(CoreError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_login_errors() {
        let service = service();
        service.register(registration("ivy", "pw")).await.unwrap();

        let err = service.login("ivy", "wrong").await.unwrap_err();
        assert!(matches!(err, CoreError::Unauthorized(ref m) if m == "invalid_password"));

        let err = service.login("nobody", "pw").await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound(ref m) if m == "invalid_user"));

        let ok = service.login("ivy", "pw").await.unwrap();
        assert_eq!(ok.user.username, "ivy");
    }

    #[tokio::test]
    async fn test_hashes_use_fresh_salts() {
        let users = Arc::new(MockUserRepo::default());
        let service = AccountService::new(
            users.clone(),
            Arc::new(MockSessionRepo::default()),
            Duration::days(1),
            PasswordCost::minimal(),
        )
        .unwrap();

        let (ivy, fern) = tokio::join!(
            service.register(registration("ivy", "same")),
            service.register(registration("fern", "same")),
        );
        ivy.unwrap();
        fern.unwrap();

        let hashes: Vec<String> = users
            .users
            .lock()
            .unwrap()
            .iter()
            .map(|(_, hash)| hash.clone())
            .collect();
        assert_eq!(hashes.len(), 2);
        assert!(hashes.iter().all(|h| h.starts_with("$argon2id$")));
        assert_ne!(hashes[0], hashes[1]);

        assert!(verify_password("same".to_string(), hashes[0].clone()).await.unwrap());
        assert!(!verify_password("other".to_string(), hashes[0].clone()).await.unwrap());
        assert!(!verify_password("same".to_string(), "not a hash".to_string()).await.unwrap());
    }

    #[tokio::test]
    async fn test_logout_revokes_token() {
        let service = service();
        let session = service.register(registration("ivy", "pw")).await.unwrap();
        service.logout(&session.token).await.unwrap();
        assert!(matches!(
            service.authenticate(&session.token).await,
            Err(CoreError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_expired_session_is_rejected() {
        let service = service_with_ttl(Duration::seconds(-1));
        let session = service.register(registration("ivy", "pw")).await.unwrap();
        assert!(matches!(
            service.authenticate(&session.token).await,
            Err(CoreError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn test_password_hash_verifies() {
        let service = service();
        let hash = service.hash_password("s3cret".to_string()).await.unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("s3cret".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password("nope".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password("s3cret".to_string(), "not a hash".to_string()).await.unwrap());
    }
}
