//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `sqlx` or `reqwest` types in any signature
//! - Repository traits are minimal and CRUD-focused
//! - Read-modify-write steps that must be atomic are single port methods
//!   returning whether the guarded change applied
//! - Provider ports speak domain DTOs, never third-party wire shapes

pub mod assistant;
pub mod bounty_repository;
pub mod card_issuer;
pub mod event_repository;
pub mod payments;
pub mod payout_repository;
pub mod picture_repository;
pub mod plant_identifier;
pub mod project_repository;
pub mod ride_repository;
pub mod session_repository;
pub mod submission_repository;
pub mod user_repository;

use std::sync::Arc;
use thiserror::Error;

pub use assistant::{AssistantPort, ChatPrompt};
pub use bounty_repository::BountyRepository;
pub use card_issuer::{CardIssuerPort, CardholderRequest, IssuedCard};
pub use event_repository::EventRepository;
pub use payments::{PaymentIntent, PaymentIntentRequest, PaymentsPort};
pub use payout_repository::PayoutRepository;
pub use picture_repository::PictureRepository;
pub use plant_identifier::PlantIdentifierPort;
pub use project_repository::ProjectRepository;
pub use ride_repository::RideRepository;
pub use session_repository::SessionRepository;
pub use submission_repository::SubmissionRepository;
pub use user_repository::{UserCredentials, UserRepository};

/// Container for all repository trait objects.
///
/// This struct provides a consistent way to wire repositories across adapters
/// without coupling them to concrete implementations. It lives in `agora-core`
/// so that `AppCore` can accept it without depending on `agora-db`.
///
/// # Example
///
/// ```ignore
/// // In agora-db factory:
/// let repos = CoreFactory::build_repos(pool);
///
/// // In adapter bootstrap:
/// let core = AppCore::new(repos, providers);
/// ```
#[derive(Clone)]
pub struct Repos {
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub bounties: Arc<dyn BountyRepository>,
    pub submissions: Arc<dyn SubmissionRepository>,
    pub projects: Arc<dyn ProjectRepository>,
    pub pictures: Arc<dyn PictureRepository>,
    pub events: Arc<dyn EventRepository>,
    pub rides: Arc<dyn RideRepository>,
    pub payouts: Arc<dyn PayoutRepository>,
}

/// Container for the third-party provider ports.
///
/// A provider that is not configured is wired as [`UnconfiguredProvider`],
/// which fails every call with [`ProviderError::NotConfigured`].
#[derive(Clone)]
pub struct Providers {
    pub identifier: Arc<dyn PlantIdentifierPort>,
    pub payments: Arc<dyn PaymentsPort>,
    pub cards: Arc<dyn CardIssuerPort>,
    pub assistant: Arc<dyn AssistantPort>,
}

impl Providers {
    /// Providers where every port reports `NotConfigured`.
    pub fn unconfigured() -> Self {
        Self {
            identifier: Arc::new(UnconfiguredProvider::new("plant identification")),
            payments: Arc::new(UnconfiguredProvider::new("payments")),
            cards: Arc::new(UnconfiguredProvider::new("card issuing")),
            assistant: Arc::new(UnconfiguredProvider::new("assistant")),
        }
    }
}

/// Placeholder for a provider whose credentials are absent.
#[derive(Debug, Clone)]
pub struct UnconfiguredProvider {
    name: &'static str,
}

impl UnconfiguredProvider {
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    fn error(&self) -> ProviderError {
        ProviderError::NotConfigured(self.name.to_string())
    }
}

#[async_trait::async_trait]
impl PlantIdentifierPort for UnconfiguredProvider {
    async fn identify(
        &self,
        _image: &[u8],
        _organ: crate::domain::Organ,
    ) -> Result<crate::domain::PlantIdentification, ProviderError> {
        Err(self.error())
    }
}

#[async_trait::async_trait]
impl PaymentsPort for UnconfiguredProvider {
    async fn create_payment_intent(
        &self,
        _request: &PaymentIntentRequest,
    ) -> Result<PaymentIntent, ProviderError> {
        Err(self.error())
    }
}

#[async_trait::async_trait]
impl CardIssuerPort for UnconfiguredProvider {
    async fn create_cardholder(
        &self,
        _request: &CardholderRequest,
    ) -> Result<String, ProviderError> {
        Err(self.error())
    }

    async fn issue_card(&self, _cardholder_token: &str) -> Result<IssuedCard, ProviderError> {
        Err(self.error())
    }
}

#[async_trait::async_trait]
impl AssistantPort for UnconfiguredProvider {
    async fn ask(&self, _prompt: &ChatPrompt) -> Result<String, ProviderError> {
        Err(self.error())
    }
}

/// Domain-specific errors for repository operations.
///
/// This error type abstracts away storage implementation details (e.g., sqlx errors)
/// and provides a clean interface for services to handle storage failures.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The requested entity was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An entity with the same identifier already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Storage backend error (database, filesystem, etc.).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A constraint was violated (e.g., foreign key, unique constraint).
    #[error("Constraint violation: {0}")]
    Constraint(String),
}

/// Errors from third-party provider calls.
///
/// Clients map HTTP and decoding failures into these variants so services
/// never see transport types.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Credentials for the provider are not configured.
    #[error("{0} provider is not configured")]
    NotConfigured(String),

    /// The provider answered with an error status.
    #[error("Provider rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Network or timeout failure.
    #[error("Network error: {0}")]
    Network(String),

    /// The provider answered with a body we could not interpret.
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

/// Core error type for semantic domain errors.
///
/// This is the canonical error type used across the core domain.
/// Adapters map it to their own error types (HTTP status codes,
/// CLI exit codes).
///
/// `Unauthorized`, `Forbidden`, `Conflict` and `NotFound` carry the stable
/// message shown to clients (`user_exists`, `invalid_user`, ...).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Third-party provider call failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Validation error (invalid input).
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not allowed.
    #[error("{0}")]
    Forbidden(String),

    /// The request conflicts with current state.
    #[error("{0}")]
    Conflict(String),

    /// The requested entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Internal error (unexpected condition).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Map a repository `NotFound` to a domain `NotFound` with a client message.
    pub fn not_found_as(message: &'static str) -> impl FnOnce(RepositoryError) -> Self {
        move |err| match err {
            RepositoryError::NotFound(_) => Self::NotFound(message.to_string()),
            other => Self::Repository(other),
        }
    }
}
