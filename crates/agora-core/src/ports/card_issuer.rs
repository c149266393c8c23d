//! Card issuing port.

use async_trait::async_trait;

use super::ProviderError;

/// Data used to create a cardholder at the issuer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardholderRequest {
    /// Our own user id, used as the issuer-side token so retries are idempotent.
    pub user_id: i64,
    pub first_name: String,
    pub email: Option<String>,
}

/// A card returned by the issuer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCard {
    pub token: String,
    pub last_four: String,
    pub state: String,
}

/// Port for the card issuer. The implementation lives in `agora-clients` (Marqeta).
#[async_trait]
pub trait CardIssuerPort: Send + Sync {
    /// Create a cardholder and return the issuer's user token.
    async fn create_cardholder(&self, request: &CardholderRequest) -> Result<String, ProviderError>;

    /// Issue a card from the configured card product.
    async fn issue_card(&self, cardholder_token: &str) -> Result<IssuedCard, ProviderError>;
}
