//! Payments port (cash-out through a payment intent).

use async_trait::async_trait;

use super::ProviderError;

/// Request for a payment intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntentRequest {
    pub amount_cents: i64,
    /// ISO currency code, lowercase.
    pub currency: String,
    /// Key/value pairs attached to the intent for reconciliation.
    pub metadata: Vec<(String, String)>,
}

/// A created payment intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
}

/// Port for the payment provider. The implementation lives in `agora-clients` (Stripe).
#[async_trait]
pub trait PaymentsPort: Send + Sync {
    async fn create_payment_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntent, ProviderError>;
}
