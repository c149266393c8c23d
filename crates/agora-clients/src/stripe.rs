//! Stripe payment intents.

use async_trait::async_trait;
use serde::Deserialize;

use agora_core::ports::{PaymentIntent, PaymentIntentRequest, PaymentsPort, ProviderError};

use crate::config::StripeConfig;
use crate::error::{ClientError, ClientResult};
use crate::http::{HttpClient, Retry, join_url};

#[derive(Debug, Deserialize)]
struct PaymentIntentResponse {
    id: String,
    client_secret: Option<String>,
}

/// Form fields for `POST /v1/payment_intents`.
fn intent_form(request: &PaymentIntentRequest) -> Vec<(String, String)> {
    let mut form = vec![
        ("amount".to_string(), request.amount_cents.to_string()),
        ("currency".to_string(), request.currency.to_lowercase()),
        (
            "automatic_payment_methods[enabled]".to_string(),
            "true".to_string(),
        ),
    ];
    form.extend(
        request
            .metadata
            .iter()
            .map(|(k, v)| (format!("metadata[{k}]"), v.clone())),
    );
    form
}

fn to_intent(response: PaymentIntentResponse) -> ClientResult<PaymentIntent> {
    let client_secret = response
        .client_secret
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ClientError::invalid("payment intent has no client_secret"))?;
    Ok(PaymentIntent {
        id: response.id,
        client_secret,
    })
}

pub struct StripeClient {
    http: HttpClient,
    endpoint: String,
    secret_key: String,
}

impl StripeClient {
    pub fn new(http: HttpClient, config: &StripeConfig) -> Self {
        Self {
            http,
            endpoint: join_url(&config.base_url, "v1/payment_intents"),
            secret_key: config.secret_key.clone(),
        }
    }
}

#[async_trait]
impl PaymentsPort for StripeClient {
    async fn create_payment_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntent, ProviderError> {
        let form = intent_form(request);
        // Same key on every retry so Stripe creates the intent at most once.
        let idempotency_key = uuid::Uuid::new_v4().to_string();

        let response: PaymentIntentResponse = self
            .http
            .send_json(Retry::Transient, |client| {
                Ok(client
                    .post(&self.endpoint)
                    .bearer_auth(&self.secret_key)
                    .header("Idempotency-Key", &idempotency_key)
                    .form(&form))
            })
            .await?;

        tracing::info!(
            intent_id = %response.id,
            amount_cents = request.amount_cents,
            "Created payment intent"
        );
        Ok(to_intent(response)?)
    }
}
