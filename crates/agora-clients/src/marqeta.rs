//! Marqeta card issuing.
//!
//! Cardholders are created with a token derived from our user id, so a
//! repeated create after a lost response resolves to the same cardholder.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use agora_core::ports::{CardIssuerPort, CardholderRequest, IssuedCard, ProviderError};

use crate::config::MarqetaConfig;
use crate::error::{ClientError, ClientResult};
use crate::http::{HttpClient, Retry, join_url};

#[derive(Debug, Serialize)]
struct CreateUser<'a> {
    token: String,
    first_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    active: bool,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    token: String,
}

#[derive(Debug, Serialize)]
struct CreateCard<'a> {
    user_token: &'a str,
    card_product_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct CardResponse {
    token: String,
    last_four: String,
    state: String,
}

pub(crate) fn cardholder_token(user_id: i64) -> String {
    format!("agora-user-{user_id}")
}

pub struct MarqetaClient {
    http: HttpClient,
    base_url: String,
    app_token: String,
    admin_token: String,
    card_product_token: String,
}

impl MarqetaClient {
    pub fn new(http: HttpClient, config: &MarqetaConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.clone(),
            app_token: config.app_token.clone(),
            admin_token: config.admin_token.clone(),
            card_product_token: config.card_product_token.clone(),
        }
    }

    async fn post<B, T>(&self, path: &str, body: &B, retry: Retry) -> ClientResult<T>
    where
        B: Serialize + Sync,
        T: serde::de::DeserializeOwned,
    {
        let url = join_url(&self.base_url, path);
        self.http
            .send_json(retry, |client| {
                Ok(client
                    .post(&url)
                    .basic_auth(&self.app_token, Some(&self.admin_token))
                    .json(body))
            })
            .await
    }
}

#[async_trait]
impl CardIssuerPort for MarqetaClient {
    async fn create_cardholder(
        &self,
        request: &CardholderRequest,
    ) -> Result<String, ProviderError> {
        let token = cardholder_token(request.user_id);
        let body = CreateUser {
            token: token.clone(),
            first_name: &request.first_name,
            email: request.email.as_deref(),
            active: true,
        };

        match self.post::<_, UserResponse>("users", &body, Retry::Transient).await {
            Ok(user) => Ok(user.token),
            Err(err) if err.status() == Some(409) => {
                tracing::debug!(%token, "Marqeta cardholder already exists");
                Ok(token)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn issue_card(&self, cardholder_token: &str) -> Result<IssuedCard, ProviderError> {
        let body = CreateCard {
            user_token: cardholder_token,
            card_product_token: &self.card_product_token,
        };
        let card: CardResponse = self.post("cards", &body, Retry::Never).await?;

        if card.last_four.len() != 4 {
            return Err(ClientError::invalid(format!(
                "unexpected last_four '{}'",
                card.last_four
            ))
            .into());
        }
        Ok(IssuedCard {
            token: card.token,
            last_four: card.last_four,
            state: card.state,
        })
    }
}
