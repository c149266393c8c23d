//! HTTP clients for the third-party providers Agora talks to.
//!
//! Each client implements one provider port from `agora-core`:
//!
//! - [`PlantNetClient`] - [`PlantIdentifierPort`](agora_core::ports::PlantIdentifierPort)
//! - [`StripeClient`] - [`PaymentsPort`](agora_core::ports::PaymentsPort)
//! - [`MarqetaClient`] - [`CardIssuerPort`](agora_core::ports::CardIssuerPort)
//! - [`OpenAiClient`] - [`AssistantPort`](agora_core::ports::AssistantPort)
//!
//! Use [`build_providers`] to wire whichever are configured.

#![deny(unsafe_code)]

mod config;
mod error;
mod http;
mod marqeta;
mod openai;
mod plantnet;
mod stripe;

use std::sync::Arc;

use agora_core::Providers;

pub use config::{
    HttpSettings, MarqetaConfig, OpenAiConfig, PlantNetConfig, ProviderSettings, StripeConfig,
};
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
pub use marqeta::MarqetaClient;
pub use openai::OpenAiClient;
pub use plantnet::PlantNetClient;
pub use stripe::StripeClient;

/// Build the provider ports. Providers without settings stay unconfigured.
pub fn build_providers(settings: &ProviderSettings) -> ClientResult<Providers> {
    let mut providers = Providers::unconfigured();

    if let Some(config) = &settings.plantnet {
        providers.identifier = Arc::new(PlantNetClient::new(
            HttpClient::new(&settings.http)?,
            config,
        )?);
    }
    if let Some(config) = &settings.stripe {
        providers.payments = Arc::new(StripeClient::new(HttpClient::new(&settings.http)?, config));
    }
    if let Some(config) = &settings.marqeta {
        providers.cards = Arc::new(MarqetaClient::new(HttpClient::new(&settings.http)?, config));
    }
    if let Some(config) = &settings.openai {
        providers.assistant = Arc::new(OpenAiClient::new(HttpClient::new(&settings.http)?, config));
    }

    tracing::info!(configured = ?settings.configured(), "Provider clients ready");
    Ok(providers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_core::ProviderError;
    use agora_core::ports::ChatPrompt;

    #[tokio::test]
    async fn test_unset_providers_stay_unconfigured() {
        let providers = build_providers(&ProviderSettings::default()).unwrap();
        let err = providers
            .assistant
            .ask(&ChatPrompt {
                system_message: None,
                prompt: "hello".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }

    #[test]
    fn test_configured_providers_build() {
        let settings = ProviderSettings {
            plantnet: Some(PlantNetConfig::new("key")),
            stripe: Some(StripeConfig::new("sk_test")),
            openai: Some(OpenAiConfig::new("sk")),
            ..ProviderSettings::default()
        };
        assert!(build_providers(&settings).is_ok());
    }
}
