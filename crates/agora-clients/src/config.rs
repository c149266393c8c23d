//! Provider configuration.
//!
//! Each provider is configured independently. A provider whose credentials
//! are missing stays `None` and is wired as unconfigured by
//! [`build_providers`](crate::build_providers).

use std::time::Duration;

pub const PLANTNET_API_KEY_ENV: &str = "PLANTNET_API_KEY";
pub const PLANTNET_PROJECT_ENV: &str = "PLANTNET_PROJECT";
pub const STRIPE_API_KEY_ENV: &str = "STRIPE_API_KEY";
pub const MARQETA_BASE_URL_ENV: &str = "MARQETA_BASE_URL";
pub const MARQETA_APP_TOKEN_ENV: &str = "MARQETA_APP_TOKEN";
pub const MARQETA_ADMIN_TOKEN_ENV: &str = "MARQETA_ADMIN_TOKEN";
pub const MARQETA_CARD_PRODUCT_TOKEN_ENV: &str = "MARQETA_CARD_PRODUCT_TOKEN";
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const OPENAI_BASE_URL_ENV: &str = "OPENAI_BASE_URL";
pub const OPENAI_MODEL_ENV: &str = "OPENAI_MODEL";

pub const DEFAULT_PLANTNET_BASE_URL: &str = "https://my-api.plantnet.org";
pub const DEFAULT_PLANTNET_PROJECT: &str = "all";
pub const DEFAULT_STRIPE_BASE_URL: &str = "https://api.stripe.com";
pub const DEFAULT_MARQETA_BASE_URL: &str = "https://sandbox-api.marqeta.com/v3";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Transport settings shared by every client.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub user_agent: String,
    pub timeout: Duration,
    /// Retries for transient failures (network errors and 5xx).
    pub max_retries: u8,
    /// Base delay for exponential backoff.
    pub retry_base_delay: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: concat!("agora/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 2,
            retry_base_delay: Duration::from_millis(500),
        }
    }
}

impl HttpSettings {
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }

    #[must_use]
    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }
}

#[derive(Clone)]
pub struct PlantNetConfig {
    pub api_key: String,
    /// Flora project, `all` searches every flora.
    pub project: String,
    pub base_url: String,
}

impl PlantNetConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            project: DEFAULT_PLANTNET_PROJECT.to_string(),
            base_url: DEFAULT_PLANTNET_BASE_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = project.into();
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    pub base_url: String,
}

impl StripeConfig {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            base_url: DEFAULT_STRIPE_BASE_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[derive(Clone)]
pub struct MarqetaConfig {
    pub base_url: String,
    pub app_token: String,
    pub admin_token: String,
    pub card_product_token: String,
}

#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
        }
    }
}

/// Settings for all providers.
#[derive(Clone, Default)]
pub struct ProviderSettings {
    pub http: HttpSettings,
    pub plantnet: Option<PlantNetConfig>,
    pub stripe: Option<StripeConfig>,
    pub marqeta: Option<MarqetaConfig>,
    pub openai: Option<OpenAiConfig>,
}

impl ProviderSettings {
    /// Read provider settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read provider settings through `lookup`. Blank values count as absent.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let plantnet = get(PLANTNET_API_KEY_ENV).map(|key| {
            let config = PlantNetConfig::new(key);
            match get(PLANTNET_PROJECT_ENV) {
                Some(project) => config.with_project(project),
                None => config,
            }
        });

        let stripe = get(STRIPE_API_KEY_ENV).map(StripeConfig::new);

        let marqeta = match (
            get(MARQETA_APP_TOKEN_ENV),
            get(MARQETA_ADMIN_TOKEN_ENV),
            get(MARQETA_CARD_PRODUCT_TOKEN_ENV),
        ) {
            (Some(app_token), Some(admin_token), Some(card_product_token)) => Some(MarqetaConfig {
                base_url: get(MARQETA_BASE_URL_ENV)
                    .unwrap_or_else(|| DEFAULT_MARQETA_BASE_URL.to_string()),
                app_token,
                admin_token,
                card_product_token,
            }),
            _ => None,
        };

        let openai = get(OPENAI_API_KEY_ENV).map(|key| OpenAiConfig {
            base_url: get(OPENAI_BASE_URL_ENV)
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            model: get(OPENAI_MODEL_ENV).unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            ..OpenAiConfig::new(key)
        });

        Self {
            http: HttpSettings::default(),
            plantnet,
            stripe,
            marqeta,
            openai,
        }
    }

    /// Names of the configured providers, for startup logging.
    pub fn configured(&self) -> Vec<&'static str> {
        [
            ("plantnet", self.plantnet.is_some()),
            ("stripe", self.stripe.is_some()),
            ("marqeta", self.marqeta.is_some()),
            ("openai", self.openai.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, on)| on.then_some(name))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> ProviderSettings {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ProviderSettings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_nothing_configured() {
        let s = settings(&[]);
        assert!(s.configured().is_empty());
    }

    #[test]
    fn test_plantnet_defaults_to_all_project() {
        let s = settings(&[(PLANTNET_API_KEY_ENV, "key")]);
        let plantnet = s.plantnet.unwrap();
        assert_eq!(plantnet.project, "all");
        assert_eq!(plantnet.base_url, DEFAULT_PLANTNET_BASE_URL);

        let s = settings(&[(PLANTNET_API_KEY_ENV, "key"), (PLANTNET_PROJECT_ENV, "weurope")]);
        assert_eq!(s.plantnet.unwrap().project, "weurope");
    }

    #[test]
    fn test_blank_values_are_absent() {
        let s = settings(&[(STRIPE_API_KEY_ENV, "   "), (OPENAI_API_KEY_ENV, "")]);
        assert!(s.stripe.is_none());
        assert!(s.openai.is_none());
    }

    #[test]
    fn test_marqeta_needs_all_tokens() {
        let partial = settings(&[(MARQETA_APP_TOKEN_ENV, "app"), (MARQETA_ADMIN_TOKEN_ENV, "adm")]);
        assert!(partial.marqeta.is_none());

        let full = settings(&[
            (MARQETA_APP_TOKEN_ENV, "app"),
            (MARQETA_ADMIN_TOKEN_ENV, "adm"),
            (MARQETA_CARD_PRODUCT_TOKEN_ENV, "prod"),
        ]);
        let marqeta = full.marqeta.unwrap();
        assert_eq!(marqeta.base_url, DEFAULT_MARQETA_BASE_URL);
        assert_eq!(marqeta.card_product_token, "prod");
    }

    #[test]
    fn test_openai_overrides() {
        let s = settings(&[
            (OPENAI_API_KEY_ENV, "sk"),
            (OPENAI_BASE_URL_ENV, "http://localhost:11434/v1"),
            (OPENAI_MODEL_ENV, "llama3"),
        ]);
        let openai = s.openai.as_ref().unwrap();
        assert_eq!(openai.base_url, "http://localhost:11434/v1");
        assert_eq!(openai.model, "llama3");
        assert_eq!(s.configured(), vec!["openai"]);
    }
}
