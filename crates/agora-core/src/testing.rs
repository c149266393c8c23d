//! In-memory provider fakes for tests.
//!
//! Enabled with the `test-utils` feature so adapter crates can drive the core
//! without network access.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::{Organ, PlantIdentification};
use crate::ports::{
    AssistantPort, CardIssuerPort, CardholderRequest, ChatPrompt, IssuedCard, PaymentIntent,
    PaymentIntentRequest, PaymentsPort, PlantIdentifierPort, ProviderError, Providers,
};

/// Identifier returning a fixed answer, or failing when none is set.
#[derive(Default)]
pub struct FakeIdentifier {
    answer: Mutex<Option<PlantIdentification>>,
    calls: AtomicUsize,
}

impl FakeIdentifier {
    pub fn answering(identification: PlantIdentification) -> Self {
        Self {
            answer: Mutex::new(Some(identification)),
            calls: AtomicUsize::new(0),
        }
    }

    /// Replace the answer. `None` makes every call fail.
    pub fn set_answer(&self, identification: Option<PlantIdentification>) {
        if let Ok(mut answer) = self.answer.lock() {
            *answer = identification;
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PlantIdentifierPort for FakeIdentifier {
    async fn identify(
        &self,
        _image: &[u8],
        _organ: Organ,
    ) -> Result<PlantIdentification, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer
            .lock()
            .ok()
            .and_then(|a| a.clone())
            .ok_or_else(|| ProviderError::Network("identifier offline".to_string()))
    }
}

/// Payments fake handing out sequential intents.
#[derive(Default)]
pub struct FakePayments {
    fail: std::sync::atomic::AtomicBool,
    requests: Mutex<Vec<PaymentIntentRequest>>,
}

impl FakePayments {
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn requests(&self) -> Vec<PaymentIntentRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PaymentsPort for FakePayments {
    async fn create_payment_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntent, ProviderError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ProviderError::Rejected {
                status: 402,
                message: "card_declined".to_string(),
            });
        }
        let n = self.requests.lock().map_or(0, |mut r| {
            r.push(request.clone());
            r.len()
        });
        Ok(PaymentIntent {
            id: format!("pi_test_{n}"),
            client_secret: format!("pi_test_{n}_secret"),
        })
    }
}

/// Card issuer fake. Counts cardholders created.
#[derive(Default)]
pub struct FakeCardIssuer {
    cardholders: AtomicUsize,
    cards: AtomicUsize,
}

impl FakeCardIssuer {
    pub fn cardholders_created(&self) -> usize {
        self.cardholders.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CardIssuerPort for FakeCardIssuer {
    async fn create_cardholder(
        &self,
        request: &CardholderRequest,
    ) -> Result<String, ProviderError> {
        self.cardholders.fetch_add(1, Ordering::SeqCst);
        Ok(format!("agora-user-{}", request.user_id))
    }

    async fn issue_card(&self, cardholder_token: &str) -> Result<IssuedCard, ProviderError> {
        let n = self.cards.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(IssuedCard {
            token: format!("{cardholder_token}-card-{n}"),
            last_four: format!("{:04}", 4242 + n),
            state: "ACTIVE".to_string(),
        })
    }
}

/// Assistant fake that echoes the prompt.
#[derive(Default)]
pub struct FakeAssistant;

#[async_trait]
impl AssistantPort for FakeAssistant {
    async fn ask(&self, prompt: &ChatPrompt) -> Result<String, ProviderError> {
        Ok(format!("You asked: {}", prompt.prompt))
    }
}

/// Handles to the fakes wired into a [`Providers`] set.
#[derive(Clone)]
pub struct FakeProviders {
    pub identifier: Arc<FakeIdentifier>,
    pub payments: Arc<FakePayments>,
    pub cards: Arc<FakeCardIssuer>,
    pub assistant: Arc<FakeAssistant>,
}

impl FakeProviders {
    /// Fakes whose identifier always answers `identification`.
    pub fn new(identification: PlantIdentification) -> Self {
        Self {
            identifier: Arc::new(FakeIdentifier::answering(identification)),
            payments: Arc::new(FakePayments::default()),
            cards: Arc::new(FakeCardIssuer::default()),
            assistant: Arc::new(FakeAssistant),
        }
    }

    pub fn providers(&self) -> Providers {
        Providers {
            identifier: self.identifier.clone(),
            payments: self.payments.clone(),
            cards: self.cards.clone(),
            assistant: self.assistant.clone(),
        }
    }
}
