//! Cash-out, withdrawal and card DTOs. Amounts are dollars on the wire.

use agora_core::services::CashoutIntent;
use agora_core::{Card, PaymentMethod, Withdrawal, cents_to_dollars};
use serde::{Deserialize, Serialize};

use super::{SUCCESS, amount_to_cents};
use crate::error::HttpError;

#[derive(Debug, Serialize)]
pub struct WithdrawalDto {
    #[serde(flatten)]
    pub withdrawal: Withdrawal,
    pub amount: f64,
}

impl From<Withdrawal> for WithdrawalDto {
    fn from(withdrawal: Withdrawal) -> Self {
        Self {
            amount: cents_to_dollars(withdrawal.amount_cents),
            withdrawal,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CashoutRequest {
    pub amount: f64,
}

impl CashoutRequest {
    pub fn amount_cents(&self) -> Result<i64, HttpError> {
        amount_to_cents("amount", self.amount)
    }
}

#[derive(Debug, Serialize)]
pub struct CashoutResponse {
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
    pub withdrawal: WithdrawalDto,
}

impl From<CashoutIntent> for CashoutResponse {
    fn from(intent: CashoutIntent) -> Self {
        Self {
            client_secret: intent.client_secret,
            withdrawal: intent.withdrawal.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct WithdrawalRequest {
    pub amount: f64,
    pub payment_method: String,
    pub payment_details: Option<String>,
}

impl WithdrawalRequest {
    pub fn amount_cents(&self) -> Result<i64, HttpError> {
        amount_to_cents("amount", self.amount)
    }

    pub fn method(&self) -> Result<PaymentMethod, HttpError> {
        PaymentMethod::parse(&self.payment_method).ok_or_else(|| {
            HttpError::BadRequest(format!("invalid payment_method: {}", self.payment_method))
        })
    }
}

#[derive(Debug, Serialize)]
pub struct WithdrawalResponse {
    pub message: &'static str,
    pub withdrawal: WithdrawalDto,
}

impl From<Withdrawal> for WithdrawalResponse {
    fn from(withdrawal: Withdrawal) -> Self {
        Self {
            message: SUCCESS,
            withdrawal: withdrawal.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WithdrawalHistoryResponse {
    pub history: Vec<WithdrawalDto>,
}

#[derive(Debug, Serialize)]
pub struct CardResponse {
    pub message: &'static str,
    pub card: Card,
}

impl From<Card> for CardResponse {
    fn from(card: Card) -> Self {
        Self {
            message: SUCCESS,
            card,
        }
    }
}
