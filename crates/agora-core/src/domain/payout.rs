//! Withdrawals of earned rewards and issued payment cards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Stripe,
    Paypal,
    Bank,
}

impl PaymentMethod {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Stripe => "stripe",
            Self::Paypal => "paypal",
            Self::Bank => "bank",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stripe" => Some(Self::Stripe),
            "paypal" => Some(Self::Paypal),
            "bank" => Some(Self::Bank),
            _ => None,
        }
    }

    /// Manual methods need payout details (an address or account number).
    #[must_use]
    pub const fn requires_details(&self) -> bool {
        matches!(self, Self::Paypal | Self::Bank)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalStatus {
    Pending,
    Processing,
    Completed,
}

impl WithdrawalStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawal {
    pub id: i64,
    pub user_id: i64,
    pub amount_cents: i64,
    pub payment_method: PaymentMethod,
    pub payment_details: Option<String>,
    pub status: WithdrawalStatus,
    /// Provider id, e.g. the Stripe PaymentIntent id.
    pub provider_reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewWithdrawal {
    pub user_id: i64,
    pub amount_cents: i64,
    pub payment_method: PaymentMethod,
    pub payment_details: Option<String>,
    pub status: WithdrawalStatus,
    pub provider_reference: Option<String>,
}

/// A card issued through the card issuing provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: i64,
    pub user_id: i64,
    pub provider_user_token: String,
    pub card_token: String,
    pub last_four: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCard {
    pub user_id: i64,
    pub provider_user_token: String,
    pub card_token: String,
    pub last_four: String,
    pub state: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_methods_need_details() {
        assert!(PaymentMethod::Paypal.requires_details());
        assert!(PaymentMethod::Bank.requires_details());
        assert!(!PaymentMethod::Stripe.requires_details());
    }

    #[test]
    fn test_method_parse() {
        assert_eq!(PaymentMethod::parse("PayPal"), Some(PaymentMethod::Paypal));
        assert_eq!(PaymentMethod::parse("venmo"), None);
    }
}
