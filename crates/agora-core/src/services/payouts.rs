//! Payout service - cash-outs, manual withdrawals and card issuance.

use std::sync::Arc;

use crate::domain::{
    Card, NewCard, NewWithdrawal, PaymentMethod, User, Withdrawal, WithdrawalStatus,
};
use crate::ports::{
    CardIssuerPort, CardholderRequest, CoreError, PaymentIntentRequest, PaymentsPort,
    PayoutRepository, UserRepository,
};
use crate::utils::validation::optional_text;

const CURRENCY: &str = "usd";

/// A started cash-out: the client confirms the intent with its secret.
#[derive(Debug, Clone)]
pub struct CashoutIntent {
    pub client_secret: String,
    pub withdrawal: Withdrawal,
}

pub struct PayoutService {
    users: Arc<dyn UserRepository>,
    payouts: Arc<dyn PayoutRepository>,
    payments: Arc<dyn PaymentsPort>,
    cards: Arc<dyn CardIssuerPort>,
}

impl PayoutService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        payouts: Arc<dyn PayoutRepository>,
        payments: Arc<dyn PaymentsPort>,
        cards: Arc<dyn CardIssuerPort>,
    ) -> Self {
        Self {
            users,
            payouts,
            payments,
            cards,
        }
    }

    /// Cash out through a payment intent.
    ///
    /// Earnings are debited before the provider call and refunded if it or the
    /// withdrawal record fails.
    pub async fn create_cashout_intent(
        &self,
        user: &User,
        amount_cents: i64,
    ) -> Result<CashoutIntent, CoreError> {
        self.debit(user, amount_cents).await?;

        let request = PaymentIntentRequest {
            amount_cents,
            currency: CURRENCY.to_string(),
            metadata: vec![
                ("user_id".to_string(), user.id.to_string()),
                ("username".to_string(), user.username.clone()),
            ],
        };
        let intent = match self.payments.create_payment_intent(&request).await {
            Ok(intent) => intent,
            Err(e) => {
                tracing::warn!(user_id = user.id, error = %e, "Payment intent failed; refunding");
                self.users.refund_earnings(user.id, amount_cents).await?;
                return Err(e.into());
            }
        };

        let withdrawal = self
            .record_debited(&NewWithdrawal {
                user_id: user.id,
                amount_cents,
                payment_method: PaymentMethod::Stripe,
                payment_details: None,
                status: WithdrawalStatus::Processing,
                provider_reference: Some(intent.id.clone()),
            })
            .await?;

        tracing::info!(
            user_id = user.id,
            withdrawal_id = withdrawal.id,
            amount_cents,
            "Created cash-out intent"
        );
        Ok(CashoutIntent {
            client_secret: intent.client_secret,
            withdrawal,
        })
    }

    /// Record a manual withdrawal for later payout.
    pub async fn process_withdrawal(
        &self,
        user: &User,
        amount_cents: i64,
        method: PaymentMethod,
        details: Option<String>,
    ) -> Result<Withdrawal, CoreError> {
        let details = optional_text(details);
        if method.requires_details() && details.is_none() {
            return Err(CoreError::Validation(format!(
                "payment_details are required for {}",
                method.as_str()
            )));
        }
        self.debit(user, amount_cents).await?;

        let withdrawal = self
            .record_debited(&NewWithdrawal {
                user_id: user.id,
                amount_cents,
                payment_method: method,
                payment_details: details,
                status: WithdrawalStatus::Pending,
                provider_reference: None,
            })
            .await?;

        tracing::info!(
            user_id = user.id,
            withdrawal_id = withdrawal.id,
            amount_cents,
            method = method.as_str(),
            "Recorded withdrawal"
        );
        Ok(withdrawal)
    }

    pub async fn history(&self, user: &User) -> Result<Vec<Withdrawal>, CoreError> {
        self.payouts
            .list_withdrawals(user.id)
            .await
            .map_err(CoreError::from)
    }

    /// Issue a card, creating the cardholder on first use.
    pub async fn issue_card(&self, user: &User) -> Result<Card, CoreError> {
        let cardholder = match self.payouts.cardholder_token(user.id).await? {
            Some(token) => token,
            None => {
                let token = self
                    .cards
                    .create_cardholder(&CardholderRequest {
                        user_id: user.id,
                        first_name: user.display_name().to_string(),
                        email: user.email.clone(),
                    })
                    .await?;
                self.payouts.save_cardholder_token(user.id, &token).await?;
                token
            }
        };

        let issued = self.cards.issue_card(&cardholder).await?;
        let card = self
            .payouts
            .insert_card(&NewCard {
                user_id: user.id,
                provider_user_token: cardholder,
                card_token: issued.token,
                last_four: issued.last_four,
                state: issued.state,
            })
            .await?;

        tracing::info!(user_id = user.id, card_id = card.id, "Issued card");
        Ok(card)
    }

    pub async fn list_cards(&self, user: &User) -> Result<Vec<Card>, CoreError> {
        self.payouts
            .list_cards(user.id)
            .await
            .map_err(CoreError::from)
    }

    /// Store a withdrawal whose amount is already debited, refunding it if the insert fails.
    async fn record_debited(&self, withdrawal: &NewWithdrawal) -> Result<Withdrawal, CoreError> {
        match self.payouts.insert_withdrawal(withdrawal).await {
            Ok(stored) => Ok(stored),
            Err(e) => {
                tracing::warn!(
                    user_id = withdrawal.user_id,
                    error = %e,
                    "Withdrawal record failed; refunding"
                );
                self.users
                    .refund_earnings(withdrawal.user_id, withdrawal.amount_cents)
                    .await?;
                Err(e.into())
            }
        }
    }

    async fn debit(&self, user: &User, amount_cents: i64) -> Result<(), CoreError> {
        if amount_cents <= 0 {
            return Err(CoreError::Validation("amount must be positive".to_string()));
        }
        if !self.users.debit_earnings(user.id, amount_cents).await? {
            return Err(CoreError::Validation("Insufficient earnings".to_string()));
        }
        Ok(())
    }
}
