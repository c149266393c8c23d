//! Payout handlers - cash-out intents, manual withdrawals and issued cards.

use agora_core::Card;
use axum::Json;
use axum::extract::{Query, State};

use crate::auth::AuthUser;
use crate::dto::{
    CardResponse, CashoutRequest, CashoutResponse, HistoryQuery, WithdrawalHistoryResponse,
    WithdrawalRequest, WithdrawalResponse,
};
use crate::error::HttpError;
use crate::state::AppState;

/// Create a Stripe payment intent for part of the caller's earnings.
pub async fn create_cashout_intent(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CashoutRequest>,
) -> Result<Json<CashoutResponse>, HttpError> {
    let amount_cents = req.amount_cents()?;
    let intent = state
        .core
        .payouts()
        .create_cashout_intent(&auth.user, amount_cents)
        .await?;
    Ok(Json(intent.into()))
}

/// Record a manual (PayPal or bank) withdrawal.
pub async fn process_withdrawal(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<WithdrawalRequest>,
) -> Result<Json<WithdrawalResponse>, HttpError> {
    let amount_cents = req.amount_cents()?;
    let method = req.method()?;
    let withdrawal = state
        .core
        .payouts()
        .process_withdrawal(&auth.user, amount_cents, method, req.payment_details)
        .await?;
    Ok(Json(withdrawal.into()))
}

/// Withdrawal history of the caller. Asking for another user's is forbidden.
pub async fn history(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<WithdrawalHistoryResponse>, HttpError> {
    if let Some(username) = query.username.as_deref()
        && username != auth.user.username
    {
        return Err(HttpError::Forbidden(
            "You can only view your own withdrawal history".to_string(),
        ));
    }

    let history = state.core.payouts().history(&auth.user).await?;
    Ok(Json(WithdrawalHistoryResponse {
        history: history.into_iter().map(Into::into).collect(),
    }))
}

pub async fn issue_card(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<CardResponse>, HttpError> {
    let card = state.core.payouts().issue_card(&auth.user).await?;
    Ok(Json(card.into()))
}

pub async fn list_cards(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Card>>, HttpError> {
    Ok(Json(state.core.payouts().list_cards(&auth.user).await?))
}
