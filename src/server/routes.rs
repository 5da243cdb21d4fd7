use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router
};
use serde::{Serialize, Deserialize};
use tokio::sync::Mutex;
use tower_http::limit::RequestBodyLimitLayer;

use crate::backend::LedgerStore;
use crate::core::{Amount, Entry, Identity, ValueTransfer};
use crate::custody::Custody;
use crate::server::caller::Caller;
use crate::server::error::ServerError;

/// The lock is held for the whole of each operation, so deposits and
/// withdrawals never interleave.
pub struct AppState<S, T> {
    pub custody: Arc<Mutex<Custody<S, T>>>
}

impl<S, T> AppState<S, T> {
    pub fn new(custody: Custody<S, T>) -> Self {
        AppState { custody: Arc::new(Mutex::new(custody)) }
    }
}

impl<S, T> Clone for AppState<S, T> {
    fn clone(&self) -> Self {
        AppState { custody: Arc::clone(&self.custody) }
    }
}

#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    /// wei, base 10
    pub amount: String
}

#[derive(Debug, Deserialize)]
pub struct WithdrawRequest {
    pub recipient: String,
    /// wei, base 10
    pub amount: String
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub balance: Amount
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OwnerResponse {
    pub owner: Identity
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WithdrawResponse {
    pub recipient: Identity,
    pub amount: Amount,
    pub balance: Amount
}

pub fn router<S, T>(state: AppState<S, T>, body_limit: usize) -> Router
where
    S: LedgerStore + Send + 'static,
    T: ValueTransfer + Send + 'static
{
    Router::new()
        .route("/health", get(health))
        .route("/owner", get(owner::<S, T>))
        .route("/balance", get(balance::<S, T>))
        .route("/history", get(history::<S, T>))
        .route("/deposit", post(deposit::<S, T>))
        .route("/withdraw", post(withdraw::<S, T>))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn owner<S, T>(State(state): State<AppState<S, T>>) -> Json<OwnerResponse>
where S: LedgerStore + Send + 'static, T: ValueTransfer + Send + 'static
{
    let custody = state.custody.lock().await;
    Json(OwnerResponse { owner: custody.owner().clone() })
}

async fn balance<S, T>(State(state): State<AppState<S, T>>) -> Json<BalanceResponse>
where S: LedgerStore + Send + 'static, T: ValueTransfer + Send + 'static
{
    let custody = state.custody.lock().await;
    Json(BalanceResponse { balance: custody.balance_of() })
}

async fn history<S, T>(State(state): State<AppState<S, T>>) -> Json<Vec<Entry>>
where S: LedgerStore + Send + 'static, T: ValueTransfer + Send + 'static
{
    let custody = state.custody.lock().await;
    Json(custody.history().to_vec())
}

async fn deposit<S, T>(
    State(state): State<AppState<S, T>>,
    Caller(caller): Caller,
    Json(request): Json<DepositRequest>
) -> Result<Json<BalanceResponse>, ServerError>
where S: LedgerStore + Send + 'static, T: ValueTransfer + Send + 'static
{
    let amount: Amount = request.amount.trim().parse()?;

    let mut custody = state.custody.lock().await;
    let balance = custody.deposit(&caller, amount)?;
    Ok(Json(BalanceResponse { balance }))
}

async fn withdraw<S, T>(
    State(state): State<AppState<S, T>>,
    Caller(caller): Caller,
    Json(request): Json<WithdrawRequest>
) -> Result<Json<WithdrawResponse>, ServerError>
where S: LedgerStore + Send + 'static, T: ValueTransfer + Send + 'static
{
    let recipient: Identity = request.recipient.parse()?;
    let amount: Amount = request.amount.trim().parse()?;

    let mut custody = state.custody.lock().await;
    let (payout, balance) = custody.withdraw(&caller, &recipient, amount)?;
    Ok(Json(WithdrawResponse { recipient: payout.recipient, amount: payout.amount, balance }))
}
