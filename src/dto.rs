use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::Request;
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

use crate::model::{Stake, TokenSymbol};
use crate::storage::StorageError;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub wallet_address: Option<String>,
}

/// Body of both `POST /api/stake` and `POST /api/unstake`. Fields are raw
/// strings so that the first violated constraint is reported with its own
/// message instead of a generic deserialization failure.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct StakeRequest {
    pub token: Option<String>,
    pub amount: Option<String>,
    pub wallet_address: Option<String>,
}

impl StakeRequest {
    /// Checks constraints in field order (token, amount, wallet address)
    /// and reports the first violation.
    pub fn validate(&self) -> Result<(TokenSymbol, Decimal, &str), ApiError> {
        let token = self
            .token
            .as_deref()
            .and_then(|token| TokenSymbol::from_str(token).ok())
            .ok_or_else(|| ApiError::Validation("Token must be one of BNB, USDT".to_owned()))?;
        let amount = self
            .amount
            .as_deref()
            .and_then(|amount| Decimal::from_str(amount).ok())
            .filter(|amount| *amount > Decimal::ZERO)
            .ok_or_else(|| ApiError::Validation("Amount must be greater than 0".to_owned()))?;
        let wallet_address = self
            .wallet_address
            .as_deref()
            .filter(|wallet| !wallet.is_empty())
            .ok_or_else(|| ApiError::Validation("Wallet address is required".to_owned()))?;
        Ok((token, amount, wallet_address))
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StakeResponse {
    pub message: String,
    pub stake: Stake,
}

/// Per-user summary derived from the ledger. All monetary figures are
/// fixed-point strings; on-chain balances are zero-filled because real
/// balances are resolved client-side against the chain RPC.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct UserStats {
    pub usdt_balance: String,
    pub bnb_balance: String,
    pub usdt_staked: String,
    pub bnb_staked: String,
    pub usdt_rewards: String,
    pub bnb_rewards: String,
    pub total_staked_value: String,
    pub total_rewards: String,
    pub staking_days: i64,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ErrorMessage {
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    fn status(&self) -> Status {
        match self {
            ApiError::Validation(_) => Status::BadRequest,
            ApiError::NotFound(_) => Status::NotFound,
            ApiError::Storage(StorageError::Backend(_)) => Status::InternalServerError,
            // Domain-rule violations are client-correctable.
            ApiError::Storage(_) => Status::BadRequest,
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        let mut response = Json(ErrorMessage {
            message: self.to_string(),
        })
        .respond_to(request)?;
        response.set_status(status);
        Ok(response)
    }
}
