use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use rust_decimal::Decimal;
use strum_macros::{Display, EnumString};
use uuid::Uuid;

/// The two supported BEP-20 token symbols. Every stake, transaction and
/// reward carries exactly one of these.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, Display, EnumString)]
#[serde(crate = "rocket::serde", rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum TokenSymbol {
    Bnb,
    Usdt,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Display, EnumString)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TransactionType {
    Stake,
    Unstake,
    Reward,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, Display)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TransactionStatus {
    #[default]
    Completed,
    Pending,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub wallet_address: String,
    pub created_at: DateTime<Utc>,
}

/// One stake position. Partial unstakes reduce `amount` in place; a full
/// unstake flips `is_active` and stamps `end_date`. Rows are never deleted.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct Stake {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token: TokenSymbol,
    pub amount: Decimal,
    pub apy: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Append-only audit record. `tx_hash` is synthesized when the caller does
/// not supply one; reads are capped to the 10 most recent per user.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub stake_id: Option<Uuid>,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub token: TokenSymbol,
    pub amount: Decimal,
    pub tx_hash: String,
    pub treasury_wallet: Option<String>,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
}

/// Created with a zero amount alongside each stake. No process in this
/// service accrues rewards; distribution fields stay untouched.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct Reward {
    pub id: Uuid,
    pub user_id: Uuid,
    pub stake_id: Uuid,
    pub token: TokenSymbol,
    pub amount: Decimal,
    pub calculated_at: DateTime<Utc>,
    pub distributed_at: Option<DateTime<Utc>>,
    pub is_distributed: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewStake {
    pub user_id: Uuid,
    pub token: TokenSymbol,
    pub amount: Decimal,
    pub apy: Decimal,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewTransaction {
    pub user_id: Uuid,
    pub stake_id: Option<Uuid>,
    pub tx_type: TransactionType,
    pub token: TokenSymbol,
    pub amount: Decimal,
    pub tx_hash: Option<String>,
    pub treasury_wallet: Option<String>,
    pub status: Option<TransactionStatus>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewReward {
    pub user_id: Uuid,
    pub stake_id: Uuid,
    pub token: TokenSymbol,
    pub amount: Decimal,
}
