use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::model::{
    NewReward, NewStake, NewTransaction, Reward, Stake, TokenSymbol, Transaction, User,
};

pub mod mem;

#[cfg(test)]
mod mem_tests;

/// Returned transaction history is capped to this many entries, newest first.
pub const TRANSACTION_HISTORY_LIMIT: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("No active {0} stakes found")]
    NoActiveStake(TokenSymbol),
    #[error("Insufficient staked amount")]
    InsufficientStake,
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Ledger store contract. Handlers only ever see this trait, so a durable
/// backend can replace [`mem::MemStorage`] without touching them; every
/// operation is fallible for that reason even though the in-memory backend
/// only fails on the unstake domain rules.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StorageError>;
    async fn get_user_by_wallet_address(
        &self,
        wallet_address: &str,
    ) -> Result<Option<User>, StorageError>;
    /// Atomic get-or-create keyed by wallet address. Concurrent first-time
    /// callers for the same wallet must observe a single user record.
    async fn upsert_user(&self, wallet_address: &str) -> Result<User, StorageError>;

    async fn get_stake(&self, id: Uuid) -> Result<Option<Stake>, StorageError>;
    /// All stakes for a user, active or not, in insertion order.
    async fn get_user_stakes(&self, user_id: Uuid) -> Result<Vec<Stake>, StorageError>;
    /// Creates an active stake starting now, plus its initial zero-amount
    /// reward record.
    async fn create_stake(&self, new_stake: NewStake) -> Result<Stake, StorageError>;
    /// Debits the first active stake of `token` for the user, in insertion
    /// order. Single-stake-only semantics: the amount is never aggregated
    /// across several stakes of the same token. An exact-amount match
    /// deactivates the stake and stamps its end date; a smaller amount is
    /// decremented in place.
    async fn unstake_tokens(
        &self,
        user_id: Uuid,
        token: TokenSymbol,
        amount: Decimal,
    ) -> Result<Stake, StorageError>;

    async fn get_transaction(&self, id: Uuid) -> Result<Option<Transaction>, StorageError>;
    /// Up to [`TRANSACTION_HISTORY_LIMIT`] most recent transactions for the
    /// user, descending by creation time.
    async fn get_user_transactions(&self, user_id: Uuid) -> Result<Vec<Transaction>, StorageError>;
    async fn create_transaction(
        &self,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, StorageError>;

    async fn get_reward(&self, id: Uuid) -> Result<Option<Reward>, StorageError>;
    async fn get_user_rewards(&self, user_id: Uuid) -> Result<Vec<Reward>, StorageError>;
    async fn create_reward(&self, new_reward: NewReward) -> Result<Reward, StorageError>;
}

pub type DynStorage = Arc<dyn Storage>;
