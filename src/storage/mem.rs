use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::{Storage, StorageError, TRANSACTION_HISTORY_LIMIT};
use crate::model::{
    NewReward, NewStake, NewTransaction, Reward, Stake, TokenSymbol, Transaction, User,
};

#[derive(Default)]
struct Ledger {
    users: HashMap<Uuid, User>,
    stakes: HashMap<Uuid, Stake>,
    transactions: HashMap<Uuid, Transaction>,
    rewards: HashMap<Uuid, Reward>,
    // Insertion logs; HashMap iteration order is arbitrary but stake
    // selection and history ordering must be deterministic.
    stake_order: Vec<Uuid>,
    transaction_order: Vec<Uuid>,
}

/// In-memory ledger store. State resets on process restart. A single
/// `RwLock` over the whole ledger serializes each multi-step write
/// (get-or-create user, stake plus initial reward, unstake
/// read-modify-write), so concurrent requests against the same user cannot
/// double-spend a stake.
#[derive(Default)]
pub struct MemStorage {
    ledger: RwLock<Ledger>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn pseudo_tx_hash() -> String {
    format!("0x{}", Uuid::new_v4().simple())
}

#[async_trait]
impl Storage for MemStorage {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StorageError> {
        Ok(self.ledger.read().await.users.get(&id).cloned())
    }

    async fn get_user_by_wallet_address(
        &self,
        wallet_address: &str,
    ) -> Result<Option<User>, StorageError> {
        let ledger = self.ledger.read().await;
        Ok(ledger
            .users
            .values()
            .find(|user| user.wallet_address == wallet_address)
            .cloned())
    }

    async fn upsert_user(&self, wallet_address: &str) -> Result<User, StorageError> {
        let mut ledger = self.ledger.write().await;
        if let Some(user) = ledger
            .users
            .values()
            .find(|user| user.wallet_address == wallet_address)
        {
            return Ok(user.clone());
        }
        let user = User {
            id: Uuid::new_v4(),
            wallet_address: wallet_address.to_owned(),
            created_at: Utc::now(),
        };
        info!("Created user {} for wallet {}", user.id, wallet_address);
        ledger.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_stake(&self, id: Uuid) -> Result<Option<Stake>, StorageError> {
        Ok(self.ledger.read().await.stakes.get(&id).cloned())
    }

    async fn get_user_stakes(&self, user_id: Uuid) -> Result<Vec<Stake>, StorageError> {
        let ledger = self.ledger.read().await;
        Ok(ledger
            .stake_order
            .iter()
            .filter_map(|id| ledger.stakes.get(id))
            .filter(|stake| stake.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_stake(&self, new_stake: NewStake) -> Result<Stake, StorageError> {
        let mut ledger = self.ledger.write().await;
        let now = Utc::now();
        let stake = Stake {
            id: Uuid::new_v4(),
            user_id: new_stake.user_id,
            token: new_stake.token,
            amount: new_stake.amount,
            apy: new_stake.apy,
            start_date: now,
            end_date: None,
            is_active: true,
            created_at: now,
        };
        ledger.stakes.insert(stake.id, stake.clone());
        ledger.stake_order.push(stake.id);

        // Initial reward record for this stake, amount fixed at zero. No
        // accrual process updates it.
        let reward = Reward {
            id: Uuid::new_v4(),
            user_id: new_stake.user_id,
            stake_id: stake.id,
            token: new_stake.token,
            amount: Decimal::new(0, 2),
            calculated_at: now,
            distributed_at: None,
            is_distributed: false,
        };
        ledger.rewards.insert(reward.id, reward);

        Ok(stake)
    }

    async fn unstake_tokens(
        &self,
        user_id: Uuid,
        token: TokenSymbol,
        amount: Decimal,
    ) -> Result<Stake, StorageError> {
        let mut ledger = self.ledger.write().await;
        let stake_id = ledger
            .stake_order
            .iter()
            .filter_map(|id| ledger.stakes.get(id))
            .find(|stake| stake.user_id == user_id && stake.token == token && stake.is_active)
            .map(|stake| stake.id)
            .ok_or(StorageError::NoActiveStake(token))?;

        let stake = ledger
            .stakes
            .get_mut(&stake_id)
            .ok_or_else(|| StorageError::Backend(format!("Stake {stake_id} vanished")))?;

        if amount > stake.amount {
            return Err(StorageError::InsufficientStake);
        }

        if amount == stake.amount {
            stake.is_active = false;
            stake.end_date = Some(Utc::now());
        } else {
            stake.amount -= amount;
        }
        Ok(stake.clone())
    }

    async fn get_transaction(&self, id: Uuid) -> Result<Option<Transaction>, StorageError> {
        Ok(self.ledger.read().await.transactions.get(&id).cloned())
    }

    async fn get_user_transactions(&self, user_id: Uuid) -> Result<Vec<Transaction>, StorageError> {
        let ledger = self.ledger.read().await;
        // Collected in reverse insertion order so the stable sort keeps the
        // latest insertion first when creation times tie.
        let mut transactions: Vec<Transaction> = ledger
            .transaction_order
            .iter()
            .rev()
            .filter_map(|id| ledger.transactions.get(id))
            .filter(|transaction| transaction.user_id == user_id)
            .cloned()
            .collect();
        transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        transactions.truncate(TRANSACTION_HISTORY_LIMIT);
        Ok(transactions)
    }

    async fn create_transaction(
        &self,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, StorageError> {
        let mut ledger = self.ledger.write().await;
        let transaction = Transaction {
            id: Uuid::new_v4(),
            user_id: new_transaction.user_id,
            stake_id: new_transaction.stake_id,
            tx_type: new_transaction.tx_type,
            token: new_transaction.token,
            amount: new_transaction.amount,
            tx_hash: new_transaction.tx_hash.unwrap_or_else(pseudo_tx_hash),
            treasury_wallet: new_transaction.treasury_wallet,
            status: new_transaction.status.unwrap_or_default(),
            created_at: Utc::now(),
        };
        ledger.transactions.insert(transaction.id, transaction.clone());
        ledger.transaction_order.push(transaction.id);
        Ok(transaction)
    }

    async fn get_reward(&self, id: Uuid) -> Result<Option<Reward>, StorageError> {
        Ok(self.ledger.read().await.rewards.get(&id).cloned())
    }

    async fn get_user_rewards(&self, user_id: Uuid) -> Result<Vec<Reward>, StorageError> {
        let ledger = self.ledger.read().await;
        Ok(ledger
            .rewards
            .values()
            .filter(|reward| reward.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_reward(&self, new_reward: NewReward) -> Result<Reward, StorageError> {
        let mut ledger = self.ledger.write().await;
        let reward = Reward {
            id: Uuid::new_v4(),
            user_id: new_reward.user_id,
            stake_id: new_reward.stake_id,
            token: new_reward.token,
            amount: new_reward.amount,
            calculated_at: Utc::now(),
            distributed_at: None,
            is_distributed: false,
        };
        ledger.rewards.insert(reward.id, reward.clone());
        Ok(reward)
    }
}
