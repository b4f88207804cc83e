// Unit tests to cover the in-memory ledger store

use super::mem::MemStorage;
use super::{Storage, StorageError, TRANSACTION_HISTORY_LIMIT};
use crate::model::{
    NewReward, NewStake, NewTransaction, TokenSymbol, TransactionStatus, TransactionType,
};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

async fn stake_for(
    storage: &MemStorage,
    user_id: Uuid,
    token: TokenSymbol,
    amount: &str,
) -> crate::model::Stake {
    storage
        .create_stake(NewStake {
            user_id,
            token,
            amount: dec(amount),
            apy: dec("20.00"),
        })
        .await
        .unwrap()
}

#[rocket::async_test]
async fn upsert_user_returns_same_record_for_same_wallet() {
    let storage = MemStorage::new();
    let first = storage.upsert_user("0xabc").await.unwrap();
    let second = storage.upsert_user("0xabc").await.unwrap();
    assert_eq!(first.id, second.id);

    let other = storage.upsert_user("0xdef").await.unwrap();
    assert_ne!(first.id, other.id);

    let by_wallet = storage.get_user_by_wallet_address("0xabc").await.unwrap();
    assert_eq!(by_wallet, Some(first));
}

#[rocket::async_test]
async fn create_stake_records_zero_reward() {
    let storage = MemStorage::new();
    let user = storage.upsert_user("0xabc").await.unwrap();
    let stake = stake_for(&storage, user.id, TokenSymbol::Usdt, "100").await;

    assert!(stake.is_active);
    assert_eq!(stake.end_date, None);

    let rewards = storage.get_user_rewards(user.id).await.unwrap();
    assert_eq!(rewards.len(), 1);
    assert_eq!(rewards[0].stake_id, stake.id);
    assert_eq!(rewards[0].token, TokenSymbol::Usdt);
    assert_eq!(rewards[0].amount, Decimal::ZERO);
    assert!(!rewards[0].is_distributed);
}

#[rocket::async_test]
async fn full_unstake_deactivates_stake() {
    let storage = MemStorage::new();
    let user = storage.upsert_user("0xabc").await.unwrap();
    stake_for(&storage, user.id, TokenSymbol::Usdt, "100").await;

    let stake = storage
        .unstake_tokens(user.id, TokenSymbol::Usdt, dec("100"))
        .await
        .unwrap();

    assert!(!stake.is_active);
    assert!(stake.end_date.is_some());

    let stakes = storage.get_user_stakes(user.id).await.unwrap();
    let active_total: Decimal = stakes
        .iter()
        .filter(|s| s.is_active && s.token == TokenSymbol::Usdt)
        .map(|s| s.amount)
        .sum();
    assert_eq!(active_total, Decimal::ZERO);
}

#[rocket::async_test]
async fn partial_unstake_decrements_amount_in_place() {
    let storage = MemStorage::new();
    let user = storage.upsert_user("0xabc").await.unwrap();
    stake_for(&storage, user.id, TokenSymbol::Usdt, "100").await;

    let stake = storage
        .unstake_tokens(user.id, TokenSymbol::Usdt, dec("40"))
        .await
        .unwrap();

    assert!(stake.is_active);
    assert_eq!(stake.amount, dec("60"));
    assert_eq!(stake.end_date, None);
}

#[rocket::async_test]
async fn over_unstake_fails_and_leaves_stake_unchanged() {
    let storage = MemStorage::new();
    let user = storage.upsert_user("0xabc").await.unwrap();
    let stake = stake_for(&storage, user.id, TokenSymbol::Bnb, "5").await;

    let result = storage
        .unstake_tokens(user.id, TokenSymbol::Bnb, dec("5.5"))
        .await;
    assert_eq!(result, Err(StorageError::InsufficientStake));

    let unchanged = storage.get_stake(stake.id).await.unwrap().unwrap();
    assert!(unchanged.is_active);
    assert_eq!(unchanged.amount, dec("5"));
}

#[rocket::async_test]
async fn unstake_without_active_stake_fails() {
    let storage = MemStorage::new();
    let user = storage.upsert_user("0xabc").await.unwrap();

    let result = storage
        .unstake_tokens(user.id, TokenSymbol::Usdt, dec("1"))
        .await;
    assert_eq!(result, Err(StorageError::NoActiveStake(TokenSymbol::Usdt)));

    // A stake of the other token does not satisfy the lookup.
    stake_for(&storage, user.id, TokenSymbol::Bnb, "10").await;
    let result = storage
        .unstake_tokens(user.id, TokenSymbol::Usdt, dec("1"))
        .await;
    assert_eq!(result, Err(StorageError::NoActiveStake(TokenSymbol::Usdt)));
}

#[rocket::async_test]
async fn unstake_targets_first_active_stake_in_insertion_order() {
    let storage = MemStorage::new();
    let user = storage.upsert_user("0xabc").await.unwrap();
    let first = stake_for(&storage, user.id, TokenSymbol::Usdt, "30").await;
    let second = stake_for(&storage, user.id, TokenSymbol::Usdt, "70").await;

    // Single-stake-only semantics: 50 exceeds the first stake even though
    // the user holds 100 in total.
    let result = storage
        .unstake_tokens(user.id, TokenSymbol::Usdt, dec("50"))
        .await;
    assert_eq!(result, Err(StorageError::InsufficientStake));

    let debited = storage
        .unstake_tokens(user.id, TokenSymbol::Usdt, dec("30"))
        .await
        .unwrap();
    assert_eq!(debited.id, first.id);
    assert!(!debited.is_active);

    // With the first exhausted, the second becomes the target.
    let debited = storage
        .unstake_tokens(user.id, TokenSymbol::Usdt, dec("20"))
        .await
        .unwrap();
    assert_eq!(debited.id, second.id);
    assert_eq!(debited.amount, dec("50"));
}

#[rocket::async_test]
async fn concurrent_upserts_observe_a_single_user() {
    let storage = Arc::new(MemStorage::new());

    let mut handles = Vec::new();
    for _ in 0..16 {
        let storage = Arc::clone(&storage);
        handles.push(rocket::tokio::spawn(async move {
            storage.upsert_user("0xrace").await.unwrap().id
        }));
    }

    let mut ids = HashSet::new();
    for handle in handles {
        ids.insert(handle.await.unwrap());
    }
    assert_eq!(ids.len(), 1);
}

#[rocket::async_test]
async fn concurrent_full_unstakes_debit_only_once() {
    let storage = Arc::new(MemStorage::new());
    let user_id = storage.upsert_user("0xabc").await.unwrap().id;
    stake_for(&storage, user_id, TokenSymbol::Usdt, "100").await;

    let first = {
        let storage = Arc::clone(&storage);
        rocket::tokio::spawn(async move {
            storage
                .unstake_tokens(user_id, TokenSymbol::Usdt, dec("100"))
                .await
        })
    };
    let second = {
        let storage = Arc::clone(&storage);
        rocket::tokio::spawn(async move {
            storage
                .unstake_tokens(user_id, TokenSymbol::Usdt, dec("100"))
                .await
        })
    };

    let results = [first.await.unwrap(), second.await.unwrap()];
    // The whole-ledger write lock serializes the read-modify-write, so
    // exactly one caller debits the stake and the loser sees it inactive.
    assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
    assert!(results
        .iter()
        .any(|result| result == &Err(StorageError::NoActiveStake(TokenSymbol::Usdt))));

    let stakes = storage.get_user_stakes(user_id).await.unwrap();
    assert!(stakes.iter().all(|stake| !stake.is_active));
}

#[rocket::async_test]
async fn point_reads_return_created_rows() {
    let storage = MemStorage::new();
    let user = storage.upsert_user("0xabc").await.unwrap();
    let stake = stake_for(&storage, user.id, TokenSymbol::Usdt, "10").await;

    let transaction = storage
        .create_transaction(NewTransaction {
            user_id: user.id,
            stake_id: Some(stake.id),
            tx_type: TransactionType::Stake,
            token: TokenSymbol::Usdt,
            amount: dec("10"),
            tx_hash: None,
            treasury_wallet: None,
            status: None,
        })
        .await
        .unwrap();
    let fetched = storage.get_transaction(transaction.id).await.unwrap();
    assert_eq!(fetched, Some(transaction));
    assert_eq!(storage.get_transaction(Uuid::new_v4()).await.unwrap(), None);

    let reward = storage
        .create_reward(NewReward {
            user_id: user.id,
            stake_id: stake.id,
            token: TokenSymbol::Usdt,
            amount: dec("1.5"),
        })
        .await
        .unwrap();
    let fetched = storage.get_reward(reward.id).await.unwrap();
    assert_eq!(fetched, Some(reward));
    assert_eq!(storage.get_reward(Uuid::new_v4()).await.unwrap(), None);

    // The initial zero reward from create_stake plus the explicit one.
    let rewards = storage.get_user_rewards(user.id).await.unwrap();
    assert_eq!(rewards.len(), 2);
}

#[rocket::async_test]
async fn create_transaction_synthesizes_hash_and_defaults_status() {
    let storage = MemStorage::new();
    let user = storage.upsert_user("0xabc").await.unwrap();

    let transaction = storage
        .create_transaction(NewTransaction {
            user_id: user.id,
            stake_id: None,
            tx_type: TransactionType::Stake,
            token: TokenSymbol::Usdt,
            amount: dec("10"),
            tx_hash: None,
            treasury_wallet: None,
            status: None,
        })
        .await
        .unwrap();

    assert!(transaction.tx_hash.starts_with("0x"));
    assert_eq!(transaction.tx_hash.len(), 2 + 32);
    assert_eq!(transaction.status, TransactionStatus::Completed);
    assert_eq!(transaction.stake_id, None);

    let supplied = storage
        .create_transaction(NewTransaction {
            user_id: user.id,
            stake_id: None,
            tx_type: TransactionType::Unstake,
            token: TokenSymbol::Usdt,
            amount: dec("10"),
            tx_hash: Some("0xdeadbeef".to_owned()),
            treasury_wallet: None,
            status: Some(TransactionStatus::Pending),
        })
        .await
        .unwrap();
    assert_eq!(supplied.tx_hash, "0xdeadbeef");
    assert_eq!(supplied.status, TransactionStatus::Pending);
}

#[rocket::async_test]
async fn transaction_history_is_capped_and_newest_first() {
    let storage = MemStorage::new();
    let user = storage.upsert_user("0xabc").await.unwrap();

    for n in 1..=12 {
        storage
            .create_transaction(NewTransaction {
                user_id: user.id,
                stake_id: None,
                tx_type: TransactionType::Stake,
                token: TokenSymbol::Usdt,
                amount: Decimal::new(n, 0),
                tx_hash: None,
                treasury_wallet: None,
                status: None,
            })
            .await
            .unwrap();
    }

    let history = storage.get_user_transactions(user.id).await.unwrap();
    assert_eq!(history.len(), TRANSACTION_HISTORY_LIMIT);
    // Newest first: amounts 12 down to 3.
    assert_eq!(history[0].amount, dec("12"));
    assert_eq!(history[9].amount, dec("3"));
    for pair in history.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
    }
}

#[rocket::async_test]
async fn history_is_scoped_per_user() {
    let storage = MemStorage::new();
    let alice = storage.upsert_user("0xaaa").await.unwrap();
    let bob = storage.upsert_user("0xbbb").await.unwrap();

    stake_for(&storage, alice.id, TokenSymbol::Usdt, "10").await;
    storage
        .create_transaction(NewTransaction {
            user_id: alice.id,
            stake_id: None,
            tx_type: TransactionType::Stake,
            token: TokenSymbol::Usdt,
            amount: dec("10"),
            tx_hash: None,
            treasury_wallet: None,
            status: None,
        })
        .await
        .unwrap();

    assert!(storage.get_user_transactions(bob.id).await.unwrap().is_empty());
    assert!(storage.get_user_stakes(bob.id).await.unwrap().is_empty());
    assert!(storage.get_user_rewards(bob.id).await.unwrap().is_empty());
}
