use rocket::serde::json::Json;
use rocket::State;
use tracing::{info, warn};

use crate::config::StakingConfig;
use crate::dto::{ApiError, StakeRequest, StakeResponse};
use crate::model::{NewStake, NewTransaction, TransactionType};
use crate::storage::DynStorage;

#[post("/api/stake", format = "application/json", data = "<request>")]
pub async fn stake(
    storage: &State<DynStorage>,
    staking_config: &State<StakingConfig>,
    request: Json<StakeRequest>,
) -> Result<Json<StakeResponse>, ApiError> {
    let (token, amount, wallet_address) = request.validate()?;

    let user = storage.upsert_user(wallet_address).await?;
    let stake = storage
        .create_stake(NewStake {
            user_id: user.id,
            token,
            amount,
            apy: staking_config.apy_for(token),
        })
        .await?;

    storage
        .create_transaction(NewTransaction {
            user_id: user.id,
            stake_id: Some(stake.id),
            tx_type: TransactionType::Stake,
            token,
            amount,
            tx_hash: None,
            treasury_wallet: Some(staking_config.treasury_wallet.to_owned()),
            status: None,
        })
        .await?;

    info!("User {} staked {} {}", user.id, amount, token);
    Ok(Json(StakeResponse {
        message: "Staking successful".to_owned(),
        stake,
    }))
}

#[post("/api/unstake", format = "application/json", data = "<request>")]
pub async fn unstake(
    storage: &State<DynStorage>,
    staking_config: &State<StakingConfig>,
    request: Json<StakeRequest>,
) -> Result<Json<StakeResponse>, ApiError> {
    let (token, amount, wallet_address) = request.validate()?;

    let user = storage
        .get_user_by_wallet_address(wallet_address)
        .await?
        .ok_or_else(|| {
            warn!("Unstake requested for unknown wallet {}", wallet_address);
            ApiError::NotFound("User not found".to_owned())
        })?;

    let stake = storage.unstake_tokens(user.id, token, amount).await?;

    storage
        .create_transaction(NewTransaction {
            user_id: user.id,
            stake_id: Some(stake.id),
            tx_type: TransactionType::Unstake,
            token,
            amount,
            tx_hash: None,
            treasury_wallet: Some(staking_config.treasury_wallet.to_owned()),
            status: None,
        })
        .await?;

    info!("User {} unstaked {} {}", user.id, amount, token);
    Ok(Json(StakeResponse {
        message: "Unstaking successful".to_owned(),
        stake,
    }))
}
