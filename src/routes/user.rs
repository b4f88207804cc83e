use rocket::serde::json::Json;
use rocket::State;
use tracing::warn;

use crate::dto::{ApiError, CreateUserRequest, UserStats};
use crate::model::{Transaction, User};
use crate::stats::{self, DynPriceSource};
use crate::storage::DynStorage;

/// Get-or-create a user record keyed by wallet address.
#[post("/api/user", format = "application/json", data = "<request>")]
pub async fn create_user(
    storage: &State<DynStorage>,
    request: Json<CreateUserRequest>,
) -> Result<Json<User>, ApiError> {
    let wallet_address = request
        .wallet_address
        .as_deref()
        .filter(|wallet| !wallet.is_empty())
        .ok_or_else(|| ApiError::Validation("Wallet address is required".to_owned()))?;

    let user = storage.upsert_user(wallet_address).await?;
    Ok(Json(user))
}

#[get("/api/user/stats/<wallet_address>")]
pub async fn get_stats(
    storage: &State<DynStorage>,
    prices: &State<DynPriceSource>,
    wallet_address: &str,
) -> Result<Json<UserStats>, ApiError> {
    let user = storage
        .get_user_by_wallet_address(wallet_address)
        .await?
        .ok_or_else(|| {
            warn!("Stats requested for unknown wallet {}", wallet_address);
            ApiError::NotFound("User not found".to_owned())
        })?;

    let stakes = storage.get_user_stakes(user.id).await?;
    let rewards = storage.get_user_rewards(user.id).await?;
    let user_stats =
        stats::compute_user_stats(&stakes, &rewards, prices.inner().as_ref(), chrono::Utc::now());
    Ok(Json(user_stats))
}

/// Up to the 10 most recent transactions for the wallet, newest first.
#[get("/api/user/transactions/<wallet_address>")]
pub async fn get_transactions(
    storage: &State<DynStorage>,
    wallet_address: &str,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let user = storage
        .get_user_by_wallet_address(wallet_address)
        .await?
        .ok_or_else(|| {
            warn!("Transactions requested for unknown wallet {}", wallet_address);
            ApiError::NotFound("User not found".to_owned())
        })?;

    let transactions = storage.get_user_transactions(user.id).await?;
    Ok(Json(transactions))
}
