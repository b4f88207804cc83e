use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::config::StakingConfig;
use crate::dto::UserStats;
use crate::model::{Reward, Stake, TokenSymbol};

/// Resolves the display unit price of a token in USD. The default
/// implementation is a fixed table from config; a live oracle can be
/// swapped in behind the same trait.
pub trait PriceSource: Send + Sync {
    fn price_usd(&self, token: TokenSymbol) -> Decimal;
}

pub type DynPriceSource = Arc<dyn PriceSource>;

pub struct FixedPrices {
    usdt: Decimal,
    bnb: Decimal,
}

impl FixedPrices {
    pub fn new(usdt: Decimal, bnb: Decimal) -> Self {
        FixedPrices { usdt, bnb }
    }
}

impl From<&StakingConfig> for FixedPrices {
    fn from(config: &StakingConfig) -> Self {
        FixedPrices::new(config.usdt_price_usd, config.bnb_price_usd)
    }
}

impl PriceSource for FixedPrices {
    fn price_usd(&self, token: TokenSymbol) -> Decimal {
        match token {
            TokenSymbol::Usdt => self.usdt,
            TokenSymbol::Bnb => self.bnb,
        }
    }
}

fn fixed(amount: Decimal, decimal_places: u32) -> String {
    format!(
        "{:.precision$}",
        amount.round_dp(decimal_places),
        precision = decimal_places as usize
    )
}

fn sum_staked(stakes: &[Stake], token: TokenSymbol) -> Decimal {
    stakes
        .iter()
        .filter(|stake| stake.token == token && stake.is_active)
        .map(|stake| stake.amount)
        .sum()
}

fn sum_rewards(rewards: &[Reward], token: TokenSymbol) -> Decimal {
    rewards
        .iter()
        .filter(|reward| reward.token == token)
        .map(|reward| reward.amount)
        .sum()
}

/// Pure function of the user's current ledger rows. Staked totals only
/// count active stakes; staking days count from the earliest stake start,
/// active or not.
pub fn compute_user_stats(
    stakes: &[Stake],
    rewards: &[Reward],
    prices: &dyn PriceSource,
    now: DateTime<Utc>,
) -> UserStats {
    let usdt_staked = sum_staked(stakes, TokenSymbol::Usdt);
    let bnb_staked = sum_staked(stakes, TokenSymbol::Bnb);
    let usdt_rewards = sum_rewards(rewards, TokenSymbol::Usdt);
    let bnb_rewards = sum_rewards(rewards, TokenSymbol::Bnb);

    let usdt_price = prices.price_usd(TokenSymbol::Usdt);
    let bnb_price = prices.price_usd(TokenSymbol::Bnb);
    let total_staked_value = usdt_staked * usdt_price + bnb_staked * bnb_price;
    let total_rewards = usdt_rewards * usdt_price + bnb_rewards * bnb_price;

    let staking_days = stakes
        .iter()
        .map(|stake| stake.start_date)
        .min()
        .map(|first| (now - first).num_days().max(0))
        .unwrap_or(0);

    UserStats {
        // Real balances are fetched from the chain on the client; the
        // ledger only tracks staked amounts and rewards.
        usdt_balance: fixed(Decimal::ZERO, 2),
        bnb_balance: fixed(Decimal::ZERO, 4),
        usdt_staked: fixed(usdt_staked, 2),
        bnb_staked: fixed(bnb_staked, 4),
        usdt_rewards: fixed(usdt_rewards, 2),
        bnb_rewards: fixed(bnb_rewards, 6),
        total_staked_value: fixed(total_staked_value, 2),
        total_rewards: fixed(total_rewards, 2),
        staking_days,
    }
}
