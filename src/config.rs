use rocket::serde::Deserialize;
use rust_decimal::Decimal;

use crate::model::TokenSymbol;

/// Service configuration, extracted from the rocket figment (`Rocket.toml`
/// default profile, overridable through `ROCKET_*` environment variables).
#[derive(Clone, Debug, Deserialize)]
#[serde(crate = "rocket::serde", default)]
pub struct StakingConfig {
    pub rust_log: String,
    pub web_api_log: String,
    pub cors_allowed_domains: String,
    /// Destination wallet recorded against every stake/unstake transaction.
    pub treasury_wallet: String,
    pub usdt_apy: Decimal,
    pub bnb_apy: Decimal,
    pub usdt_price_usd: Decimal,
    pub bnb_price_usd: Decimal,
    pub enable_maintenance: bool,
}

impl Default for StakingConfig {
    fn default() -> Self {
        StakingConfig {
            rust_log: "info".to_owned(),
            web_api_log: "info".to_owned(),
            cors_allowed_domains: String::new(),
            treasury_wallet: "0xB361DfC10c55B6aB203D212dA155A4Cff2aA36E5".to_owned(),
            usdt_apy: Decimal::new(2000, 2),
            bnb_apy: Decimal::new(1500, 2),
            usdt_price_usd: Decimal::ONE,
            bnb_price_usd: Decimal::new(312, 0),
            enable_maintenance: false,
        }
    }
}

impl StakingConfig {
    pub fn apy_for(&self, token: TokenSymbol) -> Decimal {
        match token {
            TokenSymbol::Usdt => self.usdt_apy,
            TokenSymbol::Bnb => self.bnb_apy,
        }
    }
}
