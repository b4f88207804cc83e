use bep20_staking_web_api::config::StakingConfig;
use bep20_staking_web_api::storage::mem::MemStorage;
use bep20_staking_web_api::storage::DynStorage;
use rocket::{Build, Config, Rocket};
use std::sync::Arc;
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

#[rocket::launch]
fn rocket() -> Rocket<Build> {
    let staking_config = Config::figment()
        .extract::<StakingConfig>()
        .expect("Error extracting staking config");
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", &staking_config.rust_log);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                format!("bep20_staking_web_api={}", &staking_config.web_api_log)
                    .parse()
                    .expect("Error parsing directive"),
            ),
        )
        .with_span_events(FmtSpan::FULL)
        .init();

    let storage: DynStorage = Arc::new(MemStorage::new());
    bep20_staking_web_api::build_rocket(staking_config, storage)
}
