pub mod config;
pub mod cors;
pub mod dto;
pub mod maintenance;
pub mod model;
pub mod routes;
pub mod stats;
pub mod storage;


#[macro_use]
extern crate rocket;

use dto::ErrorMessage;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{Build, Request, Rocket};
use std::collections::HashSet;
use std::sync::Arc;

use config::StakingConfig;
use stats::{DynPriceSource, FixedPrices};
use storage::DynStorage;

#[get("/")]
async fn health_ping() -> &'static str {
    ""
}

#[get("/maintenance_mode")]
async fn maintenance_mode() -> (Status, Json<ErrorMessage>) {
    (
        Status::ServiceUnavailable,
        Json(ErrorMessage {
            message: "Service is under maintenance".to_owned(),
        }),
    )
}

#[catch(404)]
async fn bad_request(req: &Request<'_>) -> Json<ErrorMessage> {
    Json(ErrorMessage {
        message: format!("Couldn't find '{}'", req.uri()),
    })
}

#[catch(422)]
async fn unprocessable_body() -> Json<ErrorMessage> {
    Json(ErrorMessage {
        message: "Please check the request body. It must be valid JSON.".to_owned(),
    })
}

#[catch(500)]
async fn internal_error() -> Json<ErrorMessage> {
    Json(ErrorMessage {
        message: "Whoops! Looks like we messed up.".to_owned(),
    })
}

/// Assembles the rocket with the given config and an injected ledger store.
/// Tests pass a fresh [`storage::mem::MemStorage`]; a durable backend slots
/// in through the same [`storage::Storage`] trait object.
pub fn build_rocket(staking_config: StakingConfig, storage: DynStorage) -> Rocket<Build> {
    let allowed_domains: HashSet<String> = staking_config
        .cors_allowed_domains
        .split(',')
        .filter(|domain| !domain.is_empty())
        .map(|domain| domain.to_owned())
        .collect();

    let prices: DynPriceSource = Arc::new(FixedPrices::from(&staking_config));

    rocket::build()
        .register("/", catchers![internal_error, unprocessable_body, bad_request])
        .attach(maintenance::MaintenanceMode)
        .manage(staking_config)
        .manage(storage)
        .manage(prices)
        .attach(cors::OriginHeader { allowed_domains })
        .attach(routes::mount())
        .mount("/", routes![health_ping, maintenance_mode])
}
