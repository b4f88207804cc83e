use rocket::fairing::AdHoc;

pub mod stake;
pub mod user;

pub fn mount() -> AdHoc {
    AdHoc::on_ignite("Attaching Routes", |rocket| async {
        rocket.mount(
            "/",
            routes![
                stake::stake,
                stake::unstake,
                user::create_user,
                user::get_stats,
                user::get_transactions,
            ],
        )
    })
}
