// Route exports
pub mod smart_match;

use actix_web::web;

pub use smart_match::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(smart_match::configure),
    );
}
