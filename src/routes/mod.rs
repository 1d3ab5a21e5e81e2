use actix_web::web;

pub mod attendance;
pub mod backend_health;
pub mod roster;

use crate::middleware::AuthMiddleware;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(backend_health::backend_health);

    // Admin routes (require admin role)
    cfg.service(
        web::scope("/admin/matches")
            .wrap(AuthMiddleware::admin())
            .service(attendance::set_player_attendance)
    );
    // Match routes (require authentication)
    cfg.service(
        web::scope("/matches")
            .wrap(AuthMiddleware::member())
            .service(attendance::get_match_attendance)
            .service(attendance::set_own_attendance)
    );
    cfg.service(
        web::scope("/players")
            .wrap(AuthMiddleware::member())
            .service(roster::get_roster)
    );
}
