pub mod tag;

use actix_web::web;

pub fn create_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/tag").configure(tag::create_routes));
}
