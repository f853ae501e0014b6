//! Route configuration
//!
//! Everything lives under `/api/v1`, behind [`AuthenticationMiddleware`].

use crate::error::AppError;
use crate::handlers;
use crate::middleware::AuthenticationMiddleware;
use actix_web::web;

/// Configure all routes for the application
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .service(
            web::scope("/api/v1")
                .wrap(AuthenticationMiddleware)
                .route("/health", web::get().to(handlers::health_check))
                .route("/health/ready", web::get().to(handlers::readiness_check))
                .route("/health/live", web::get().to(handlers::liveness_check))
                .configure(auth::configure)
                .configure(products::configure)
                .configure(reviews::configure)
                .configure(collections::configure)
                .configure(orders::configure),
        );
}

/// Malformed JSON bodies render as `AppError` JSON
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::Validation(err.to_string()).into())
}

/// Malformed filter values render as `AppError` JSON
fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

mod auth {
    use super::*;

    pub fn configure(cfg: &mut web::ServiceConfig) {
        cfg.service(
            web::scope("/auth")
                .route("/register", web::post().to(handlers::auth::register))
                .route("/token", web::post().to(handlers::auth::token)),
        );
    }
}

mod products {
    use super::*;
    use crate::handlers::products::*;

    pub fn configure(cfg: &mut web::ServiceConfig) {
        cfg.service(
            web::scope("/products")
                .service(
                    web::resource("")
                        .route(web::get().to(list_products))
                        .route(web::post().to(create_product)),
                )
                .service(
                    web::resource("/{product_id}")
                        .route(web::get().to(get_product))
                        .route(web::put().to(update_product))
                        .route(web::delete().to(delete_product)),
                ),
        );
    }
}

mod reviews {
    use super::*;
    use crate::handlers::reviews::*;

    pub fn configure(cfg: &mut web::ServiceConfig) {
        cfg.service(
            web::scope("/product-reviews")
                .service(
                    web::resource("")
                        .route(web::get().to(list_reviews))
                        .route(web::post().to(create_review)),
                )
                .service(
                    web::resource("/{review_id}")
                        .route(web::get().to(get_review))
                        .route(web::put().to(update_review))
                        .route(web::delete().to(delete_review)),
                ),
        );
    }
}

mod collections {
    use super::*;
    use crate::handlers::collections::*;

    pub fn configure(cfg: &mut web::ServiceConfig) {
        cfg.service(
            web::scope("/product-collections")
                .service(
                    web::resource("")
                        .route(web::get().to(list_collections))
                        .route(web::post().to(create_collection)),
                )
                .service(
                    web::resource("/{collection_id}")
                        .route(web::get().to(get_collection))
                        .route(web::put().to(update_collection))
                        .route(web::delete().to(delete_collection)),
                ),
        );
    }
}

mod orders {
    use super::*;
    use crate::handlers::orders::*;

    pub fn configure(cfg: &mut web::ServiceConfig) {
        cfg.service(
            web::scope("/orders")
                .service(
                    web::resource("")
                        .route(web::get().to(list_orders))
                        .route(web::post().to(create_order)),
                )
                .service(
                    web::resource("/{order_id}")
                        .route(web::get().to(get_order))
                        .route(web::put().to(replace_order))
                        .route(web::patch().to(patch_order))
                        .route(web::delete().to(delete_order)),
                ),
        );
    }
}
