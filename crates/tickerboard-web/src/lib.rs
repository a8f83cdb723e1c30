pub mod api;
pub mod cli;
pub mod error;
pub mod model;
pub mod watchlist;

#[cfg(test)]
mod testing;

use actix_cors::Cors;
use actix_web::web;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

/// Open cross-origin policy for a locally served dashboard: any origin is echoed back, with any
/// method, any header and credentials.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
        .max_age(3600)
}

/// Register the JSON API and its documentation. Handlers expect `web::Data<Watchlist>` and
/// `web::Data<dyn MarketData>` to be present in app data.
pub fn routes(cfg: &mut web::ServiceConfig) {
    use api::*;

    cfg
        // api endpoints
        .service(stock::stocks)
        .service(stock::history)
        .service(stock::quote)
        // api documentation
        .service(openapi_json)
        .service(Redoc::with_url("/redoc", ApiDoc::openapi()));
}
