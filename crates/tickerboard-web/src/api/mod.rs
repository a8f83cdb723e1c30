pub mod stock;

use crate::model::{ErrorBody, PriceHistory, StockQuote};
use actix_web::{get, HttpResponse, Responder};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(stock::stocks, stock::quote, stock::history),
    components(schemas(StockQuote, PriceHistory, ErrorBody))
)]
pub struct ApiDoc;

#[get("/api/openapi.json")]
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
