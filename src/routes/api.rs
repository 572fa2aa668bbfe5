use actix_web::{HttpResponse, Responder, get, web};
use serde_json::json;

use crate::config::CatalogConfig;
use crate::forms::catalog::{CatalogQueryForm, RelatedProductsForm};
use crate::repository::DieselRepository;
use crate::services::{
    ServiceError, catalog as catalog_service, categories as categories_service,
    related as related_service,
};

/// Map a service failure onto an HTTP response with a JSON error body.
fn error_response(err: ServiceError, context: &str) -> HttpResponse {
    match err {
        ServiceError::InvalidArgument(message) => {
            HttpResponse::BadRequest().json(json!({ "error": message }))
        }
        ServiceError::NotFound => HttpResponse::NotFound().json(json!({ "error": "not found" })),
        err @ ServiceError::CycleDetected { .. } => {
            log::error!("{context}: {err}");
            HttpResponse::InternalServerError().json(json!({ "error": "invalid category graph" }))
        }
        err @ ServiceError::StoreUnavailable(_) => {
            log::error!("{context}: {err}");
            HttpResponse::ServiceUnavailable().json(json!({ "error": "store unavailable" }))
        }
    }
}

#[get("/v1/products")]
/// Return one page of the catalog filtered by keyword, category and price.
pub async fn api_v1_products(
    params: web::Query<CatalogQueryForm>,
    repo: web::Data<DieselRepository>,
    config: web::Data<CatalogConfig>,
) -> impl Responder {
    match catalog_service::load_catalog_page(repo.get_ref(), params.into_inner(), &config) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(err, "Failed to list products"),
    }
}

#[get("/v1/products/related")]
/// Return one page of products related to `product_id`.
pub async fn api_v1_related_products(
    params: web::Query<RelatedProductsForm>,
    repo: web::Data<DieselRepository>,
    config: web::Data<CatalogConfig>,
) -> impl Responder {
    match related_service::load_related_products(repo.get_ref(), params.into_inner(), &config) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => error_response(err, "Failed to load related products"),
    }
}

#[get("/v1/products/price-ceiling")]
/// Return the highest product price in the catalog.
pub async fn api_v1_price_ceiling(repo: web::Data<DieselRepository>) -> impl Responder {
    match catalog_service::load_price_ceiling(repo.get_ref()) {
        Ok(price_cents) => HttpResponse::Ok().json(json!({ "price_cents": price_cents })),
        Err(err) => error_response(err, "Failed to load price ceiling"),
    }
}

#[get("/v1/products/{product_id}")]
pub async fn api_v1_product(
    product_id: web::Path<String>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match catalog_service::load_product(repo.get_ref(), &product_id) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(err) => error_response(err, "Failed to load product"),
    }
}

#[get("/v1/categories")]
/// Return every category with its full path and product count.
pub async fn api_v1_categories(repo: web::Data<DieselRepository>) -> impl Responder {
    match categories_service::load_category_listing(repo.get_ref()) {
        Ok(listing) => HttpResponse::Ok().json(listing),
        Err(err) => error_response(err, "Failed to list categories"),
    }
}

#[get("/v1/categories/tree")]
pub async fn api_v1_category_tree(repo: web::Data<DieselRepository>) -> impl Responder {
    match categories_service::load_category_tree(repo.get_ref()) {
        Ok(data) => HttpResponse::Ok().json(data.tree),
        Err(err) => error_response(err, "Failed to load category tree"),
    }
}
