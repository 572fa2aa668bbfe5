use std::env;

use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;
use pushkind_common::db::establish_connection_pool;

use pushkind_catalog::config::CatalogConfig;
use pushkind_catalog::repository::DieselRepository;
use pushkind_catalog::routes::api::{
    api_v1_categories, api_v1_category_tree, api_v1_price_ceiling, api_v1_product,
    api_v1_products, api_v1_related_products,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let database_url = env::var("DATABASE_URL").unwrap_or("app.db".to_string());
    let port = env::var("PORT").unwrap_or("8080".to_string());
    let port = port.parse::<u16>().unwrap_or(8080);
    let address = env::var("ADDRESS").unwrap_or("127.0.0.1".to_string());

    let catalog_config = CatalogConfig::from_env();
    log::info!(
        "Catalog paging: default limit {}, max limit {}",
        catalog_config.default_limit,
        catalog_config.max_limit
    );

    let pool = match establish_connection_pool(&database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(
                web::scope("/api")
                    // Literal product paths go before `{product_id}`.
                    .service(api_v1_related_products)
                    .service(api_v1_price_ceiling)
                    .service(api_v1_product)
                    .service(api_v1_products)
                    .service(api_v1_category_tree)
                    .service(api_v1_categories),
            )
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(catalog_config))
    })
    .bind((address, port))?
    .run()
    .await
}
