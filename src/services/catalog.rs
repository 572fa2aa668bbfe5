use crate::config::CatalogConfig;
use crate::domain::category_tree::CategoryIndex;
use crate::domain::pagination::{PagedResult, paginate};
use crate::domain::product::{Product, ProductListQuery};
use crate::forms::catalog::{CatalogQueryForm, CatalogRequest, parse_identifier};
use crate::repository::{CategoryReader, ProductReader};
use crate::services::{ServiceError, ServiceResult};

/// Runs a validated catalog request.
///
/// A category constraint covers the whole subtree below the requested
/// category. The returned pagination reports the full match count, which
/// does not depend on the requested window.
pub fn get_catalog_page<R>(repo: &R, request: CatalogRequest) -> ServiceResult<PagedResult<Product>>
where
    R: ProductReader + CategoryReader + ?Sized,
{
    let CatalogRequest {
        mut filter,
        category_id,
        sort,
        page,
    } = request;

    if let Some(category_id) = category_id {
        repo.get_category_by_id(category_id)
            .map_err(ServiceError::from)?
            .ok_or(ServiceError::NotFound)?;

        let categories = repo.list_categories().map_err(ServiceError::from)?;
        let index = CategoryIndex::new(&categories);
        filter = filter.in_categories(index.descendants(category_id)?);
    }

    let query = ProductListQuery::new(filter)
        .sort(sort)
        .window(page.skip(), page.limit);

    let (total, items) = repo.list_products(query).map_err(ServiceError::from)?;

    Ok(PagedResult::new(items, paginate(total, page.limit, page.page)))
}

/// Loads the storefront catalog page described by the query string.
pub fn load_catalog_page<R>(
    repo: &R,
    form: CatalogQueryForm,
    config: &CatalogConfig,
) -> ServiceResult<PagedResult<Product>>
where
    R: ProductReader + CategoryReader + ?Sized,
{
    let request = form.into_request(config)?;
    get_catalog_page(repo, request)
}

/// Loads a single product by its raw path identifier.
pub fn load_product<R>(repo: &R, raw_id: &str) -> ServiceResult<Product>
where
    R: ProductReader + ?Sized,
{
    let product_id = parse_identifier(raw_id, "product id")?;

    repo.get_product_by_id(product_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

/// Highest price in the catalog, `0` when there are no products.
pub fn load_price_ceiling<R>(repo: &R) -> ServiceResult<i64>
where
    R: ProductReader + ?Sized,
{
    let price = repo.max_product_price().map_err(ServiceError::from)?;
    Ok(price.unwrap_or(0))
}
