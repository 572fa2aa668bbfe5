use std::collections::HashMap;

use diesel::dsl::{count_star, max};
use diesel::prelude::*;
use diesel::sqlite::{Sqlite, SqliteConnection};
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::{
    domain::product::{
        NewProduct as DomainNewProduct, Product as DomainProduct, ProductFilter,
        ProductListQuery, SortSpec,
    },
    models::product::{
        NewProduct as DbNewProduct, NewProductImage as DbNewProductImage, Product as DbProduct,
        ProductImage as DbProductImage,
    },
    repository::{DieselRepository, ProductReader, ProductWriter},
    schema::{product_images, products},
};

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, product_id: i32) -> RepositoryResult<Option<DomainProduct>> {
        let mut conn = self.conn()?;
        let product = products::table
            .filter(products::id.eq(product_id))
            .first::<DbProduct>(&mut conn)
            .optional()?;

        if let Some(db_product) = product {
            let images = DbProductImage::belonging_to(&db_product)
                .order(product_images::position.asc())
                .load::<DbProductImage>(&mut conn)?;

            let mut domain: DomainProduct = db_product.into();
            domain.images = images.into_iter().map(|image| image.url).collect();
            Ok(Some(domain))
        } else {
            Ok(None)
        }
    }

    fn list_products(
        &self,
        query: ProductListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainProduct>)> {
        if query.filter.matches_nothing() {
            return Ok((0, Vec::new()));
        }

        let mut conn = self.conn()?;

        let total = filtered_products(&query.filter)
            .count()
            .get_result::<i64>(&mut conn)? as usize;

        if query.limit == 0 || query.skip >= total {
            return Ok((total, Vec::new()));
        }

        let mut items = filtered_products(&query.filter);

        items = match query.sort {
            SortSpec::None => items.order(products::id.asc()),
            SortSpec::PriceAscending => {
                items.order((products::price_cents.asc(), products::id.asc()))
            }
            SortSpec::PriceDescending => {
                items.order((products::price_cents.desc(), products::id.asc()))
            }
        };

        let offset = i64::try_from(query.skip).unwrap_or(i64::MAX);
        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);
        let db_products = items.offset(offset).limit(limit).load::<DbProduct>(&mut conn)?;

        let images = load_images_for_products(&mut conn, &db_products)?;

        let domain_products: Vec<DomainProduct> = db_products
            .into_iter()
            .zip(images)
            .map(|(db_product, images)| {
                let mut domain: DomainProduct = db_product.into();
                domain.images = images;
                domain
            })
            .collect();

        Ok((total, domain_products))
    }

    fn count_products_by_category(&self) -> RepositoryResult<HashMap<i32, usize>> {
        let mut conn = self.conn()?;

        let rows = products::table
            .group_by(products::category_id)
            .select((products::category_id, count_star()))
            .load::<(i32, i64)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(category_id, count)| (category_id, count as usize))
            .collect())
    }

    fn max_product_price(&self) -> RepositoryResult<Option<i64>> {
        let mut conn = self.conn()?;

        let price = products::table
            .select(max(products::price_cents))
            .get_result::<Option<i64>>(&mut conn)?;

        Ok(price)
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, new_product: &DomainNewProduct) -> RepositoryResult<DomainProduct> {
        let mut conn = self.conn()?;

        conn.transaction::<DomainProduct, RepositoryError, _>(|conn| {
            let created = diesel::insert_into(products::table)
                .values(&DbNewProduct::from(new_product))
                .get_result::<DbProduct>(conn)?;

            if !new_product.images.is_empty() {
                let rows: Vec<DbNewProductImage> = new_product
                    .images
                    .iter()
                    .enumerate()
                    .map(|(position, url)| DbNewProductImage {
                        product_id: created.id,
                        position: i32::try_from(position).unwrap_or(i32::MAX),
                        url: url.as_str(),
                    })
                    .collect();

                diesel::insert_into(product_images::table)
                    .values(&rows)
                    .execute(conn)?;
            }

            let mut domain: DomainProduct = created.into();
            domain.images = new_product.images.clone();
            Ok(domain)
        })
    }
}

/// Products matching `filter`, unordered and unwindowed.
fn filtered_products(filter: &ProductFilter) -> products::BoxedQuery<'static, Sqlite> {
    let mut query = products::table.into_boxed::<Sqlite>();

    // SQLite folds only ASCII in `LIKE`, so match the stored lowercase name.
    if let Some(keyword) = filter.keyword.as_ref() {
        let pattern = format!("%{}%", escape_like(&keyword.to_lowercase()));
        query = query.filter(products::search_name.like(pattern).escape('\\'));
    }

    if let Some(category_ids) = filter.category_ids.as_ref() {
        let ids: Vec<i32> = category_ids.iter().copied().collect();
        query = query.filter(products::category_id.eq_any(ids));
    }

    if !filter.exclude_ids.is_empty() {
        let ids: Vec<i32> = filter.exclude_ids.iter().copied().collect();
        query = query.filter(products::id.ne_all(ids));
    }

    if let Some(min_price) = filter.min_price_cents {
        query = query.filter(products::price_cents.ge(min_price));
    }

    if let Some(max_price) = filter.max_price_cents {
        query = query.filter(products::price_cents.le(max_price));
    }

    query
}

/// Escape the `LIKE` wildcards so the keyword matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Image urls of every product in `db_products`, in the same order.
fn load_images_for_products(
    conn: &mut SqliteConnection,
    db_products: &[DbProduct],
) -> RepositoryResult<Vec<Vec<String>>> {
    if db_products.is_empty() {
        return Ok(Vec::new());
    }

    let rows = DbProductImage::belonging_to(db_products)
        .order((product_images::product_id.asc(), product_images::position.asc()))
        .load::<DbProductImage>(conn)?;

    Ok(rows
        .grouped_by(db_products)
        .into_iter()
        .map(|images| images.into_iter().map(|image| image.url).collect())
        .collect())
}
