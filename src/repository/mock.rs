use std::collections::HashMap;

use mockall::mock;

use super::{CategoryReader, ProductReader};
use crate::domain::{
    category::Category,
    product::{Product, ProductListQuery},
};
use pushkind_common::repository::errors::RepositoryResult;

mock! {
    pub CategoryReader {}

    impl CategoryReader for CategoryReader {
        fn list_categories(&self) -> RepositoryResult<Vec<Category>>;
        fn get_category_by_id(&self, category_id: i32) -> RepositoryResult<Option<Category>>;
    }
}

mock! {
    pub ProductReader {}

    impl ProductReader for ProductReader {
        fn get_product_by_id(&self, product_id: i32) -> RepositoryResult<Option<Product>>;
        fn list_products(&self, query: ProductListQuery) -> RepositoryResult<(usize, Vec<Product>)>;
        fn count_products_by_category(&self) -> RepositoryResult<HashMap<i32, usize>>;
        fn max_product_price(&self) -> RepositoryResult<Option<i64>>;
    }
}
