use serde::Serialize;

use crate::domain::category::{CategoryNode, CategorySummary};
use crate::domain::category_tree::{CategoryIndex, ROOT_LABEL};
use crate::repository::{CategoryReader, ProductReader};
use crate::services::{ServiceError, ServiceResult};

/// Category hierarchy returned to navigation menus.
#[derive(Debug, Serialize)]
pub struct CategoryTreeData {
    /// Root categories with their nested children.
    pub tree: Vec<CategoryNode>,
}

/// Loads every category as a forest with full paths attached.
pub fn load_category_tree<R>(repo: &R) -> ServiceResult<CategoryTreeData>
where
    R: CategoryReader + ?Sized,
{
    let flat = repo.list_categories().map_err(ServiceError::from)?;

    if flat.is_empty() {
        return Ok(CategoryTreeData { tree: Vec::new() });
    }

    let tree = CategoryIndex::new(&flat).build_tree()?;

    Ok(CategoryTreeData { tree })
}

/// Loads the flat category listing ordered by full path.
///
/// Each entry counts the products filed directly under the category or one
/// of its immediate children.
pub fn load_category_listing<R>(repo: &R) -> ServiceResult<Vec<CategorySummary>>
where
    R: CategoryReader + ProductReader + ?Sized,
{
    let flat = repo.list_categories().map_err(ServiceError::from)?;
    if flat.is_empty() {
        return Ok(Vec::new());
    }

    let counts = repo
        .count_products_by_category()
        .map_err(ServiceError::from)?;

    let index = CategoryIndex::new(&flat);
    let paths = index.full_paths()?;

    let mut listing: Vec<CategorySummary> = flat
        .iter()
        .map(|category| {
            let own = counts.get(&category.id).copied().unwrap_or(0);
            let nested: usize = index
                .children_of(category.id)
                .iter()
                .map(|child| counts.get(&child.id).copied().unwrap_or(0))
                .sum();

            let parent_path = index
                .parent_of(category.id)
                .and_then(|parent| paths.get(&parent.id).cloned())
                .unwrap_or_else(|| ROOT_LABEL.to_string());

            CategorySummary {
                category: category.clone(),
                full_path: paths.get(&category.id).cloned().unwrap_or_default(),
                parent_path,
                product_count: own + nested,
            }
        })
        .collect();

    listing.sort_by(|a, b| a.full_path.cmp(&b.full_path));

    Ok(listing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use chrono::{NaiveDate, NaiveDateTime};
    use pushkind_common::repository::errors::RepositoryResult;

    use crate::domain::category::Category;
    use crate::domain::product::{Product, ProductListQuery};
    use crate::repository::mock::{MockCategoryReader, MockProductReader};

    fn fixed_datetime() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .unwrap_or_default()
    }

    fn sample_category(id: i32, parent_id: Option<i32>, name: &str) -> Category {
        Category {
            id,
            parent_id,
            name: name.to_string(),
            description: None,
            created_at: fixed_datetime(),
            updated_at: fixed_datetime(),
        }
    }

    struct FakeRepo {
        category_reader: MockCategoryReader,
        product_reader: MockProductReader,
    }

    impl FakeRepo {
        fn new() -> Self {
            Self {
                category_reader: MockCategoryReader::new(),
                product_reader: MockProductReader::new(),
            }
        }
    }

    impl CategoryReader for FakeRepo {
        fn list_categories(&self) -> RepositoryResult<Vec<Category>> {
            self.category_reader.list_categories()
        }

        fn get_category_by_id(&self, category_id: i32) -> RepositoryResult<Option<Category>> {
            self.category_reader.get_category_by_id(category_id)
        }
    }

    impl ProductReader for FakeRepo {
        fn get_product_by_id(&self, product_id: i32) -> RepositoryResult<Option<Product>> {
            self.product_reader.get_product_by_id(product_id)
        }

        fn list_products(
            &self,
            query: ProductListQuery,
        ) -> RepositoryResult<(usize, Vec<Product>)> {
            self.product_reader.list_products(query)
        }

        fn count_products_by_category(&self) -> RepositoryResult<HashMap<i32, usize>> {
            self.product_reader.count_products_by_category()
        }

        fn max_product_price(&self) -> RepositoryResult<Option<i64>> {
            self.product_reader.max_product_price()
        }
    }

    fn shop_categories() -> Vec<Category> {
        vec![
            sample_category(1, None, "Shoes"),
            sample_category(2, Some(1), "Sneakers"),
            sample_category(3, Some(1), "Boots"),
            sample_category(4, Some(3), "Winter"),
            sample_category(5, None, "Accessories"),
        ]
    }

    #[test]
    fn load_category_tree_returns_nested_nodes() {
        let mut repo = FakeRepo::new();
        repo.category_reader
            .expect_list_categories()
            .times(1)
            .returning(|| Ok(shop_categories()));

        let data = load_category_tree(&repo).expect("tree");

        assert_eq!(data.tree.len(), 2);
        assert_eq!(data.tree[0].full_path, "root/Accessories");
        let shoes = &data.tree[1];
        assert_eq!(shoes.full_path, "root/Shoes");
        assert_eq!(shoes.children.len(), 2);
        assert_eq!(shoes.children[0].children[0].full_path, "root/Shoes/Boots/Winter");
    }

    #[test]
    fn load_category_tree_handles_empty_store() {
        let mut repo = FakeRepo::new();
        repo.category_reader
            .expect_list_categories()
            .times(1)
            .returning(|| Ok(Vec::new()));

        let data = load_category_tree(&repo).expect("tree");
        assert!(data.tree.is_empty());
    }

    #[test]
    fn load_category_tree_reports_cycles() {
        let mut repo = FakeRepo::new();
        repo.category_reader.expect_list_categories().returning(|| {
            Ok(vec![
                sample_category(1, Some(2), "A"),
                sample_category(2, Some(1), "B"),
            ])
        });

        assert!(matches!(
            load_category_tree(&repo),
            Err(ServiceError::CycleDetected { .. })
        ));
    }

    #[test]
    fn load_category_listing_counts_immediate_children() {
        let mut repo = FakeRepo::new();
        repo.category_reader
            .expect_list_categories()
            .times(1)
            .returning(|| Ok(shop_categories()));
        repo.product_reader
            .expect_count_products_by_category()
            .times(1)
            .returning(|| Ok(HashMap::from([(1, 1), (2, 4), (3, 2), (4, 7)])));

        let listing = load_category_listing(&repo).expect("listing");

        let rows: Vec<(&str, &str, usize)> = listing
            .iter()
            .map(|entry| {
                (
                    entry.full_path.as_str(),
                    entry.parent_path.as_str(),
                    entry.product_count,
                )
            })
            .collect();

        assert_eq!(
            rows,
            vec![
                ("root/Accessories", "root", 0),
                ("root/Shoes", "root", 7),
                ("root/Shoes/Boots", "root/Shoes", 9),
                ("root/Shoes/Boots/Winter", "root/Shoes/Boots", 7),
                ("root/Shoes/Sneakers", "root/Shoes", 4),
            ]
        );
    }
}
