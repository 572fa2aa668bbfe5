use std::collections::HashSet;

use pushkind_catalog::config::CatalogConfig;
use pushkind_catalog::domain::pagination::PageRequest;
use pushkind_catalog::forms::catalog::RelatedProductsForm;
use pushkind_catalog::services::ServiceError;
use pushkind_catalog::services::related::{find_related_products, load_related_products};

mod common;

#[test]
fn test_related_products_fill_one_page_from_sibling_category() {
    let test_db = common::TestDb::new("test_related_products_fill_one_page.db");
    let repo = test_db.repository();
    let shop = common::ShoeShop::new(&repo);

    let anchor = common::product(&repo, shop.sneakers.id, "Anchor", 10_000);
    for n in 0..2 {
        common::product(&repo, shop.sneakers.id, &format!("Sneaker {n}"), 9_000);
    }
    for n in 0..5 {
        common::product(&repo, shop.boots.id, &format!("Boot {n}"), 15_000);
    }

    let form = RelatedProductsForm {
        product_id: anchor.id.to_string(),
        page: Some(1),
        limit: Some(8),
    };
    let page = load_related_products(&repo, form, &CatalogConfig::default()).unwrap();

    assert_eq!(page.items.len(), 7);
    assert!(page.items.iter().all(|p| p.id != anchor.id));
    assert!(page.items[..2].iter().all(|p| p.category_id == shop.sneakers.id));
    assert!(page.items[2..].iter().all(|p| p.category_id == shop.boots.id));
    assert_eq!(page.pagination.total_count, 7);
    assert!(!page.pagination.has_next_page);
}

#[test]
fn test_related_products_pages_do_not_overlap() {
    let test_db = common::TestDb::new("test_related_products_pages_do_not_overlap.db");
    let repo = test_db.repository();
    let shop = common::ShoeShop::new(&repo);

    let anchor = common::product(&repo, shop.sneakers.id, "Anchor", 10_000);
    for n in 0..10 {
        common::product(&repo, shop.sneakers.id, &format!("Sneaker {n}"), 9_000);
    }
    for n in 0..6 {
        common::product(&repo, shop.boots.id, &format!("Boot {n}"), 15_000);
    }
    common::product(&repo, shop.shoes.id, "Shoe care kit", 2_000);

    let first = find_related_products(&repo, anchor.id, PageRequest::new(1, 8)).unwrap();
    let second = find_related_products(&repo, anchor.id, PageRequest::new(2, 8)).unwrap();
    let third = find_related_products(&repo, anchor.id, PageRequest::new(3, 8)).unwrap();

    assert_eq!(first.items.len(), 8);
    assert!(first.items.iter().all(|p| p.category_id == shop.sneakers.id));

    let sneakers_on_second = second
        .items
        .iter()
        .filter(|p| p.category_id == shop.sneakers.id)
        .count();
    let boots_on_second = second
        .items
        .iter()
        .filter(|p| p.category_id == shop.boots.id)
        .count();
    assert_eq!((sneakers_on_second, boots_on_second), (2, 6));

    assert_eq!(third.items.len(), 1);
    assert_eq!(third.items[0].category_id, shop.shoes.id);

    let mut seen = HashSet::new();
    for item in first.items.iter().chain(&second.items).chain(&third.items) {
        assert!(seen.insert(item.id), "product {} repeated", item.id);
    }
    assert!(!seen.contains(&anchor.id));

    assert_eq!(first.pagination.total_count, 17);
    assert_eq!(seen.len(), first.pagination.total_count);
    assert_eq!(first.pagination.total_pages, 3);
    assert!(first.pagination.has_next_page);
    assert!(!third.pagination.has_next_page);
}

#[test]
fn test_related_products_include_child_categories() {
    let test_db = common::TestDb::new("test_related_products_include_child_categories.db");
    let repo = test_db.repository();
    let shop = common::ShoeShop::new(&repo);
    let high_tops = common::category(&repo, "High-tops", Some(shop.sneakers.id));
    let minis = common::category(&repo, "Mini", Some(high_tops.id));

    let anchor = common::product(&repo, shop.sneakers.id, "Anchor", 10_000);
    let child = common::product(&repo, high_tops.id, "High-top", 11_000);
    // Grandchildren are not part of the related set.
    common::product(&repo, minis.id, "Mini high-top", 5_000);
    let boot = common::product(&repo, shop.boots.id, "Boot", 15_000);

    let page = find_related_products(&repo, anchor.id, PageRequest::new(1, 8)).unwrap();

    let ids: Vec<i32> = page.items.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![child.id, boot.id]);
    assert_eq!(page.pagination.total_count, 2);
}

#[test]
fn test_related_products_unknown_product() {
    let test_db = common::TestDb::new("test_related_products_unknown_product.db");
    let repo = test_db.repository();
    common::ShoeShop::new(&repo);

    let result = find_related_products(&repo, 4242, PageRequest::default());
    assert!(matches!(result, Err(ServiceError::NotFound)));
}
