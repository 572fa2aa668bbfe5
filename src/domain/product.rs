use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::pagination::DEFAULT_PAGE_LIMIT;

/// Domain representation of a product listed in the catalog.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Product {
    /// Unique identifier of the product.
    pub id: i32,
    /// Category the product is filed under.
    pub category_id: i32,
    /// Human-readable name of the product.
    pub name: String,
    /// Longer description shown to users.
    pub description: String,
    /// Price represented in the smallest currency unit (for example cents).
    pub price_cents: i64,
    /// Units available in stock.
    pub stock: i32,
    /// Image references in display order.
    pub images: Vec<String>,
    /// Timestamp for when the product record was created.
    pub created_at: NaiveDateTime,
    /// Timestamp for the last update to the product record.
    pub updated_at: NaiveDateTime,
}

/// Payload required to insert a new product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Category the product is filed under.
    pub category_id: i32,
    /// Human-readable name of the product.
    pub name: String,
    /// Longer description shown to users.
    pub description: String,
    /// Price represented in the smallest currency unit (for example cents).
    pub price_cents: i64,
    /// Units available in stock.
    pub stock: i32,
    /// Image references in display order.
    pub images: Vec<String>,
    /// Timestamp captured when the product payload was created.
    pub updated_at: NaiveDateTime,
}

impl NewProduct {
    /// Build a new product payload with the supplied details and current timestamp.
    pub fn new(category_id: i32, name: impl Into<String>, price_cents: i64) -> Self {
        Self {
            category_id,
            name: name.into(),
            description: String::new(),
            price_cents,
            stock: 0,
            images: Vec::new(),
            updated_at: chrono::Local::now().naive_utc(),
        }
    }

    /// Attach a descriptive text to the product payload.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the number of units in stock.
    pub fn with_stock(mut self, stock: i32) -> Self {
        self.stock = stock;
        self
    }

    /// Attach image references, keeping their order.
    pub fn with_images<I, S>(mut self, images: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.images = images.into_iter().map(Into::into).collect();
        self
    }
}

/// Constraints applied by the catalog query executor.
///
/// Absent fields place no constraint on the result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    /// Case-insensitive substring matched against the product name.
    pub keyword: Option<String>,
    /// Product must be filed under one of these categories.
    pub category_ids: Option<BTreeSet<i32>>,
    /// Products that must never be returned.
    pub exclude_ids: BTreeSet<i32>,
    /// Inclusive lower price bound.
    pub min_price_cents: Option<i64>,
    /// Inclusive upper price bound.
    pub max_price_cents: Option<i64>,
}

impl ProductFilter {
    /// Filter by a keyword applied to the product name.
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    /// Restrict results to the given categories.
    pub fn in_categories(mut self, ids: impl IntoIterator<Item = i32>) -> Self {
        self.category_ids = Some(ids.into_iter().collect());
        self
    }

    /// Exclude a single product from the results.
    pub fn exclude(mut self, product_id: i32) -> Self {
        self.exclude_ids.insert(product_id);
        self
    }

    /// Require a price of at least `price_cents`.
    pub fn min_price(mut self, price_cents: i64) -> Self {
        self.min_price_cents = Some(price_cents);
        self
    }

    /// Require a price of at most `price_cents`.
    pub fn max_price(mut self, price_cents: i64) -> Self {
        self.max_price_cents = Some(price_cents);
        self
    }

    /// True when the category constraint can never be satisfied.
    pub fn matches_nothing(&self) -> bool {
        self.category_ids.as_ref().is_some_and(BTreeSet::is_empty)
    }
}

/// Ordering applied to catalog queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortSpec {
    /// Insertion order (product id ascending).
    #[default]
    None,
    /// Cheapest first.
    PriceAscending,
    /// Most expensive first.
    PriceDescending,
}

/// Error returned when a sort key is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized sort order `{0}`")]
pub struct UnknownSortOrder(pub String);

impl FromStr for SortSpec {
    type Err = UnknownSortOrder;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(SortSpec::None),
            "low-to-high" | "price_asc" => Ok(SortSpec::PriceAscending),
            "high-to-low" | "price_desc" => Ok(SortSpec::PriceDescending),
            other => Err(UnknownSortOrder(other.to_string())),
        }
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SortSpec::None => "none",
            SortSpec::PriceAscending => "low-to-high",
            SortSpec::PriceDescending => "high-to-low",
        };
        f.write_str(label)
    }
}

/// A single filtered, sorted and windowed product query.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductListQuery {
    /// Constraints applied to the product collection.
    pub filter: ProductFilter,
    /// Ordering of the matches.
    pub sort: SortSpec,
    /// Number of matches to skip before the window starts.
    pub skip: usize,
    /// Maximum number of matches in the window; `0` only counts.
    pub limit: usize,
}

impl ProductListQuery {
    /// Construct a query over `filter` returning the first page.
    pub fn new(filter: ProductFilter) -> Self {
        Self {
            filter,
            sort: SortSpec::None,
            skip: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }

    /// Apply an ordering to the query.
    pub fn sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    /// Window the matches with an explicit skip and limit.
    pub fn window(mut self, skip: usize, limit: usize) -> Self {
        self.skip = skip;
        self.limit = limit;
        self
    }
}
