use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::config::CatalogConfig;
use crate::domain::pagination::PageRequest;
use crate::domain::product::{ProductFilter, SortSpec, UnknownSortOrder};

/// Maximum length allowed for a search keyword.
const KEYWORD_MAX_LEN: usize = 128;
const KEYWORD_MAX_LEN_VALIDATOR: u64 = KEYWORD_MAX_LEN as u64;

/// Result type returned by the catalog form helpers.
pub type CatalogFormResult<T> = Result<T, CatalogFormError>;

/// Errors that can occur while processing catalog query parameters.
#[derive(Debug, Error)]
pub enum CatalogFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// Supplied identifier field could not be parsed.
    #[error("invalid {field} `{value}`")]
    InvalidIdentifier { field: &'static str, value: String },
    /// Supplied price is not a non-negative decimal with at most two places.
    #[error("invalid {field} `{value}`")]
    InvalidPrice { field: &'static str, value: String },
    /// The lower price bound is above the upper one.
    #[error("min_price must not exceed max_price")]
    InvertedPriceRange,
    /// The requested page size is above the configured maximum.
    #[error("limit {limit} exceeds the maximum of {max}")]
    LimitTooLarge { limit: usize, max: usize },
    /// The sort key is not one of the supported orders.
    #[error(transparent)]
    UnknownSortOrder(#[from] UnknownSortOrder),
}

/// Query string accepted by the catalog listing endpoint.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CatalogQueryForm {
    /// Case-insensitive search applied to product names.
    #[validate(length(max = KEYWORD_MAX_LEN_VALIDATOR))]
    pub keyword: Option<String>,
    /// Category identifier; its whole subtree is searched.
    pub category: Option<String>,
    /// Inclusive lower price bound as a decimal string.
    pub min_price: Option<String>,
    /// Inclusive upper price bound as a decimal string.
    pub max_price: Option<String>,
    /// `low-to-high`, `high-to-low` or empty.
    pub sort_order: Option<String>,
    /// Page requested by the UI (1-based).
    #[validate(range(min = 1))]
    pub page: Option<i64>,
    /// Page size.
    #[validate(range(min = 0))]
    pub limit: Option<i64>,
}

/// Validated catalog listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRequest {
    /// Keyword and price constraints. The category constraint is resolved
    /// against the category tree by the service.
    pub filter: ProductFilter,
    /// Category whose subtree should be searched.
    pub category_id: Option<i32>,
    pub sort: SortSpec,
    pub page: PageRequest,
}

impl CatalogQueryForm {
    /// Validates and sanitizes the query into a [`CatalogRequest`].
    pub fn into_request(self, config: &CatalogConfig) -> CatalogFormResult<CatalogRequest> {
        self.validate()?;

        let page = page_request(self.page, self.limit, config)?;
        let category_id = match self.category.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_identifier(raw, "category")?),
        };
        let sort = self.sort_order.as_deref().unwrap_or_default().parse::<SortSpec>()?;

        let min_price = parse_optional_price(self.min_price, "min_price")?;
        let max_price = parse_optional_price(self.max_price, "max_price")?;
        if let (Some(min), Some(max)) = (min_price, max_price)
            && min > max
        {
            return Err(CatalogFormError::InvertedPriceRange);
        }

        let mut filter = ProductFilter::default();
        if let Some(keyword) = self
            .keyword
            .as_deref()
            .map(sanitize_inline_text)
            .filter(|value| !value.is_empty())
        {
            filter = filter.keyword(keyword);
        }
        if let Some(min) = min_price {
            filter = filter.min_price(min);
        }
        if let Some(max) = max_price {
            filter = filter.max_price(max);
        }

        Ok(CatalogRequest {
            filter,
            category_id,
            sort,
            page,
        })
    }
}

/// Query string accepted by the related products endpoint.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct RelatedProductsForm {
    /// Identifier of the anchor product.
    #[serde(default)]
    pub product_id: String,
    /// Page requested by the UI (1-based).
    #[validate(range(min = 1))]
    pub page: Option<i64>,
    /// Page size.
    #[validate(range(min = 0))]
    pub limit: Option<i64>,
}

/// Validated related products request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelatedRequest {
    pub product_id: i32,
    pub page: PageRequest,
}

impl RelatedProductsForm {
    /// Validates the query into a [`RelatedRequest`].
    pub fn into_request(self, config: &CatalogConfig) -> CatalogFormResult<RelatedRequest> {
        self.validate()?;

        Ok(RelatedRequest {
            product_id: parse_identifier(&self.product_id, "product id")?,
            page: page_request(self.page, self.limit, config)?,
        })
    }
}

/// Parse a positive record identifier supplied by a client.
pub fn parse_identifier(raw: &str, field: &'static str) -> CatalogFormResult<i32> {
    let trimmed = raw.trim();
    match trimmed.parse::<i32>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(CatalogFormError::InvalidIdentifier {
            field,
            value: trimmed.to_string(),
        }),
    }
}

fn page_request(
    page: Option<i64>,
    limit: Option<i64>,
    config: &CatalogConfig,
) -> CatalogFormResult<PageRequest> {
    // Both values are range-checked by the validator before reaching here.
    let page = page.and_then(|p| usize::try_from(p).ok()).unwrap_or(1);
    let limit = match limit {
        Some(raw) => usize::try_from(raw).unwrap_or(usize::MAX),
        None => config.default_limit,
    };

    if limit > config.max_limit {
        return Err(CatalogFormError::LimitTooLarge {
            limit,
            max: config.max_limit,
        });
    }

    Ok(PageRequest::new(page, limit))
}

fn parse_optional_price(
    value: Option<String>,
    field: &'static str,
) -> CatalogFormResult<Option<i64>> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse_price_cents(raw)
            .map(Some)
            .ok_or_else(|| CatalogFormError::InvalidPrice {
                field,
                value: raw.to_string(),
            }),
    }
}

/// Convert a decimal such as `12.5` into the smallest currency unit (`1250`).
fn parse_price_cents(raw: &str) -> Option<i64> {
    let (whole, fraction) = raw.split_once('.').unwrap_or((raw, ""));

    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if fraction.len() > 2
        || !whole.chars().all(|ch| ch.is_ascii_digit())
        || !fraction.chars().all(|ch| ch.is_ascii_digit())
    {
        return None;
    }

    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let fraction: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().ok()? * 10,
        _ => fraction.parse().ok()?,
    };

    whole.checked_mul(100)?.checked_add(fraction)
}

fn sanitize_inline_text(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_whitespace = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !previous_whitespace {
                sanitized.push(' ');
                previous_whitespace = true;
            }
        } else if ch.is_control() {
            continue;
        } else {
            sanitized.push(ch);
            previous_whitespace = false;
        }
    }

    sanitized
}
