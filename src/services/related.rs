//! Related products for a product detail page.
//!
//! Candidates are gathered from a fixed sequence of category tiers: the
//! product's own category, each of its immediate children, each sibling
//! category and finally the parent category itself. A page of results is
//! filled tier by tier, and the number of matches still to be skipped is
//! carried from one tier to the next so consecutive pages never overlap.

use std::collections::BTreeSet;
use std::fmt;

use crate::config::CatalogConfig;
use crate::domain::category_tree::{CategoryGraphError, CategoryIndex};
use crate::domain::pagination::{PageRequest, PagedResult, paginate};
use crate::domain::product::{Product, ProductFilter, ProductListQuery};
use crate::forms::catalog::RelatedProductsForm;
use crate::repository::{CategoryReader, ProductReader};
use crate::services::{ServiceError, ServiceResult};

/// Position of a tier in the related products priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierKind {
    SelfCategory,
    Children,
    Siblings,
    Ancestor,
}

impl fmt::Display for TierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TierKind::SelfCategory => "self",
            TierKind::Children => "children",
            TierKind::Siblings => "siblings",
            TierKind::Ancestor => "ancestor",
        };
        f.write_str(label)
    }
}

/// One executor call of the related products plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTier {
    pub kind: TierKind,
    /// Categories whose products belong to this step.
    pub category_ids: BTreeSet<i32>,
}

impl QueryTier {
    fn single(kind: TierKind, category_id: i32) -> Self {
        Self {
            kind,
            category_ids: BTreeSet::from([category_id]),
        }
    }
}

/// Build the ordered steps for a product filed under `category_id`.
///
/// Children and siblings each get their own step, ordered by name. The
/// sibling and ancestor tiers are only planned when the parent category
/// exists.
pub fn plan_tiers(
    index: &CategoryIndex<'_>,
    category_id: i32,
) -> Result<Vec<QueryTier>, CategoryGraphError> {
    let parent = index.parent_of(category_id);

    // Every planned category lives under the parent (or the category itself
    // for roots). Walking that subtree rejects graphs where two steps would
    // name the same category.
    index.descendants(parent.map_or(category_id, |parent| parent.id))?;

    let mut tiers = vec![QueryTier::single(TierKind::SelfCategory, category_id)];

    tiers.extend(
        index
            .children_of(category_id)
            .iter()
            .map(|child| QueryTier::single(TierKind::Children, child.id)),
    );

    if let Some(parent) = parent {
        tiers.extend(
            index
                .siblings_of(category_id)
                .into_iter()
                .map(|sibling| QueryTier::single(TierKind::Siblings, sibling.id)),
        );
        tiers.push(QueryTier::single(TierKind::Ancestor, parent.id));
    }

    Ok(tiers)
}

/// Accumulator threaded through the tier steps.
#[derive(Debug, Clone, PartialEq)]
pub struct QuotaState {
    /// Matches that still precede the requested page.
    pub remaining_skip: usize,
    /// Page size.
    pub quota: usize,
    /// Items collected for the page so far.
    pub collected: Vec<Product>,
    /// Full match count of every executed step.
    pub tier_totals: Vec<usize>,
}

impl QuotaState {
    pub fn new(page: PageRequest) -> Self {
        Self {
            remaining_skip: page.skip(),
            quota: page.limit,
            collected: Vec::with_capacity(page.limit.min(64)),
            tier_totals: Vec::new(),
        }
    }

    /// Items still needed to fill the page.
    pub fn outstanding(&self) -> usize {
        self.quota.saturating_sub(self.collected.len())
    }

    /// Sum of the match counts of every step so far.
    pub fn total_count(&self) -> usize {
        self.tier_totals.iter().sum()
    }

    /// Run one step against the executor.
    ///
    /// Once the page is full the step is still counted, with a zero limit,
    /// so the pagination total covers every tier.
    pub fn advance<R>(mut self, repo: &R, tier: &QueryTier, anchor_id: i32) -> ServiceResult<Self>
    where
        R: ProductReader + ?Sized,
    {
        if tier.category_ids.is_empty() {
            self.tier_totals.push(0);
            return Ok(self);
        }

        let take = self.outstanding();
        let filter = ProductFilter::default()
            .in_categories(tier.category_ids.iter().copied())
            .exclude(anchor_id);
        let query = ProductListQuery::new(filter).window(self.remaining_skip, take);

        let (matched, items) = repo.list_products(query).map_err(ServiceError::from)?;

        log::debug!(
            "related tier {} {:?}: skip {} take {} matched {} returned {}",
            tier.kind,
            tier.category_ids,
            self.remaining_skip,
            take,
            matched,
            items.len()
        );

        self.remaining_skip = self.remaining_skip.saturating_sub(matched);
        self.collected.extend(items.into_iter().take(take));
        self.tier_totals.push(matched);

        Ok(self)
    }
}

/// Fetch one page of products related to `product_id`.
///
/// Tiers after the page is full are still counted, so the pagination total
/// covers every tier.
pub fn find_related_products<R>(
    repo: &R,
    product_id: i32,
    page: PageRequest,
) -> ServiceResult<PagedResult<Product>>
where
    R: ProductReader + CategoryReader + ?Sized,
{
    let anchor = repo
        .get_product_by_id(product_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let categories = repo.list_categories().map_err(ServiceError::from)?;
    let index = CategoryIndex::new(&categories);
    let tiers = plan_tiers(&index, anchor.category_id)?;

    let mut state = QuotaState::new(page);
    for tier in &tiers {
        state = state.advance(repo, tier, anchor.id)?;
    }

    let pagination = paginate(state.total_count(), page.limit, page.page);
    Ok(PagedResult::new(state.collected, pagination))
}

/// Validates the related products query and loads the requested page.
pub fn load_related_products<R>(
    repo: &R,
    form: RelatedProductsForm,
    config: &CatalogConfig,
) -> ServiceResult<PagedResult<Product>>
where
    R: ProductReader + CategoryReader + ?Sized,
{
    let request = form.into_request(config)?;
    find_related_products(repo, request.product_id, request.page)
}
