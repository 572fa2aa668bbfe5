use pushkind_common::repository::errors::RepositoryError;
use thiserror::Error;

use crate::domain::category_tree::CategoryGraphError;
use crate::forms::catalog::CatalogFormError;

pub mod catalog;
pub mod categories;
pub mod related;

/// Errors surfaced by the catalog query services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was rejected before reaching the store.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The requested product or category does not exist.
    #[error("not found")]
    NotFound,
    /// The category parent references loop back on themselves.
    #[error("category graph contains a cycle through category {category_id}")]
    CycleDetected { category_id: i32 },
    /// The backing store failed.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::StoreUnavailable(other.to_string()),
        }
    }
}

impl From<CategoryGraphError> for ServiceError {
    fn from(err: CategoryGraphError) -> Self {
        match err {
            CategoryGraphError::CycleDetected { category_id } => {
                ServiceError::CycleDetected { category_id }
            }
        }
    }
}

impl From<CatalogFormError> for ServiceError {
    fn from(err: CatalogFormError) -> Self {
        ServiceError::InvalidArgument(err.to_string())
    }
}
