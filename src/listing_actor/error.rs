use thiserror::Error;

use crate::actor_framework::FrameworkError;

#[derive(Debug, Clone, Error, PartialEq)]
#[allow(dead_code)]
pub enum CatalogError {
    #[error("Listing not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    OutOfStock(String),
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),
    #[error("Listing rejected: {0}")]
    Rejected(String),
    #[error("Actor communication error: {0}")]
    ActorCommunication(String),
}

impl From<FrameworkError> for CatalogError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => CatalogError::NotFound(id),
            FrameworkError::Rejected(reason) => CatalogError::Rejected(reason),
            other => CatalogError::ActorCommunication(other.to_string()),
        }
    }
}
