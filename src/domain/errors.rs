use thiserror::Error;

use super::models::ItemId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("Invalid price: {0}")]
    InvalidPrice(String),
    #[error("Invalid quantity: {0} (must be at least 1)")]
    InvalidQuantity(u32),
    #[error("Menu item {0} has an empty name")]
    EmptyItemName(ItemId),
    #[error("Duplicate menu item id: {0}")]
    DuplicateItem(ItemId),
}

pub type DomainResult<T> = Result<T, DomainError>;
