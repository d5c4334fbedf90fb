//! Domain Layer - Core Entity Trait
//!
//! This trait defines the basic contract for all domain entities.
//! Entities are identified by a store-assigned key.

/// Core trait for all domain entities
pub trait Entity: Sized + Clone {
    /// The type of the entity's unique identifier
    type Id: Copy + Eq + std::hash::Hash;

    /// Returns the entity's unique identifier
    fn id(&self) -> Self::Id;
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Errors surfaced by store operations
pub type StoreError = DomainError;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    NotFound(String),
    InvalidInput(String),
    /// The store rejected a request or could not be reached
    Store(String),
    /// A row or frame from the store could not be decoded
    Decode(String),
    Config(String),
}

impl DomainError {
    /// The bare message, without the category prefix.
    ///
    /// This is what ends up in user-facing notices.
    pub fn message(&self) -> &str {
        match self {
            DomainError::NotFound(msg)
            | DomainError::InvalidInput(msg)
            | DomainError::Store(msg)
            | DomainError::Decode(msg)
            | DomainError::Config(msg) => msg,
        }
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::NotFound(msg) => write!(f, "Not found: {}", msg),
            DomainError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            DomainError::Store(msg) => write!(f, "Store error: {}", msg),
            DomainError::Decode(msg) => write!(f, "Decode error: {}", msg),
            DomainError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_strips_category() {
        let err = DomainError::Store("permission denied".to_string());
        assert_eq!(err.message(), "permission denied");
        assert_eq!(err.to_string(), "Store error: permission denied");
    }
}
