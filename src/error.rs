// Error taxonomy for store operations

use thiserror::Error;

/// Everything a store operation can reject with.
///
/// All variants are recoverable: validation runs before any mutation, so a
/// failed operation leaves the store exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// `add` with a name that is empty after trimming
    #[error("visit name cannot be empty")]
    EmptyName,

    /// `add` without a visit date
    #[error("visit date is required")]
    MissingDate,

    /// `edit` with a date that does not match YYYY-MM-DD
    #[error("invalid date format: {value:?} (expected YYYY-MM-DD)")]
    InvalidDateFormat { value: String },

    /// Lookup miss on `toggle_completed` / `edit`
    #[error("no visit with id {id}")]
    NotFound { id: u64 },

    /// Bulk operation on an empty store
    #[error("the store is empty")]
    EmptyStore,

    /// `clear_completed` with no completed visit to clear
    #[error("no completed visits to clear")]
    NothingToClear,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(StoreError::EmptyName.to_string(), "visit name cannot be empty");
        assert_eq!(StoreError::NotFound { id: 42 }.to_string(), "no visit with id 42");
        let err = StoreError::InvalidDateFormat {
            value: "tomorrow".to_string(),
        };
        assert_eq!(err.to_string(), "invalid date format: \"tomorrow\" (expected YYYY-MM-DD)");
    }
}
