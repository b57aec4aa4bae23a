//! Error types for gridflip.
//!
//! The engine itself only fails on caller mistakes: an unknown easing name,
//! a detached container or an animated item with more than one child
//! wrapper. The remaining variants belong to option-file loading.

use thiserror::Error;

use crate::animation::state::ItemId;

/// Result type alias for engine operations.
pub type GridResult<T> = Result<T, GridError>;

/// Errors that can occur while configuring or running the engine.
#[derive(Debug, Error)]
pub enum GridError {
    /// The easing name is not one of the supported curves.
    #[error("{0} is not a valid easing name")]
    InvalidEasing(String),

    /// An item selected for animation wraps its content in more than one
    /// direct child element.
    #[error(
        "item {item} has {children} direct children; make sure every grid item has a single \
         container element surrounding its children"
    )]
    MultipleChildWrappers {
        /// Identity of the offending item.
        item: ItemId,
        /// Number of direct children found.
        children: usize,
    },

    /// The container handed to the engine is not attached to a document.
    #[error("the grid container is not attached to a document")]
    DetachedContainer,

    /// Invalid option values.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The option file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The option file is not valid JSON.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl GridError {
    /// Returns whether this error reports a structural or configuration
    /// mistake by the caller.
    #[must_use]
    pub const fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidEasing(_) | Self::DetachedContainer | Self::MultipleChildWrappers { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_easing_display() {
        let err = GridError::InvalidEasing("bounce".to_string());
        assert_eq!(err.to_string(), "bounce is not a valid easing name");
    }

    #[test]
    fn test_multiple_child_wrappers_display() {
        let item = ItemId::new();
        let err = GridError::MultipleChildWrappers { item, children: 2 };
        let msg = err.to_string();
        assert!(msg.contains("2 direct children"));
        assert!(msg.contains(&item.to_string()));
    }

    #[test]
    fn test_io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: GridError = io_err.into();
        assert!(matches!(err, GridError::Io(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_parse_error_from_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: GridError = json_err.into();
        assert!(matches!(err, GridError::Parse(_)));
    }

    #[test]
    fn test_usage_errors() {
        assert!(GridError::InvalidEasing("x".to_string()).is_usage_error());
        assert!(
            GridError::MultipleChildWrappers { item: ItemId::new(), children: 3 }.is_usage_error()
        );
        assert!(GridError::DetachedContainer.is_usage_error());
        assert!(!GridError::Config("bad".to_string()).is_usage_error());
    }
}
