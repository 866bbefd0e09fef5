//! Error type returned by generated accessors.
//!
//! Storage failures are always wrapped with the name of the accessor that
//! hit them. A by-key fetch that matches no row becomes
//! [`Error::NotFound`] so callers can tell it apart from real failures.
//! Validation failures raised by a record's [`Verify`](crate::Verify) hook
//! travel back unchanged.

use thiserror::Error;

/// Errors surfaced by generated data-access code.
#[derive(Debug, Error)]
pub enum Error {
    /// A by-key fetch matched no row.
    #[error("{context}: no matching row")]
    NotFound {
        /// Accessor that ran the query.
        context: String,
    },

    /// The storage context reported a failure.
    #[error("{context}: {source}")]
    Storage {
        /// Accessor that ran the statement.
        context: String,
        /// Underlying SQLite error.
        #[source]
        source: rusqlite::Error,
    },

    /// The record's validation hook rejected the write.
    #[error("{0}")]
    Invalid(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wraps a storage error with the accessor it came from.
    ///
    /// `QueryReturnedNoRows` becomes [`Error::NotFound`].
    ///
    /// # Examples
    ///
    /// ```
    /// use dalgen_runtime::Error;
    ///
    /// let err = Error::storage("get_user", rusqlite::Error::QueryReturnedNoRows);
    /// assert!(err.is_not_found());
    /// assert_eq!(err.to_string(), "get_user: no matching row");
    /// ```
    pub fn storage(context: impl Into<String>, source: rusqlite::Error) -> Self {
        let context = context.into();
        match source {
            rusqlite::Error::QueryReturnedNoRows => Self::NotFound { context },
            source => Self::Storage { context, source },
        }
    }

    /// Builds a validation error for a [`Verify`](crate::Verify) hook.
    ///
    /// # Examples
    ///
    /// ```
    /// use dalgen_runtime::Error;
    ///
    /// let err = Error::invalid("name must not be empty");
    /// assert_eq!(err.to_string(), "name must not be empty");
    /// ```
    pub fn invalid(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Invalid(error.into())
    }

    /// Returns `true` for [`Error::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Convenience alias for results with [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_wraps_context() {
        let err = Error::storage("Post::write", rusqlite::Error::InvalidQuery);
        assert!(!err.is_not_found());
        assert!(err.to_string().starts_with("Post::write: "));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_no_rows_is_not_found() {
        let err = Error::storage("get_post", rusqlite::Error::QueryReturnedNoRows);
        assert!(matches!(err, Error::NotFound { ref context } if context == "get_post"));
    }
}
