// Validated Types
// Strongly-typed wrappers that enforce invariants at construction time.
// A value of these types cannot hold invalid data, so downstream code
// never re-checks.

use std::fmt;

/// Validation failures are client errors: surfaced as 400s at the HTTP
/// boundary, never retried, never logged as system faults.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Query cannot be empty")]
    Empty,

    #[error("Query must contain only lowercase a-z characters")]
    InvalidCharacters,

    #[error("Query length {actual} exceeds maximum of {max} characters")]
    TooLong { actual: usize, max: usize },
}

/// A query string that has been validated against the suggestion alphabet.
///
/// # Invariants
/// - Non-empty
/// - ASCII lowercase a-z only
/// - Length <= the configured maximum query length
///
/// This is the single source of truth for query validation; both the HTTP
/// boundary and the service accept only this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidatedQuery {
    inner: String,
}

#[allow(clippy::len_without_is_empty)]
impl ValidatedQuery {
    pub fn new(query: impl Into<String>, max_length: usize) -> Result<Self, ValidationError> {
        let query = query.into();

        if query.is_empty() {
            return Err(ValidationError::Empty);
        }
        if !query.bytes().all(|b| b.is_ascii_lowercase()) {
            return Err(ValidationError::InvalidCharacters);
        }
        if query.len() > max_length {
            return Err(ValidationError::TooLong {
                actual: query.len(),
                max: max_length,
            });
        }

        Ok(Self { inner: query })
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Length in bytes; never zero, since construction rejects empty queries
    pub fn len(&self) -> usize {
        self.inner.len()
    }
}

impl fmt::Display for ValidatedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}
