//! Search construction errors.

/// Reasons a search cannot be set up.
///
/// Failures during a run are not errors: oracle failures count as
/// infeasible evaluations and an infeasible start yields a failed
/// [`SearchOutcome`](super::SearchOutcome).
#[derive(Debug, Clone, PartialEq)]
pub enum SearchError {
    /// The configuration failed validation.
    InvalidConfig(String),
    /// The oracle reports no candidate locations.
    EmptyInstance,
    /// No oracle session was supplied.
    NoSessions,
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::InvalidConfig(reason) => write!(f, "invalid configuration: {reason}"),
            SearchError::EmptyInstance => write!(f, "oracle reports no candidate locations"),
            SearchError::NoSessions => write!(f, "at least one oracle session is required"),
        }
    }
}

impl std::error::Error for SearchError {}
