use thiserror::Error;

/// Validation failures raised by store mutations. Raised before any state
/// changes, so a rejected call leaves the store exactly as it was.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("title must not be empty")]
    EmptyTitle,
}

/// Failures from the recommendation engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecommendError {
    #[error("no unwatched items to recommend")]
    NoCandidates,
}
