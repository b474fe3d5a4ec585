use std::collections::TryReserveError;
use thiserror::Error;

/// Failures surfaced by `ChainTable` construction and chain primitives.
///
/// Lookups and deletes that find nothing are not errors; they return `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("a table needs at least one bucket")]
    ZeroBuckets,
    #[error("failed to allocate the bucket array: {0}")]
    Alloc(#[from] TryReserveError),
    #[error("bucket {bucket} out of range for a table with {buckets} buckets")]
    BucketOutOfRange { bucket: usize, buckets: usize },
}
