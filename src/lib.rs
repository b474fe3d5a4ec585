//! chain-table: a fixed-size hash table with separate chaining over opaque
//! elements, parameterized by caller-supplied hash and equality strategies.
//!
//! Internal Design:
//!
//! Summary
//! - The table stores whole elements, not key/value pairs. Where an element
//!   goes is decided by a `BucketHasher`; whether a probe matches a stored
//!   element is decided by an `Equivalence`. The two may look at different
//!   parts of the element.
//! - Layers:
//!   - `strategy`: the two capability traits, their blanket impls for
//!     closures, and the `Hash`/`Eq` based defaults.
//!   - `ChainTable<T, H, E>`: bucket heads plus a node arena. Returns
//!     `EntryHandle`s naming individual entries.
//!
//! Storage
//! - Bucket heads are `Option<DefaultKey>`; chain nodes live in a
//!   `SlotMap` and link to their successor by key. Insert pushes at the
//!   head in O(1); lookup and delete walk one chain.
//! - Handles are generational keys, so a handle to a removed entry never
//!   resolves to a newer entry in the reused slot.
//!
//! Semantics
//! - The bucket count is fixed at creation. No resizing, no load factor.
//! - Duplicates are accepted. Lookup and delete return the first match in
//!   chain order, which is the most recently inserted one still present.
//! - An absent input (`None`) and a miss both come back as `None`.
//! - Teardown either hands every element back to the caller or passes each
//!   one to a destructor exactly once.
//!
//! Preconditions (unchecked)
//! - The hasher is deterministic and returns an index below the bucket
//!   count. Debug builds assert the bound; release builds reduce the index
//!   modulo the bucket count.
//! - The equivalence is reflexive, symmetric and transitive.
//!
//! Threading
//! - A table is `Send` when its elements and strategies are, so it can be
//!   moved to another thread or shared behind a lock. It has no internal
//!   synchronization of its own.
//!
//! Not provided: iteration order across buckets, ownership of anything
//! reachable from a stored element.

mod chain_table;
#[cfg(test)]
mod chain_table_proptest;
mod error;
pub mod strategy;

// Public surface
pub use chain_table::{Chain, ChainTable, EntryHandle, Iter};
pub use error::TableError;
pub use strategy::{BucketHasher, EqEquivalence, Equivalence, HashBuckets};
