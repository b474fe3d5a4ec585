//! Placement and sameness strategies injected into a `ChainTable`.
//!
//! A table never looks inside its elements. Where an element lands is decided
//! by a `BucketHasher`, and whether a probe names a stored element is decided
//! by an `Equivalence`. Plain closures and function items work for both, so
//! the equality used for matching may look at different fields than the hash.

use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;

/// Maps an element to a bucket index in `[0, buckets)`.
///
/// Must be deterministic: the same element always maps to the same index for
/// a given bucket count. The table does not verify this; an inconsistent
/// hasher makes previously inserted entries unreachable.
pub trait BucketHasher<T: ?Sized> {
    fn bucket(&self, buckets: usize, element: &T) -> usize;
}

impl<T: ?Sized, F> BucketHasher<T> for F
where
    F: Fn(usize, &T) -> usize,
{
    #[inline]
    fn bucket(&self, buckets: usize, element: &T) -> usize {
        self(buckets, element)
    }
}

/// Decides whether a probe matches a stored element.
///
/// Expected to be an equivalence relation. Lookup and delete return the first
/// match in chain order, which is only meaningful if it is.
pub trait Equivalence<T: ?Sized> {
    fn equivalent(&self, probe: &T, stored: &T) -> bool;
}

impl<T: ?Sized, F> Equivalence<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    #[inline]
    fn equivalent(&self, probe: &T, stored: &T) -> bool {
        self(probe, stored)
    }
}

/// Bucket placement from a `BuildHasher`: `hash(element) % buckets`.
#[derive(Clone, Debug, Default)]
pub struct HashBuckets<S = DefaultHashBuilder> {
    build: S,
}

impl<S> HashBuckets<S> {
    pub fn with_hasher(build: S) -> Self {
        Self { build }
    }
}

impl<T, S> BucketHasher<T> for HashBuckets<S>
where
    T: ?Sized + Hash,
    S: BuildHasher,
{
    #[inline]
    fn bucket(&self, buckets: usize, element: &T) -> usize {
        (self.build.hash_one(element) % buckets as u64) as usize
    }
}

/// Sameness from `PartialEq`.
#[derive(Copy, Clone, Debug, Default)]
pub struct EqEquivalence;

impl<T: ?Sized + PartialEq> Equivalence<T> for EqEquivalence {
    #[inline]
    fn equivalent(&self, probe: &T, stored: &T) -> bool {
        probe == stored
    }
}
