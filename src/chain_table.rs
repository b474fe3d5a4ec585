//! ChainTable: fixed bucket array with singly linked collision chains.

use crate::error::TableError;
use crate::strategy::{BucketHasher, EqEquivalence, Equivalence, HashBuckets};
use core::fmt;
use core::hash::Hash;
use slotmap::{DefaultKey, SlotMap};

/// Names one stored entry. Stays valid until that entry is removed or its
/// chain is released; never resolves to a later entry that reuses the slot.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct EntryHandle(DefaultKey);

impl EntryHandle {
    pub fn element<'a, T, H, E>(&self, table: &'a ChainTable<T, H, E>) -> Option<&'a T> {
        table.nodes.get(self.0).map(|n| &n.element)
    }

    /// Bucket the entry was placed in at insert time.
    pub fn bucket<T, H, E>(&self, table: &ChainTable<T, H, E>) -> Option<usize> {
        table.nodes.get(self.0).map(|n| n.bucket)
    }
}

#[derive(Debug)]
struct Node<T> {
    element: T,
    bucket: usize,
    next: Option<DefaultKey>,
}

/// Hash table over opaque elements with a fixed number of buckets.
///
/// Placement comes from `H`, matching from `E`. Entries are pushed at the
/// head of their chain and duplicates are never rejected, so lookup and
/// removal always see the most recently inserted match first.
pub struct ChainTable<T, H = HashBuckets, E = EqEquivalence> {
    heads: Vec<Option<DefaultKey>>,
    nodes: SlotMap<DefaultKey, Node<T>>, // chain nodes; links are generational keys
    hasher: H,
    eq: E,
}

impl<T> ChainTable<T>
where
    T: Hash + Eq,
{
    /// Table placing elements by their `Hash` and matching them by `Eq`.
    pub fn with_buckets(buckets: usize) -> Result<Self, TableError> {
        Self::new(buckets, HashBuckets::default(), EqEquivalence)
    }
}

// Index the hasher picked, reduced into range when it misbehaves.
fn place<T, H>(hasher: &H, buckets: usize, element: &T) -> usize
where
    H: BucketHasher<T>,
{
    let index = hasher.bucket(buckets, element);
    debug_assert!(
        index < buckets,
        "bucket hasher returned index {index} for {buckets} buckets"
    );
    index % buckets
}

// Detach `key` from its chain. `prev` is its predecessor, `None` at the head.
fn unlink<T>(
    heads: &mut [Option<DefaultKey>],
    nodes: &mut SlotMap<DefaultKey, Node<T>>,
    bucket: usize,
    prev: Option<DefaultKey>,
    key: DefaultKey,
) -> T {
    let node = nodes.remove(key).expect("chain link names a live node");
    match prev {
        Some(p) => nodes[p].next = node.next,
        None => heads[bucket] = node.next,
    }
    node.element
}

// Free the chain at `bucket` head first, handing each element to `sink`.
// The head is advanced before `sink` runs, so a panicking sink leaves the
// bucket pointing at the nodes not yet released.
fn release_chain<T>(
    heads: &mut [Option<DefaultKey>],
    nodes: &mut SlotMap<DefaultKey, Node<T>>,
    bucket: usize,
    mut sink: impl FnMut(T),
) -> usize {
    let mut released = 0;
    while let Some(k) = heads[bucket] {
        let node = nodes.remove(k).expect("chain link names a live node");
        heads[bucket] = node.next;
        sink(node.element);
        released += 1;
    }
    released
}

impl<T, H, E> ChainTable<T, H, E>
where
    H: BucketHasher<T>,
    E: Equivalence<T>,
{
    /// Create a table with `buckets` empty chains.
    pub fn new(buckets: usize, hasher: H, eq: E) -> Result<Self, TableError> {
        if buckets == 0 {
            return Err(TableError::ZeroBuckets);
        }
        let mut heads = Vec::new();
        heads.try_reserve_exact(buckets)?;
        heads.resize(buckets, None);
        tracing::debug!(buckets, "created chain table");
        Ok(Self {
            heads,
            nodes: SlotMap::with_key(),
            hasher,
            eq,
        })
    }

    /// Push `element` onto the head of its bucket's chain.
    ///
    /// Returns `None` without touching the table when given `None`. When `T`
    /// is itself an `Option<X>`, a bare `None` argument does not infer; pass
    /// `Some(None)` to store `None` as an element, or `None::<Option<X>>` for
    /// an absent input.
    pub fn insert(&mut self, element: impl Into<Option<T>>) -> Option<EntryHandle> {
        let element = element.into()?;
        let bucket = place(&self.hasher, self.heads.len(), &element);
        let next = self.heads[bucket];
        let k = self.nodes.insert(Node {
            element,
            bucket,
            next,
        });
        self.heads[bucket] = Some(k);
        tracing::trace!(bucket, "inserted entry");
        Some(EntryHandle(k))
    }

    /// First entry in the probe's chain that the equivalence accepts.
    ///
    /// `None` covers both an absent probe and no match.
    pub fn find<'q>(&self, probe: impl Into<Option<&'q T>>) -> Option<EntryHandle>
    where
        T: 'q,
    {
        let probe = probe.into()?;
        let bucket = place(&self.hasher, self.heads.len(), probe);
        let mut cur = self.heads[bucket];
        while let Some(k) = cur {
            let node = &self.nodes[k];
            if self.eq.equivalent(probe, &node.element) {
                return Some(EntryHandle(k));
            }
            cur = node.next;
        }
        None
    }

    pub fn get<'q>(&self, probe: impl Into<Option<&'q T>>) -> Option<&T>
    where
        T: 'q,
    {
        let h = self.find(probe)?;
        h.element(self)
    }

    pub fn contains<'q>(&self, probe: impl Into<Option<&'q T>>) -> bool
    where
        T: 'q,
    {
        self.find(probe).is_some()
    }

    /// Unlink the first match for `probe` and hand its element back.
    ///
    /// Later duplicates stay in place.
    pub fn remove<'q>(&mut self, probe: impl Into<Option<&'q T>>) -> Option<T>
    where
        T: 'q,
    {
        let probe = probe.into()?;
        let bucket = place(&self.hasher, self.heads.len(), probe);
        let mut prev = None;
        let mut cur = self.heads[bucket];
        while let Some(k) = cur {
            let node = &self.nodes[k];
            if self.eq.equivalent(probe, &node.element) {
                tracing::trace!(bucket, "removed entry");
                return Some(unlink(&mut self.heads, &mut self.nodes, bucket, prev, k));
            }
            prev = cur;
            cur = node.next;
        }
        None
    }
}

impl<T, H, E> ChainTable<T, H, E> {
    /// Unlink exactly the entry named by `handle`. Stale handles yield `None`.
    pub fn remove_entry(&mut self, handle: EntryHandle) -> Option<T> {
        let bucket = self.nodes.get(handle.0)?.bucket;
        let mut prev = None;
        let mut cur = self.heads[bucket];
        while let Some(k) = cur {
            if k == handle.0 {
                tracing::trace!(bucket, "removed entry by handle");
                return Some(unlink(&mut self.heads, &mut self.nodes, bucket, prev, k));
            }
            prev = cur;
            cur = self.nodes[k].next;
        }
        None
    }

    /// Free one chain's nodes and return its elements, head first.
    pub fn free_chain(&mut self, bucket: usize) -> Result<Vec<T>, TableError> {
        let mut out = Vec::new();
        self.free_chain_with(bucket, |e| out.push(e))?;
        Ok(out)
    }

    /// Free one chain's nodes, passing each element to `destroy`.
    /// Returns how many elements were destroyed.
    pub fn free_chain_with<D>(&mut self, bucket: usize, destroy: D) -> Result<usize, TableError>
    where
        D: FnMut(T),
    {
        let buckets = self.heads.len();
        if bucket >= buckets {
            return Err(TableError::BucketOutOfRange { bucket, buckets });
        }
        Ok(release_chain(&mut self.heads, &mut self.nodes, bucket, destroy))
    }

    /// Release the whole structure and return every element to the caller.
    pub fn teardown(self) -> Vec<T> {
        self.dismantle(None)
    }

    /// Release the whole structure, calling `destroy` once per element.
    pub fn teardown_with<D>(self, mut destroy: D)
    where
        D: FnMut(T),
    {
        let _ = self.dismantle(Some(&mut destroy));
    }

    fn dismantle(mut self, mut destroy: Option<&mut dyn FnMut(T)>) -> Vec<T> {
        let mut kept = Vec::new();
        let mut released = 0;
        for bucket in 0..self.heads.len() {
            released += release_chain(&mut self.heads, &mut self.nodes, bucket, |e| {
                match destroy.as_deref_mut() {
                    Some(d) => d(e),
                    None => kept.push(e),
                }
            });
        }
        debug_assert!(self.nodes.is_empty());
        tracing::debug!(
            buckets = self.heads.len(),
            released,
            destroyed = destroy.is_some(),
            "tore down chain table"
        );
        kept
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn bucket_count(&self) -> usize {
        self.heads.len()
    }

    /// Elements of one bucket, head to tail. Empty for an out-of-range bucket.
    pub fn chain(&self, bucket: usize) -> Chain<'_, T> {
        Chain {
            nodes: &self.nodes,
            cur: self.heads.get(bucket).copied().flatten(),
        }
    }

    pub fn chain_len(&self, bucket: usize) -> usize {
        self.chain(bucket).count()
    }

    /// All elements, bucket by bucket, each chain head to tail.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            heads: self.heads.iter(),
            chain: Chain {
                nodes: &self.nodes,
                cur: None,
            },
        }
    }
}

/// Iterator over one bucket's chain.
pub struct Chain<'a, T> {
    nodes: &'a SlotMap<DefaultKey, Node<T>>,
    cur: Option<DefaultKey>,
}

impl<T> Clone for Chain<'_, T> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            cur: self.cur,
        }
    }
}

impl<'a, T> Iterator for Chain<'a, T> {
    type Item = &'a T;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.nodes.get(self.cur?)?;
        self.cur = node.next;
        Some(&node.element)
    }
}

/// Iterator over every stored element.
pub struct Iter<'a, T> {
    heads: core::slice::Iter<'a, Option<DefaultKey>>,
    chain: Chain<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(e) = self.chain.next() {
                return Some(e);
            }
            self.chain.cur = *self.heads.next()?;
        }
    }
}

struct DebugChain<'a, T>(Chain<'a, T>);

impl<T: fmt::Debug> fmt::Debug for DebugChain<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.clone()).finish()
    }
}

impl<T: fmt::Debug, H, E> fmt::Debug for ChainTable<T, H, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut m = f.debug_map();
        for bucket in 0..self.heads.len() {
            m.entry(&bucket, &DebugChain(self.chain(bucket)));
        }
        m.finish()
    }
}
