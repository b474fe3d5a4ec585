#![cfg(test)]

// Property tests for ChainTable kept inside the crate so they can use the
// same element types as the unit tests.

use crate::chain_table::{ChainTable, EntryHandle};
use crate::strategy::BucketHasher;
use proptest::prelude::*;
use std::collections::BTreeSet;

// `id` drives both placement and matching; `serial` tells duplicates apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Item {
    id: u8,
    serial: u32,
}

fn probe(id: u8) -> Item {
    Item {
        id,
        serial: u32::MAX,
    }
}

#[derive(Clone, Debug)]
enum Op {
    Insert(u8),
    Find(u8),
    Remove(u8),
    RemoveHandle(usize),
    FreeChain(usize),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (usize, Vec<Op>)> {
    (1usize..=7).prop_flat_map(|buckets| {
        // Few distinct ids so duplicates and collisions are common.
        let id = 0u8..12;
        let op = prop_oneof![
            3 => id.clone().prop_map(Op::Insert),
            2 => id.clone().prop_map(Op::Find),
            2 => id.prop_map(Op::Remove),
            1 => any::<usize>().prop_map(Op::RemoveHandle),
            1 => (0..buckets + 1).prop_map(Op::FreeChain),
            1 => Just(Op::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (buckets, ops))
    })
}

// Reference model: one Vec per bucket, index 0 is the chain head.
struct Model {
    chains: Vec<Vec<Item>>,
}

impl Model {
    fn first_match(&self, bucket: usize, id: u8) -> Option<(usize, Item)> {
        self.chains[bucket]
            .iter()
            .enumerate()
            .find(|(_, it)| it.id == id)
            .map(|(i, it)| (i, *it))
    }

    fn len(&self) -> usize {
        self.chains.iter().map(Vec::len).sum()
    }
}

fn run<H>(buckets: usize, ops: Vec<Op>, hasher: H, place: fn(usize, u8) -> usize) -> Result<(), TestCaseError>
where
    H: BucketHasher<Item>,
{
    let eq = |a: &Item, b: &Item| a.id == b.id;
    let mut sut = ChainTable::new(buckets, hasher, eq).unwrap();
    let mut model = Model {
        chains: vec![Vec::new(); buckets],
    };
    let mut live: Vec<(EntryHandle, Item)> = Vec::new();
    let mut stale: Vec<EntryHandle> = Vec::new();
    let mut serial = 0u32;

    for op in ops {
        match op {
            Op::Insert(id) => {
                let item = Item { id, serial };
                serial += 1;
                let h = sut.insert(item).expect("present element is inserted");
                let bucket = place(buckets, id);
                prop_assert_eq!(h.bucket(&sut), Some(bucket));
                model.chains[bucket].insert(0, item);
                live.push((h, item));
            }
            Op::Find(id) => {
                let bucket = place(buckets, id);
                let got = sut.get(&probe(id)).copied();
                prop_assert_eq!(got, model.first_match(bucket, id).map(|(_, it)| it));
            }
            Op::Remove(id) => {
                let bucket = place(buckets, id);
                let got = sut.remove(&probe(id));
                match model.first_match(bucket, id) {
                    Some((i, it)) => {
                        prop_assert_eq!(got, Some(it));
                        model.chains[bucket].remove(i);
                        let pos = live.iter().position(|(_, l)| *l == it).expect("tracked");
                        stale.push(live.remove(pos).0);
                    }
                    None => prop_assert!(got.is_none()),
                }
            }
            Op::RemoveHandle(i) => {
                if live.is_empty() {
                    continue;
                }
                let (h, it) = live.remove(i % live.len());
                prop_assert_eq!(sut.remove_entry(h), Some(it));
                let bucket = place(buckets, it.id);
                model.chains[bucket].retain(|m| *m != it);
                stale.push(h);
            }
            Op::FreeChain(bucket) => {
                let got = sut.free_chain(bucket);
                if bucket >= buckets {
                    prop_assert!(got.is_err());
                } else {
                    let freed = std::mem::take(&mut model.chains[bucket]);
                    prop_assert_eq!(got.unwrap(), freed.clone());
                    live.retain(|(h, it)| {
                        let gone = freed.contains(it);
                        if gone {
                            stale.push(*h);
                        }
                        !gone
                    });
                }
            }
            Op::Iterate => {
                let s: BTreeSet<Item> = sut.iter().copied().collect();
                let m: BTreeSet<Item> = model.chains.iter().flatten().copied().collect();
                prop_assert_eq!(s, m);
            }
        }

        // Post-conditions after each op
        for &h in &stale {
            prop_assert!(h.element(&sut).is_none());
        }
        for (b, chain) in model.chains.iter().enumerate() {
            let got: Vec<Item> = sut.chain(b).copied().collect();
            prop_assert_eq!(&got, chain);
        }
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.len() == 0);
    }

    let mut destroyed = Vec::new();
    let remaining = model.len();
    sut.teardown_with(|it| destroyed.push(it));
    prop_assert_eq!(destroyed.len(), remaining);
    let unique: BTreeSet<Item> = destroyed.into_iter().collect();
    prop_assert_eq!(unique.len(), remaining);
    Ok(())
}

fn modulo_place(buckets: usize, id: u8) -> usize {
    id as usize % buckets
}

fn const_place(_: usize, _: u8) -> usize {
    0
}

// Property: chain contents, head order, duplicate tie-breaks and lengths
// match the model after every operation; teardown destroys each remaining
// element exactly once.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_matches_bucket_model((buckets, ops) in arb_scenario()) {
        run(buckets, ops, |n: usize, it: &Item| it.id as usize % n, modulo_place)?;
    }
}

// Property: same invariants when every element collides into bucket 0.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_matches_bucket_model_with_collisions((buckets, ops) in arb_scenario()) {
        run(buckets, ops, |_: usize, _: &Item| 0usize, const_place)?;
    }
}

