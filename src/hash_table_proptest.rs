#![cfg(test)]

// Property tests for the raw table, kept inside the crate so they can reach
// `assert_invariants`.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use proptest::prelude::*;

use crate::capacity;
use crate::error::Error;
use crate::hash_table::HashTable;

// Few buckets' worth of distinct hashes, so chains are long and shared.
fn weak_hash(value: u32) -> u64 {
    u64::from(value % 7)
}

fn assert_well_formed(table: &HashTable<u32>) {
    table.assert_invariants();
    let cap = table.capacity();
    assert!(cap == 0 || capacity::is_prime(cap), "capacity {cap} is not prime");
    assert!(table.len() <= cap);
}

#[derive(Clone, Debug)]
enum OrderedOp {
    Append(u32),
    ShiftRemove(u32),
    ShiftRemoveIndex(usize),
    ShiftInsert(usize, u32),
    ReplaceAt(usize, u32),
    RetainOrdered(u32),
    EnsureCapacity(usize),
    ShrinkTo(usize),
    ShrinkToFit,
    Clear,
}

fn ordered_op() -> impl Strategy<Value = OrderedOp> {
    prop_oneof![
        4 => (0u32..64).prop_map(OrderedOp::Append),
        2 => (0u32..64).prop_map(OrderedOp::ShiftRemove),
        1 => (0usize..64).prop_map(OrderedOp::ShiftRemoveIndex),
        2 => (0usize..64, 0u32..64).prop_map(|(i, v)| OrderedOp::ShiftInsert(i, v)),
        2 => (0usize..64, 0u32..64).prop_map(|(i, v)| OrderedOp::ReplaceAt(i, v)),
        1 => (2u32..6).prop_map(OrderedOp::RetainOrdered),
        1 => (0usize..200).prop_map(OrderedOp::EnsureCapacity),
        1 => (0usize..80).prop_map(OrderedOp::ShrinkTo),
        1 => Just(OrderedOp::ShrinkToFit),
        1 => Just(OrderedOp::Clear),
    ]
}

// Property: with only order-preserving operations, the slot array mirrors a
// Vec model exactly, and every value is found at its model position.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_ordered_matches_vec(ops in proptest::collection::vec(ordered_op(), 1..80)) {
        let mut table: HashTable<u32> = HashTable::new();
        let mut model: Vec<u32> = Vec::new();

        for op in ops {
            let version = table.version();
            match op {
                OrderedOp::Append(v) => {
                    if !model.contains(&v) {
                        let index = table.insert_unique(weak_hash(v), v);
                        prop_assert_eq!(index, model.len());
                        model.push(v);
                    }
                }
                OrderedOp::ShiftRemove(v) => {
                    let removed = table.shift_remove(weak_hash(v), |&x| x == v);
                    let expected = model.iter().position(|&x| x == v);
                    prop_assert_eq!(removed.map(|(i, _)| i), expected);
                    if let Some(position) = expected {
                        model.remove(position);
                    }
                }
                OrderedOp::ShiftRemoveIndex(i) => {
                    let removed = table.shift_remove_index(i);
                    if i < model.len() {
                        prop_assert_eq!(removed, Some(model.remove(i)));
                    } else {
                        prop_assert_eq!(removed, None);
                        prop_assert_eq!(table.version(), version);
                    }
                }
                OrderedOp::ShiftInsert(i, v) => {
                    if !model.contains(&v) {
                        let i = i % (model.len() + 1);
                        table.shift_insert(i, weak_hash(v), v);
                        model.insert(i, v);
                    }
                }
                OrderedOp::ReplaceAt(i, v) => {
                    if i < model.len() && !model.contains(&v) {
                        let old = table.replace_at(i, weak_hash(v), v);
                        prop_assert_eq!(old, Some(model[i]));
                        model[i] = v;
                    }
                }
                OrderedOp::RetainOrdered(m) => {
                    let removed = table.retain_ordered(|v| *v % m != 0);
                    let before = model.len();
                    model.retain(|v| v % m != 0);
                    prop_assert_eq!(removed, before - model.len());
                }
                OrderedOp::EnsureCapacity(n) => {
                    let cap = table.ensure_capacity(n);
                    prop_assert!(cap.is_ok());
                    prop_assert!(table.capacity() >= n);
                    prop_assert_ne!(table.version(), version);
                }
                OrderedOp::ShrinkTo(n) => {
                    let result = table.shrink_to(n);
                    if n < model.len() {
                        prop_assert_eq!(
                            result,
                            Err(Error::CapacityBelowLength { requested: n, len: model.len() })
                        );
                        prop_assert_eq!(table.version(), version);
                    } else {
                        prop_assert_eq!(result, Ok(()));
                    }
                }
                OrderedOp::ShrinkToFit => table.shrink_to_fit(),
                OrderedOp::Clear => {
                    table.clear();
                    model.clear();
                }
            }

            assert_well_formed(&table);
            prop_assert_eq!(table.slots_in_use(), model.len());
            prop_assert_eq!(table.iter().copied().collect::<Vec<_>>(), model.clone());
            for (position, &v) in model.iter().enumerate() {
                prop_assert_eq!(table.find_index(weak_hash(v), |&x| x == v), Some(position));
            }
        }
    }
}

#[derive(Clone, Debug)]
enum UnorderedOp {
    Insert(u32),
    Remove(u32),
    RemoveIndex(usize),
    Retain(u32),
    ShrinkToFit,
}

fn unordered_op() -> impl Strategy<Value = UnorderedOp> {
    prop_oneof![
        5 => (0u32..48).prop_map(UnorderedOp::Insert),
        3 => (0u32..48).prop_map(UnorderedOp::Remove),
        1 => (0usize..48).prop_map(UnorderedOp::RemoveIndex),
        1 => (2u32..5).prop_map(UnorderedOp::Retain),
        1 => Just(UnorderedOp::ShrinkToFit),
    ]
}

// Property: free-list removal keeps the table equal to a set model, and an
// insert never appends while a freed slot is waiting.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_free_list_matches_set(ops in proptest::collection::vec(unordered_op(), 1..100)) {
        let mut table: HashTable<u32> = HashTable::new();
        let mut model: BTreeSet<u32> = BTreeSet::new();

        for op in ops {
            match op {
                UnorderedOp::Insert(v) => {
                    if model.insert(v) {
                        let slots_before = table.slots_in_use();
                        let has_free = slots_before > table.len();
                        let index = table.insert_unique(weak_hash(v), v);
                        if has_free {
                            prop_assert!(index < slots_before);
                            prop_assert_eq!(table.slots_in_use(), slots_before);
                        } else {
                            prop_assert_eq!(index, slots_before);
                        }
                    }
                }
                UnorderedOp::Remove(v) => {
                    let removed = table.remove(weak_hash(v), |&x| x == v);
                    prop_assert_eq!(removed.is_some(), model.remove(&v));
                }
                UnorderedOp::RemoveIndex(i) => {
                    let removed = table.remove_index(i);
                    if let Some(v) = removed {
                        prop_assert!(model.remove(&v));
                    }
                }
                UnorderedOp::Retain(m) => {
                    table.retain(|v| *v % m != 0);
                    model.retain(|v| v % m != 0);
                }
                UnorderedOp::ShrinkToFit => {
                    table.shrink_to_fit();
                    prop_assert_eq!(table.slots_in_use(), table.len());
                }
            }

            assert_well_formed(&table);
            prop_assert_eq!(table.len(), model.len());
            let stored: BTreeSet<u32> = table.iter().copied().collect();
            prop_assert_eq!(&stored, &model);
            for &v in &model {
                prop_assert_eq!(table.find(weak_hash(v), |&x| x == v), Some(&v));
            }
        }
    }
}
