#![no_main]

use std::fmt::Debug;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use mwtree::BTree;

#[derive(Arbitrary, Debug)]
enum Action<Key> {
    Clear,
    Insert(Key),
    InsertMulti(Key),
    Contains(Key),
    Remove(Key),
    PopFirst,
    PopLast,
}

#[derive(Arbitrary, Debug)]
enum KeyType {
    U8(Vec<Action<u8>>),
    U16(Vec<Action<u16>>),
    U32(Vec<Action<u32>>),
    I64(Vec<Action<i64>>),
}

#[derive(Arbitrary, Debug)]
enum Degree {
    B2(KeyType),
    B3(KeyType),
    B6(KeyType),
}

fn run<Key: Ord + Copy + Debug, const B: usize>(actions: Vec<Action<Key>>) {
    let mut btree = BTree::<Key, B>::new();
    let mut vec = vec![];
    for action in actions {
        match action {
            Action::Clear => {
                btree.clear();
                vec.clear();
            }
            Action::Insert(key) => {
                let inserted = btree.insert(key);
                let index = vec.partition_point(|&k| k < key);
                if index != vec.len() && vec[index] == key {
                    assert!(!inserted);
                } else {
                    assert!(inserted);
                    vec.insert(index, key);
                }
            }
            Action::InsertMulti(key) => {
                btree.insert_multi(key);
                let index = vec.partition_point(|&k| k <= key);
                vec.insert(index, key);
            }
            Action::Contains(key) => {
                let index = vec.partition_point(|&k| k < key);
                let expected = index != vec.len() && vec[index] == key;
                assert_eq!(btree.contains(&key), expected);
                if let Some((node, pos)) = btree.search(&key) {
                    assert_eq!(node.keys()[pos], key);
                }
            }
            Action::Remove(key) => {
                let removed = btree.remove(&key);
                let index = vec.partition_point(|&k| k < key);
                if index != vec.len() && vec[index] == key {
                    assert!(removed);
                    vec.remove(index);
                } else {
                    assert!(!removed);
                }
            }
            Action::PopFirst => {
                let key = btree.pop_first();
                let expected = (!vec.is_empty()).then(|| vec.remove(0));
                assert_eq!(key, expected);
            }
            Action::PopLast => {
                assert_eq!(btree.pop_last(), vec.pop());
            }
        }

        btree.check_invariants();
        assert_eq!(vec.len(), btree.len());
        assert_eq!(vec.is_empty(), btree.is_empty());
        assert_eq!(vec.first(), btree.first());
        assert_eq!(vec.last(), btree.last());
        let btree_keys: Vec<_> = btree.iter().copied().collect();
        assert_eq!(vec, btree_keys);
    }
}

fn dispatch_by_key<const B: usize>(actions: KeyType) {
    match actions {
        KeyType::U8(actions) => run::<_, B>(actions),
        KeyType::U16(actions) => run::<_, B>(actions),
        KeyType::U32(actions) => run::<_, B>(actions),
        KeyType::I64(actions) => run::<_, B>(actions),
    }
}

fuzz_target!(|actions: Degree| {
    match actions {
        Degree::B2(actions) => dispatch_by_key::<2>(actions),
        Degree::B3(actions) => dispatch_by_key::<3>(actions),
        Degree::B6(actions) => dispatch_by_key::<6>(actions),
    }
});
