use std::{collections::BTreeSet, hint::black_box};

use mwtree::BTree;

fn main() {
    divan::main();
}

fn lens() -> impl Iterator<Item = u32> {
    (0..17).map(|i| 1 << i)
}

trait KeyGen: Default {
    fn gen_key(&mut self, len: u32) -> u32;
}

#[derive(Default)]
struct Seq(u32);
impl KeyGen for Seq {
    fn gen_key(&mut self, _len: u32) -> u32 {
        let key = self.0;
        self.0 += 1;
        key
    }
}

#[derive(Default)]
struct Rand(u32);
impl KeyGen for Rand {
    fn gen_key(&mut self, len: u32) -> u32 {
        let key = self.0;
        self.0 = self.0.wrapping_mul(1664525).wrapping_add(1013904223);
        key % len
    }
}

#[divan::bench(args = lens(), types = [Seq, Rand])]
fn lookup_btree<K: KeyGen>(bencher: divan::Bencher, len: u32) {
    let btree: BTree<u32> = (0..len).collect();
    bencher.bench_local(|| {
        let mut k = K::default();
        for _ in 0..len {
            let key = k.gen_key(len);
            black_box(btree.contains(black_box(&key)));
        }
    });
}

#[divan::bench(args = lens(), types = [Seq, Rand])]
fn lookup_std<K: KeyGen>(bencher: divan::Bencher, len: u32) {
    let btree: BTreeSet<u32> = (0..len).collect();
    bencher.bench_local(|| {
        let mut k = K::default();
        for _ in 0..len {
            let key = k.gen_key(len);
            black_box(btree.contains(black_box(&key)));
        }
    });
}

#[divan::bench(args = lens(), types = [Seq, Rand])]
fn insert_btree<K: KeyGen>(bencher: divan::Bencher, len: u32) {
    bencher.bench_local(|| {
        let mut btree = BTree::<u32>::new();
        let mut k = K::default();
        for _ in 0..len {
            btree.insert(k.gen_key(len));
        }
        btree
    });
}

#[divan::bench(args = lens(), types = [Seq, Rand])]
fn insert_multi_btree<K: KeyGen>(bencher: divan::Bencher, len: u32) {
    bencher.bench_local(|| {
        let mut btree = BTree::<u32>::new();
        let mut k = K::default();
        for _ in 0..len {
            btree.insert_multi(k.gen_key(len));
        }
        btree
    });
}

#[divan::bench(args = lens(), types = [Seq, Rand])]
fn insert_std<K: KeyGen>(bencher: divan::Bencher, len: u32) {
    bencher.bench_local(|| {
        let mut btree = BTreeSet::new();
        let mut k = K::default();
        for _ in 0..len {
            btree.insert(k.gen_key(len));
        }
        btree
    });
}

#[divan::bench(args = lens(), types = [Seq, Rand])]
fn remove_btree<K: KeyGen>(bencher: divan::Bencher, len: u32) {
    bencher
        .with_inputs(|| (0..len).collect::<BTree<u32>>())
        .bench_local_values(|mut btree| {
            let mut k = K::default();
            for _ in 0..len {
                btree.remove(&k.gen_key(len));
            }
            btree
        });
}

#[divan::bench(args = lens(), types = [Seq, Rand])]
fn remove_std<K: KeyGen>(bencher: divan::Bencher, len: u32) {
    bencher
        .with_inputs(|| (0..len).collect::<BTreeSet<u32>>())
        .bench_local_values(|mut btree| {
            let mut k = K::default();
            for _ in 0..len {
                btree.remove(&k.gen_key(len));
            }
            btree
        });
}

#[divan::bench(consts = [2, 3, 6, 16, 64])]
fn insert_degree<const B: usize>(bencher: divan::Bencher) {
    bencher.bench_local(|| {
        let mut btree = BTree::<u32, B>::new();
        let mut k = Rand::default();
        for _ in 0..65536 {
            btree.insert(k.gen_key(65536));
        }
        btree
    });
}

#[divan::bench(consts = [2, 3, 6, 16, 64])]
fn lookup_degree<const B: usize>(bencher: divan::Bencher) {
    let btree: BTree<u32, B> = (0..65536).collect();
    bencher.bench_local(|| {
        let mut k = Rand::default();
        for _ in 0..65536 {
            black_box(btree.contains(black_box(&k.gen_key(65536))));
        }
    });
}

#[divan::bench(args = lens())]
fn iter_btree(bencher: divan::Bencher, len: u32) {
    let btree: BTree<u32> = (0..len).collect();
    bencher.bench_local(|| {
        for key in &btree {
            divan::black_box(key);
        }
    });
}

#[divan::bench(args = lens())]
fn for_all_btree(bencher: divan::Bencher, len: u32) {
    let btree: BTree<u32> = (0..len).collect();
    bencher.bench_local(|| {
        btree.for_all(|key| {
            divan::black_box(key);
        });
    });
}

#[divan::bench(args = lens())]
fn iter_std(bencher: divan::Bencher, len: u32) {
    let btree: BTreeSet<u32> = (0..len).collect();
    bencher.bench_local(|| {
        for key in &btree {
            divan::black_box(key);
        }
    });
}
