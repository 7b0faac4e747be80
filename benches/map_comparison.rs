use core::hash::BuildHasher;
use core::hash::Hash;
use core::hint::black_box;
use std::collections::HashMap as StdHashMap;

use criterion::AxisScale;
use criterion::BatchSize;
use criterion::BenchmarkGroup;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use criterion::measurement::WallTime;
use hashbrown::HashMap as HashbrownHashMap;
use rand::Rng;
use rand::SeedableRng;
use rand::distr;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand_distr::Zipf;
use robin_hood_map::FlatMap;
use robin_hood_map::NodeMap;
use siphasher::sip::SipHasher;

#[derive(Clone, Copy, Default)]
struct SipHashBuilder;

impl BuildHasher for SipHashBuilder {
    type Hasher = SipHasher;

    fn build_hasher(&self) -> Self::Hasher {
        SipHasher::new_with_keys(0x5151_5151, 0xA5A5_A5A5)
    }
}

trait BenchKey: Clone + Hash + Eq {
    fn new(key: u64) -> Self;
}

impl BenchKey for u64 {
    fn new(key: u64) -> Self {
        black_box(key)
    }
}

impl BenchKey for String {
    fn new(key: u64) -> Self {
        black_box(format!("key_{:016X}", key))
    }
}

trait BenchValue: Clone {
    fn new(key: u64) -> Self;
}

impl BenchValue for u64 {
    fn new(key: u64) -> Self {
        key
    }
}

#[derive(Clone)]
struct LargeValue([u8; 256]);

impl BenchValue for LargeValue {
    fn new(key: u64) -> Self {
        let mut value = [0u8; 256];
        for (i, byte) in value.iter_mut().enumerate() {
            *byte = ((key >> ((i % 8) * 8)) & 0xFF) as u8;
        }
        LargeValue(value)
    }
}

/// The operations every benchmarked map supports.
trait BenchMap<K, V> {
    const NAME: &'static str;

    fn with_capacity(capacity: usize) -> Self;
    fn insert(&mut self, key: K, value: V);
    fn get(&self, key: &K) -> Option<&V>;
    fn remove(&mut self, key: &K) -> Option<V>;
    fn toggle(&mut self, key: K, value: V);
    fn for_each(&self, f: impl FnMut(&K, &V));
    fn drain_count(&mut self) -> usize;
}

impl<K: Hash + Eq, V> BenchMap<K, V> for FlatMap<K, V, SipHashBuilder> {
    const NAME: &'static str = "robin_hood_flat";

    fn with_capacity(capacity: usize) -> Self {
        FlatMap::with_capacity(capacity)
    }

    fn insert(&mut self, key: K, value: V) {
        self.insert_or_assign(key, value);
    }

    fn get(&self, key: &K) -> Option<&V> {
        self.get(key)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        self.remove(key)
    }

    fn toggle(&mut self, key: K, value: V) {
        match self.entry(key) {
            robin_hood_map::Entry::Vacant(entry) => {
                entry.insert(value);
            }
            robin_hood_map::Entry::Occupied(entry) => {
                black_box(entry.remove());
            }
        }
    }

    fn for_each(&self, mut f: impl FnMut(&K, &V)) {
        for (k, v) in self.iter() {
            f(k, v);
        }
    }

    fn drain_count(&mut self) -> usize {
        self.drain().map(black_box).count()
    }
}

impl<K: Hash + Eq, V> BenchMap<K, V> for NodeMap<K, V, SipHashBuilder> {
    const NAME: &'static str = "robin_hood_node";

    fn with_capacity(capacity: usize) -> Self {
        NodeMap::with_capacity(capacity)
    }

    fn insert(&mut self, key: K, value: V) {
        self.insert_or_assign(key, value);
    }

    fn get(&self, key: &K) -> Option<&V> {
        self.get(key)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        self.remove(key)
    }

    fn toggle(&mut self, key: K, value: V) {
        match self.entry(key) {
            robin_hood_map::hash_map::Entry::Vacant(entry) => {
                entry.insert(value);
            }
            robin_hood_map::hash_map::Entry::Occupied(entry) => {
                black_box(entry.remove());
            }
        }
    }

    fn for_each(&self, mut f: impl FnMut(&K, &V)) {
        for (k, v) in self.iter() {
            f(k, v);
        }
    }

    fn drain_count(&mut self) -> usize {
        self.drain().map(black_box).count()
    }
}

impl<K: Hash + Eq, V> BenchMap<K, V> for HashbrownHashMap<K, V, SipHashBuilder> {
    const NAME: &'static str = "hashbrown";

    fn with_capacity(capacity: usize) -> Self {
        HashbrownHashMap::with_capacity_and_hasher(capacity, SipHashBuilder)
    }

    fn insert(&mut self, key: K, value: V) {
        HashbrownHashMap::insert(self, key, value);
    }

    fn get(&self, key: &K) -> Option<&V> {
        HashbrownHashMap::get(self, key)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        HashbrownHashMap::remove(self, key)
    }

    fn toggle(&mut self, key: K, value: V) {
        match self.entry(key) {
            hashbrown::hash_map::Entry::Vacant(entry) => {
                entry.insert(value);
            }
            hashbrown::hash_map::Entry::Occupied(entry) => {
                black_box(entry.remove());
            }
        }
    }

    fn for_each(&self, mut f: impl FnMut(&K, &V)) {
        for (k, v) in self.iter() {
            f(k, v);
        }
    }

    fn drain_count(&mut self) -> usize {
        self.drain().map(black_box).count()
    }
}

impl<K: Hash + Eq, V> BenchMap<K, V> for StdHashMap<K, V, SipHashBuilder> {
    const NAME: &'static str = "std";

    fn with_capacity(capacity: usize) -> Self {
        StdHashMap::with_capacity_and_hasher(capacity, SipHashBuilder)
    }

    fn insert(&mut self, key: K, value: V) {
        StdHashMap::insert(self, key, value);
    }

    fn get(&self, key: &K) -> Option<&V> {
        StdHashMap::get(self, key)
    }

    fn remove(&mut self, key: &K) -> Option<V> {
        StdHashMap::remove(self, key)
    }

    fn toggle(&mut self, key: K, value: V) {
        match self.entry(key) {
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(value);
            }
            std::collections::hash_map::Entry::Occupied(entry) => {
                black_box(entry.remove());
            }
        }
    }

    fn for_each(&self, mut f: impl FnMut(&K, &V)) {
        for (k, v) in self.iter() {
            f(k, v);
        }
    }

    fn drain_count(&mut self) -> usize {
        self.drain().map(black_box).count()
    }
}

const SIZES: &[usize] = &[
    (1 << 10),
    (1 << 12),
    (1 << 14),
    (1 << 16),
    (1 << 18),
];

const KEY_SPACE_MULTIPLIER: usize = 2;

fn pairs<K: BenchKey, V: BenchValue>(keys: impl Iterator<Item = u64>) -> Vec<(K, V)> {
    keys.map(|key| (K::new(key), V::new(key))).collect()
}

fn filled<M: BenchMap<K, V>, K: BenchKey, V: BenchValue>(pairs: &[(K, V)]) -> M {
    let mut map = M::with_capacity(0);
    for (k, v) in pairs.iter().cloned() {
        map.insert(k, v);
    }
    map
}

fn group_for<'a>(c: &'a mut Criterion, name: &str) -> BenchmarkGroup<'a, WallTime> {
    let mut group = c.benchmark_group(name);
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));
    group
}

fn insert_random<M: BenchMap<K, V>, K: BenchKey, V: BenchValue>(
    group: &mut BenchmarkGroup<'_, WallTime>,
    size: usize,
    preallocate: bool,
) {
    let mut rng = SmallRng::seed_from_u64(size as u64);
    let pairs = pairs::<K, V>((0..size).map(|_| rng.random()));

    group.throughput(Throughput::Elements(size as u64));
    group.bench_function(format!("{}/{}", M::NAME, size), |b| {
        b.iter_batched(
            || {
                let mut pairs = pairs.clone();
                pairs.shuffle(&mut SmallRng::from_os_rng());
                pairs
            },
            |pairs| {
                let mut map = M::with_capacity(if preallocate { size } else { 0 });
                for (k, v) in pairs {
                    map.insert(k, v);
                }
                black_box(map)
            },
            BatchSize::SmallInput,
        )
    });
}

fn find_hit_miss<M: BenchMap<K, V>, K: BenchKey, V: BenchValue>(
    group: &mut BenchmarkGroup<'_, WallTime>,
    size: usize,
) {
    let present = pairs::<K, V>((0..size as u64 * 2).step_by(2));
    let map: M = filled(&present);

    let mut lookups = (0..size as u64).map(K::new).collect::<Vec<_>>();
    lookups.shuffle(&mut SmallRng::seed_from_u64(size as u64));

    group.throughput(Throughput::Elements(size as u64));
    group.bench_function(format!("{}/{}", M::NAME, size), |b| {
        b.iter(|| {
            for key in lookups.iter() {
                black_box(map.get(key));
            }
        })
    });
}

fn churn<M: BenchMap<K, V>, K: BenchKey, V: BenchValue>(
    group: &mut BenchmarkGroup<'_, WallTime>,
    size: usize,
) {
    let toggles = (0..size as u64)
        .flat_map(|key| [(K::new(key), V::new(key)), (K::new(key), V::new(key))])
        .collect::<Vec<_>>();

    group.throughput(Throughput::Elements(size as u64 * 2));
    group.bench_function(format!("{}/{}", M::NAME, size), |b| {
        b.iter_batched(
            || {
                let mut toggles = toggles.clone();
                toggles.shuffle(&mut SmallRng::from_os_rng());
                toggles
            },
            |toggles| {
                let mut map = M::with_capacity(0);
                for (k, v) in toggles {
                    map.toggle(k, v);
                }
                black_box(map)
            },
            BatchSize::SmallInput,
        )
    });
}

#[derive(Clone, Copy)]
enum Operation {
    Insert,
    Remove,
    Find,
}

fn mixed_zipf<M: BenchMap<K, V>, K: BenchKey, V: BenchValue>(
    group: &mut BenchmarkGroup<'_, WallTime>,
    size: usize,
) {
    let mut rng = SmallRng::seed_from_u64(size as u64);
    let operations = (0..size)
        .map(|_| {
            let op_choice: f64 = rng.sample(distr::Uniform::new(0.0, 1.0).unwrap());
            if op_choice < 0.6 {
                Operation::Find
            } else if op_choice < 0.85 {
                Operation::Insert
            } else {
                Operation::Remove
            }
        })
        .collect::<Vec<Operation>>();

    let insert_distr = Zipf::new(size as f32 - 1.0, 1.0).unwrap();
    let find_remove_distr =
        Zipf::new(size as f32 * KEY_SPACE_MULTIPLIER as f32 - 1.0, 1.0).unwrap();

    group.throughput(Throughput::Elements(size as u64));
    group.bench_function(format!("{}/{}", M::NAME, size), |b| {
        b.iter_batched(
            || SmallRng::from_os_rng(),
            |mut rng| {
                let mut map = M::with_capacity(0);
                for op in operations.iter() {
                    match op {
                        Operation::Insert => {
                            let key = rng.sample(insert_distr) as u64;
                            map.insert(K::new(key), V::new(key));
                        }
                        Operation::Remove => {
                            let key = rng.sample(find_remove_distr) as u64;
                            black_box(map.remove(&K::new(key)));
                        }
                        Operation::Find => {
                            let key = rng.sample(find_remove_distr) as u64;
                            black_box(map.get(&K::new(key)));
                        }
                    }
                }
                black_box(map)
            },
            BatchSize::SmallInput,
        )
    });
}

fn iteration<M: BenchMap<K, V>, K: BenchKey, V: BenchValue>(
    group: &mut BenchmarkGroup<'_, WallTime>,
    size: usize,
) {
    let map: M = filled(&pairs::<K, V>(0..size as u64));

    group.throughput(Throughput::Elements(size as u64));
    group.bench_function(format!("{}/{}", M::NAME, size), |b| {
        b.iter(|| {
            let mut count = 0usize;
            map.for_each(|k, v| {
                black_box((k, v));
                count += 1;
            });
            black_box(count)
        })
    });
}

fn drain<M: BenchMap<K, V>, K: BenchKey, V: BenchValue>(
    group: &mut BenchmarkGroup<'_, WallTime>,
    size: usize,
) {
    let pairs = pairs::<K, V>(0..size as u64);

    group.throughput(Throughput::Elements(size as u64));
    group.bench_function(format!("{}/{}", M::NAME, size), |b| {
        b.iter_batched(
            || filled::<M, K, V>(&pairs),
            |mut map| {
                let count = map.drain_count();
                black_box((map, count))
            },
            BatchSize::SmallInput,
        )
    });
}

macro_rules! compare {
    ($name:ident, $bench:ident $(, $extra:expr)*) => {
        fn $name<K: BenchKey, V: BenchValue, const MAX_SIZE: usize>(c: &mut Criterion) {
            let mut group = group_for(
                c,
                &format!(
                    "{}_{}_{}",
                    stringify!($name),
                    core::any::type_name::<K>(),
                    core::any::type_name::<V>()
                ),
            );
            for &size in SIZES[..=MAX_SIZE].iter() {
                $bench::<FlatMap<K, V, SipHashBuilder>, K, V>(&mut group, size $(, $extra)*);
                $bench::<NodeMap<K, V, SipHashBuilder>, K, V>(&mut group, size $(, $extra)*);
                $bench::<HashbrownHashMap<K, V, SipHashBuilder>, K, V>(&mut group, size $(, $extra)*);
                $bench::<StdHashMap<K, V, SipHashBuilder>, K, V>(&mut group, size $(, $extra)*);
            }
            group.finish();
        }
    };
}

compare!(bench_insert_random, insert_random, false);
compare!(bench_insert_random_preallocated, insert_random, true);
compare!(bench_find_hit_miss, find_hit_miss);
compare!(bench_churn, churn);
compare!(bench_mixed_zipf, mixed_zipf);
compare!(bench_iteration, iteration);
compare!(bench_drain, drain);

criterion_group!(
    benches,
    bench_insert_random::<u64, u64, 4>,
    bench_insert_random::<String, u64, 4>,
    bench_insert_random::<String, LargeValue, 3>,
    bench_insert_random_preallocated::<u64, u64, 4>,
    bench_insert_random_preallocated::<String, LargeValue, 3>,
    bench_find_hit_miss::<u64, u64, 4>,
    bench_find_hit_miss::<String, u64, 4>,
    bench_find_hit_miss::<String, LargeValue, 3>,
    bench_churn::<u64, u64, 4>,
    bench_churn::<String, LargeValue, 3>,
    bench_mixed_zipf::<u64, u64, 4>,
    bench_mixed_zipf::<String, u64, 4>,
    bench_mixed_zipf::<String, LargeValue, 3>,
    bench_iteration::<u64, u64, 4>,
    bench_iteration::<String, LargeValue, 3>,
    bench_drain::<u64, u64, 4>,
    bench_drain::<String, LargeValue, 3>,
);
criterion_main!(benches);
