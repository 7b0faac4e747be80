use std::hash::BuildHasher;
use std::hash::RandomState;

use clap::Parser;
use clap::ValueEnum;
use robin_hood_map::HashTable;
use robin_hood_map::hash_table::Entry;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KeyPattern {
    /// Keys hashed with a randomly seeded SipHash.
    Random,
    /// Keys whose hashes share their low bits, so they crowd a few buckets.
    Clustered,
}

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "target_capacity", default_value_t = 1000)]
    target_capacity: usize,

    /// Fraction of the filled values to erase again before reporting.
    #[arg(short = 'e', long = "erase_fraction", default_value_t = 0.0)]
    erase_fraction: f64,

    #[arg(short = 'k', long = "keys", value_enum, default_value_t = KeyPattern::Random)]
    keys: KeyPattern,
}

fn main() {
    let args = Args::parse();
    let state = RandomState::new();
    let hash_u64 = |value: u64| match args.keys {
        KeyPattern::Random => state.hash_one(value),
        KeyPattern::Clustered => state.hash_one(value) << 12,
    };

    println!(
        "Creating HashTable with target capacity: {}",
        args.target_capacity
    );

    let mut table: HashTable<u64> = HashTable::with_capacity(args.target_capacity);

    println!(
        "Actual capacity: {} ({} buckets, max load factor {:.2})",
        table.capacity(),
        table.bucket_count(),
        table.max_load_factor()
    );
    println!("Filling table with u64 values...");

    let mut num_failures = 0;
    let num_values = table.capacity();
    for i in 0..num_values {
        let value = i as u64;
        let hash = hash_u64(value);

        match table.try_entry(hash, |&v| v == value, |&v| hash_u64(v)) {
            Ok(Entry::Vacant(entry)) => {
                entry.insert(value);
            }
            Ok(Entry::Occupied(_)) => {
                panic!("Value already exists in table: {}", value);
            }
            Err(err) => {
                num_failures += 1;
                eprintln!("Insert of {} failed: {}", value, err);
            }
        }
    }

    let to_erase = (num_values as f64 * args.erase_fraction.clamp(0.0, 1.0)) as usize;
    let mut erased = 0;
    for i in 0..to_erase {
        let value = i as u64;
        if table.remove(hash_u64(value), |&v| v == value).is_some() {
            erased += 1;
        }
    }

    println!("Inserted {} values, erased {}", table.len() + erased, erased);
    println!(
        "Final load factor: {:.2}% of buckets",
        table.load_factor() * 100.0
    );

    table.probe_histogram().print();
    table.debug_stats().print();
    println!(
        "Number of failed try_entry attempts: {} ({:.02}%)",
        num_failures,
        num_failures as f64 / num_values.max(1) as f64 * 100.0
    );
}
