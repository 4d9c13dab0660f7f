use clap::Parser;
use prime_hash::HashMap;
use prime_hash::OrderedMap;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "target_capacity", default_value_t = 1000)]
    target_capacity: usize,

    /// Percentage of entries to remove after filling.
    #[arg(short = 'r', long = "remove_percent", default_value_t = 25)]
    remove_percent: u64,

    /// Use the insertion-ordered map instead of the unordered one.
    #[arg(long)]
    ordered: bool,
}

fn main() {
    let args = Args::parse();

    println!(
        "Creating {} with target capacity: {}",
        if args.ordered { "OrderedMap" } else { "HashMap" },
        args.target_capacity
    );

    if args.ordered {
        run_ordered(&args);
    } else {
        run_unordered(&args);
    }
}

fn should_remove(key: u64, percent: u64) -> bool {
    key % 100 < percent
}

fn run_unordered(args: &Args) {
    let mut map: HashMap<u64, u64> = HashMap::with_capacity(args.target_capacity);
    println!("Actual capacity: {}", map.capacity());

    let num_values = map.capacity() as u64;
    for key in 0..num_values {
        map.insert(key, key * 2);
    }
    println!("Inserted {} values", map.len());
    map.table().print_chain_histogram();

    let removed = map.remove_where(|&k, _| should_remove(k, args.remove_percent));
    println!("Removed {} values; their slots are now on the free list", removed);
    map.table().debug_stats().print();

    let refill = removed as u64 / 2;
    for key in num_values..num_values + refill {
        map.insert(key, key * 2);
    }
    println!("Re-inserted {} values into freed slots", refill);
    map.table().debug_stats().print();

    map.shrink_to_fit();
    println!("After shrink_to_fit:");
    map.table().debug_stats().print();
    map.table().print_chain_histogram();
}

fn run_ordered(args: &Args) {
    let mut map: OrderedMap<u64, u64> = OrderedMap::with_capacity(args.target_capacity);
    println!("Actual capacity: {}", map.capacity());

    let num_values = map.capacity() as u64;
    for key in 0..num_values {
        map.insert(key, key * 2);
    }
    println!("Inserted {} values", map.len());
    map.table().print_chain_histogram();

    let removed = map.remove_where(|&k, _| should_remove(k, args.remove_percent));
    println!("Removed {} values; survivors were shifted down", removed);
    map.table().debug_stats().print();

    if let Ok((key, value)) = map.get_at(0) {
        println!("First entry is now {key} => {value}");
    }

    map.shrink_to_fit();
    println!("After shrink_to_fit:");
    map.table().debug_stats().print();
    map.table().print_chain_histogram();
}
