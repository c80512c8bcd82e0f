use strata_core::{GeometricLevelGenerator, LevelGenerator, SkipList, MAX_LEVEL, PROBABILITY};
use std::collections::BTreeMap;

fn demonstrate_level_distribution() {
    println!("=== Level Distribution Analysis ===\n");
    println!("With P={}, we expect:", PROBABILITY);
    println!("  Level 1: ~75% of nodes");
    println!("  Level 2: ~18.75% of nodes");
    println!("  Level 3: ~4.69% of nodes");
    println!("  etc.\n");

    let iterations = 10000;
    let mut levels = GeometricLevelGenerator::seeded(MAX_LEVEL, PROBABILITY, 12345);
    let mut counts = BTreeMap::new();

    for _ in 0..iterations {
        *counts.entry(levels.random_level()).or_insert(0) += 1;
    }

    println!("Actual distribution from {} draws:", iterations);
    for (level, count) in counts {
        let percentage = (count as f64 / iterations as f64) * 100.0;
        let bar = "#".repeat((percentage / 2.0) as usize);
        println!("  Level {:2}: {:5} draws ({:5.2}%) {}", level, count, percentage, bar);
    }
    println!();
}

fn main() {
    println!("=== SkipList Visualization Example ===\n");

    demonstrate_level_distribution();

    println!("=== Operation Visualization ===\n");

    let mut list = SkipList::with_seed(7);

    println!("Inserting: e, b, h, a, i, c");
    for key in ["e", "b", "h", "a", "i", "c"] {
        list.insert(key, key.to_uppercase());
    }
    print!("{}", list);
    println!();

    println!("Deleting: b, h");
    for key in ["b", "h"] {
        match list.delete(key) {
            Ok(v) => println!("  Deleted key={}, value={}", key, v),
            Err(e) => println!("  {}", e),
        }
    }
    print!("{}", list);
    println!();

    println!("=== Shape of a 10,000 entry list ===\n");
    let mut big = SkipList::with_seed(99);
    for i in 0..10_000 {
        big.insert(format!("{:05}", i), "v");
    }
    print!("{}", big.stats());
}
