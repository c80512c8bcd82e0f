use strata_core::SkipList;

fn main() {
    println!("SkipList Demo\n");

    let mut list = SkipList::with_seed(12345);
    println!("Created empty skip list");
    println!("Length: {}, Empty: {}\n", list.len(), list.is_empty());

    println!("Inserting elements...");
    for i in [5, 2, 8, 1, 9, 3, 7, 4, 6] {
        list.insert(i.to_string(), format!("value_{}", i));
        println!("  Inserted key={}, value=value_{}", i, i);
    }
    println!("Length after inserts: {}\n", list.len());

    println!("Searching:");
    for key in ["1", "5", "9", "10"] {
        match list.search(key) {
            Ok(v) => println!("  search({}) = {}", key, v),
            Err(e) => println!("  search({}) failed: {}", key, e),
        }
    }
    println!();

    println!("Range query [3, 7):");
    for (key, value) in list.range("3", "7") {
        println!("  {} => {}", key, value);
    }
    println!();

    println!("Updating key=5 with new value...");
    list.insert("5", "UPDATED_VALUE");
    println!("  search(5) = {:?}", list.search("5"));
    println!("  Length: {}\n", list.len());

    println!("Deleting elements:");
    for key in ["2", "5", "8", "42"] {
        match list.delete(key) {
            Ok(v) => println!("  Deleted key={}, value={}", key, v),
            Err(e) => println!("  {}", e),
        }
    }
    println!("Length after deletes: {}\n", list.len());

    println!("Final structure:");
    print!("{}", list);
}
