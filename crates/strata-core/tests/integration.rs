use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use strata_core::{Config, Error, SkipList};

const NUM_ELEMENTS: usize = 1000;

fn keys() -> Vec<String> {
    (0..NUM_ELEMENTS).map(|i| i.to_string()).collect()
}

fn assert_valid(list: &SkipList) {
    if let Err(msg) = list.check_invariants() {
        panic!("invariant violated: {}", msg);
    }
}

#[test]
fn test_empty_list_search_fails() {
    let list = SkipList::with_seed(1);
    assert!(list.is_empty());
    assert_eq!(list.search("x"), Err(Error::not_found("x")));
}

#[test]
fn test_long_keys() {
    let long_key = "extremely long key that never ends. Except it does. \
                    Nobody saw that one coming, and the list does not care how long a key is.";

    let mut list = SkipList::with_seed(2);
    list.insert("key", "key val");
    list.insert("longer key", "longer key val");
    list.insert(long_key, "longest key val");

    assert!(!list.is_empty());
    assert_eq!(list.search(long_key), Ok("longest key val"));
    assert!(list.search("not in there").unwrap_err().is_not_found());
    assert!(list.delete("not in there").is_err());
    assert_eq!(list.len(), 3);
}

#[test]
fn test_insert_search_delete_forward() {
    let mut list = SkipList::with_seed(3);
    for key in keys() {
        list.insert(key.as_str(), key.as_str());
    }
    assert_valid(&list);

    for key in keys() {
        assert_eq!(list.search(&key), Ok(key.as_str()));
    }

    for i in 0..NUM_ELEMENTS {
        list.delete(&i.to_string()).unwrap();
        let median = (NUM_ELEMENTS + i) / 2;
        if median > i {
            assert_eq!(list.search(&median.to_string()), Ok(median.to_string().as_str()));
        }
    }

    assert!(list.is_empty());
    assert_eq!(list.num_levels(), 1);
    assert_valid(&list);
}

#[test]
fn test_insert_search_delete_backward() {
    let mut list = SkipList::with_seed(4);
    for key in keys().into_iter().rev() {
        list.insert(key.as_str(), key.as_str());
    }
    assert_valid(&list);

    for key in keys().into_iter().rev() {
        assert_eq!(list.search(&key), Ok(key.as_str()));
    }

    for i in (0..NUM_ELEMENTS).rev() {
        list.delete(&i.to_string()).unwrap();
        if i > 0 {
            let half = i / 2;
            assert_eq!(list.search(&half.to_string()), Ok(half.to_string().as_str()));
        }
    }

    assert!(list.is_empty());
    assert_eq!(list.num_levels(), 1);
    assert_valid(&list);
}

#[test]
fn test_insert_search_delete_shuffled() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut elements = keys();
    elements.shuffle(&mut rng);

    let mut list = SkipList::with_seed(6);
    for key in &elements {
        list.insert(key.as_str(), key.as_str());
    }
    assert_valid(&list);

    for key in keys() {
        assert_eq!(list.search(&key), Ok(key.as_str()));
    }

    let mut order = elements.clone();
    order.shuffle(&mut rng);
    for pair in order.windows(2) {
        list.delete(&pair[0]).unwrap();
        assert_eq!(list.search(&pair[1]), Ok(pair[1].as_str()));
    }
    list.delete(&order[NUM_ELEMENTS - 1]).unwrap();

    assert!(list.is_empty());
    assert_valid(&list);
}

#[test]
fn test_iteration_is_sorted_after_churn() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut elements = keys();
    elements.shuffle(&mut rng);

    let mut list = SkipList::with_seed(8);
    for key in &elements {
        list.insert(key.as_str(), "v");
    }
    for key in elements.iter().step_by(3) {
        list.delete(key).unwrap();
    }

    let listed: Vec<_> = list.iter().map(|(k, _)| k.to_string()).collect();
    let mut expected: Vec<_> = keys()
        .into_iter()
        .filter(|k| !elements.iter().step_by(3).any(|e| e == k))
        .collect();
    expected.sort();
    assert_eq!(listed, expected);
    assert_eq!(list.len(), expected.len());
    assert_valid(&list);
}

#[test]
fn test_config_roundtrip_through_list() {
    let config = Config::new().with_seed(99).with_max_level(6).with_probability(0.5);
    let mut list = SkipList::with_config(config).unwrap();
    for key in keys() {
        list.insert(key, "v");
    }

    let stats = list.stats();
    assert_eq!(stats.len, NUM_ELEMENTS);
    assert_eq!(stats.max_level, 6);
    assert!(stats.num_levels <= 6);
    assert_eq!(stats.level_counts[0], NUM_ELEMENTS);
    assert_valid(&list);
}

#[test]
fn test_display_lists_every_entry_in_order() {
    let mut list = SkipList::with_seed(10);
    for i in 0..100 {
        list.insert(format!("{:02}", i), "val");
    }

    let rendered = list.to_string();
    assert!(rendered.starts_with("Header\n"));
    assert!(rendered.ends_with("End of List\n"));

    let mut last = 0;
    for i in 0..100 {
        let needle = format!("\t{:02}: val\n", i);
        let at = rendered.find(&needle).expect("entry missing from rendering");
        assert!(at >= last);
        last = at;
    }
}
