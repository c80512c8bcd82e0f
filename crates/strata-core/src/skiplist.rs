//! Ordered string map on a skip list (Pugh, 1990).
//!
//! Nodes live in an [`Arena`] and link to each other by index. The header
//! sits at `max_level` and every chain ends at a single tail sentinel that
//! compares greater than any key.
//!
//! ```text
//! Level 2:  HEAD ─────────────► c ─────────────────► TAIL
//! Level 1:  HEAD ──► a ───────► c ──────► e ───────► TAIL
//! Level 0:  HEAD ──► a ──► b ──► c ──► d ──► e ──► TAIL
//! ```

use crate::config::{Config, MAX_LEVEL, PROBABILITY};
use crate::level::{GeometricLevelGenerator, LevelGenerator};
use crate::node::{Arena, Node, NodeId, NodeKey};
use crate::stats::Stats;
use crate::{Error, Result};
use std::cmp::Ordering;
use std::fmt;
use tracing::{debug, trace};

pub struct SkipList<G = GeometricLevelGenerator> {
    arena: Arena,
    head: NodeId,
    tail: NodeId,
    num_levels: usize,
    len: usize,
    levels: G,
}

impl SkipList {
    /// Empty list with the default level distribution, seeded from OS entropy.
    pub fn new() -> Self {
        Self::with_generator(GeometricLevelGenerator::from_entropy(
            MAX_LEVEL,
            PROBABILITY,
        ))
    }

    /// Empty list whose level draws are reproducible for a given `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_generator(GeometricLevelGenerator::seeded(MAX_LEVEL, PROBABILITY, seed))
    }

    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        let levels = match config.seed {
            Some(seed) => {
                GeometricLevelGenerator::seeded(config.max_level, config.probability, seed)
            }
            None => GeometricLevelGenerator::from_entropy(config.max_level, config.probability),
        };
        Ok(Self::with_generator(levels))
    }
}

impl Default for SkipList {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: LevelGenerator> SkipList<G> {
    pub fn with_generator(levels: G) -> Self {
        let max_level = levels.max_level().clamp(1, MAX_LEVEL);
        let (arena, head, tail) = Self::empty_arena(max_level);
        debug!(max_level, "created skip list");

        SkipList {
            arena,
            head,
            tail,
            num_levels: 1,
            len: 0,
            levels,
        }
    }

    fn empty_arena(max_level: usize) -> (Arena, NodeId, NodeId) {
        let mut arena = Arena::new();
        let tail = arena.alloc(Node::sentinel(NodeKey::Tail, 1, 0));
        // The tail links to itself; it is never advanced past.
        arena[tail].forward[0] = tail;
        let head = arena.alloc(Node::sentinel(NodeKey::Head, max_level, tail));
        (arena, head, tail)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.arena[self.head].forward[0] == self.tail
    }

    /// Highest level currently occupied by a node, or 1 when empty.
    pub fn num_levels(&self) -> usize {
        self.num_levels
    }

    pub fn max_level(&self) -> usize {
        self.arena[self.head].level()
    }

    fn random_level(&mut self) -> usize {
        self.levels.random_level().clamp(1, self.max_level())
    }

    /// Walks from the header toward `key`, top level first, calling `visit`
    /// with the last node seen on each level before descending. Returns that
    /// node's level-0 successor: the first node whose key is `>= key`.
    fn walk(&self, key: &str, mut visit: impl FnMut(usize, NodeId)) -> NodeId {
        let mut current = self.head;

        for level in (0..self.num_levels).rev() {
            loop {
                let next = self.arena[current].forward[level];
                if self.arena[next].compare_key(key) == Ordering::Less {
                    current = next;
                } else {
                    break;
                }
            }
            visit(level, current);
        }

        self.arena[current].forward[0]
    }

    fn find_update_path(&self, key: &str) -> ([NodeId; MAX_LEVEL], NodeId) {
        let mut update = [self.head; MAX_LEVEL];
        let candidate = self.walk(key, |level, node| update[level] = node);
        (update, candidate)
    }

    fn find(&self, key: &str) -> Option<NodeId> {
        let candidate = self.walk(key, |_, _| {});
        (self.arena[candidate].compare_key(key) == Ordering::Equal).then_some(candidate)
    }

    pub fn search(&self, key: &str) -> Result<&str> {
        self.get(key).ok_or_else(|| Error::not_found(key))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.find(key).map(|id| self.arena[id].value.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Inserts `key`, or overwrites its value if already present. Returns the
    /// previous value on overwrite.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        let (mut update, candidate) = self.find_update_path(&key);

        if self.arena[candidate].compare_key(&key) == Ordering::Equal {
            trace!(key = %key, "overwriting value");
            let old = std::mem::replace(&mut self.arena[candidate].value, value);
            return Some(old);
        }

        let new_level = self.random_level();
        if new_level > self.num_levels {
            for slot in &mut update[self.num_levels..new_level] {
                *slot = self.head;
            }
            debug!(from = self.num_levels, to = new_level, "raising list height");
            self.num_levels = new_level;
        }

        trace!(key = %key, level = new_level, "inserting node");
        let id = self.arena.alloc(Node::new(key, value, new_level, self.tail));
        for (level, &prev) in update.iter().enumerate().take(new_level) {
            let next = self.arena[prev].forward[level];
            self.arena[id].forward[level] = next;
            self.arena[prev].forward[level] = id;
        }

        self.len += 1;
        None
    }

    /// Removes `key`, returning its value. Fails without touching the list
    /// when the key is absent.
    pub fn delete(&mut self, key: &str) -> Result<String> {
        let (update, victim) = self.find_update_path(key);

        if self.arena[victim].compare_key(key) != Ordering::Equal {
            return Err(Error::not_found(key));
        }

        for (level, &prev) in update.iter().enumerate().take(self.num_levels) {
            // Forward arrays are prefixes, so nothing above this level links to the victim.
            if self.arena[prev].forward[level] != victim {
                break;
            }
            let next = self.arena[victim].forward[level];
            self.arena[prev].forward[level] = next;
        }

        let before = self.num_levels;
        while self.num_levels > 1 && self.arena[self.head].forward[self.num_levels - 1] == self.tail {
            self.num_levels -= 1;
        }
        if self.num_levels < before {
            debug!(from = before, to = self.num_levels, "lowering list height");
        }

        trace!(key, "deleted node");
        self.len -= 1;
        Ok(self.arena.free(victim).value)
    }

    pub fn clear(&mut self) {
        let (arena, head, tail) = Self::empty_arena(self.max_level());
        self.arena = arena;
        self.head = head;
        self.tail = tail;
        self.num_levels = 1;
        self.len = 0;
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            arena: &self.arena,
            current: self.arena[self.head].forward[0],
            remaining: self.len,
        }
    }

    /// Entries with `start <= key < end`, ascending.
    pub fn range<'a>(&'a self, start: &str, end: &'a str) -> Range<'a> {
        Range {
            arena: &self.arena,
            current: self.walk(start, |_, _| {}),
            end,
        }
    }

    pub fn stats(&self) -> Stats {
        let max_level = self.max_level();
        let mut level_counts = vec![0; max_level];

        let mut current = self.arena[self.head].forward[0];
        while current != self.tail {
            let node = &self.arena[current];
            for count in &mut level_counts[..node.level()] {
                *count += 1;
            }
            current = node.forward[0];
        }

        Stats {
            len: self.len,
            num_levels: self.num_levels,
            max_level,
            level_counts,
        }
    }

    /// Verifies ordering, prefix, height and bookkeeping invariants,
    /// describing the first violation found.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        let max_level = self.max_level();
        let mut tallest = 0;
        let mut reaching = vec![0usize; max_level];

        // Level 0: strictly ascending, tail-terminated, every node well formed.
        let mut prev: Option<&str> = None;
        let mut current = self.arena[self.head].forward[0];
        let mut count = 0;
        while current != self.tail {
            let node = &self.arena[current];
            let key = node
                .key_str()
                .ok_or_else(|| format!("sentinel node {} linked at level 0", current))?;
            if let Some(prev) = prev {
                if prev >= key {
                    return Err(format!("keys out of order at level 0: {:?} >= {:?}", prev, key));
                }
            }
            if node.level() == 0 || node.level() > max_level {
                return Err(format!("node {:?} has invalid level {}", key, node.level()));
            }
            for r in &mut reaching[..node.level()] {
                *r += 1;
            }
            tallest = tallest.max(node.level());
            prev = Some(key);
            count += 1;
            current = node.forward[0];
        }

        if count != self.len {
            return Err(format!("len is {} but level 0 holds {} nodes", self.len, count));
        }
        if self.arena.live() != self.len + 2 {
            return Err(format!(
                "arena holds {} live nodes for {} entries",
                self.arena.live(),
                self.len
            ));
        }
        if self.num_levels != tallest.max(1) {
            return Err(format!(
                "num_levels is {} but tallest node has level {}",
                self.num_levels, tallest
            ));
        }

        // Upper levels: ascending chains holding exactly the nodes that reach them.
        for level in 1..max_level {
            let mut prev: Option<&str> = None;
            let mut current = self.arena[self.head].forward[level];
            let mut count = 0;
            while current != self.tail {
                let node = &self.arena[current];
                if node.level() <= level {
                    return Err(format!(
                        "node {:?} of level {} linked at level {}",
                        node.key_str(),
                        node.level(),
                        level
                    ));
                }
                let key = node.key_str().ok_or_else(|| {
                    format!("sentinel node {} linked at level {}", current, level)
                })?;
                if let Some(prev) = prev {
                    if prev >= key {
                        return Err(format!(
                            "keys out of order at level {}: {:?} >= {:?}",
                            level, prev, key
                        ));
                    }
                }
                prev = Some(key);
                count += 1;
                current = node.forward[level];
            }
            if count != reaching[level] {
                return Err(format!(
                    "level {} links {} nodes but {} nodes reach it",
                    level, count, reaching[level]
                ));
            }
        }

        Ok(())
    }
}

impl<G: LevelGenerator> fmt::Display for SkipList<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let levels = self.num_levels;
        let rail = "| ".repeat(levels);
        let cap = "* ".repeat(levels);

        writeln!(f, "Header")?;
        writeln!(f, "{}", cap)?;
        writeln!(f, "{}", rail)?;

        let mut current = self.arena[self.head].forward[0];
        while current != self.tail {
            let node = &self.arena[current];
            let key = node.key_str().unwrap_or_default();
            writeln!(
                f,
                "{}{}\t{}: {}",
                "X ".repeat(node.level()),
                "| ".repeat(levels - node.level()),
                key,
                node.value
            )?;
            writeln!(f, "{}", rail)?;
            current = node.forward[0];
        }

        writeln!(f, "{}", cap)?;
        writeln!(f, "End of List")
    }
}

impl<G: LevelGenerator> fmt::Debug for SkipList<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SkipList {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut list = SkipList::new();
        list.extend(iter);
        list
    }
}

impl<G: LevelGenerator, K: Into<String>, V: Into<String>> Extend<(K, V)> for SkipList<G> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, G: LevelGenerator> IntoIterator for &'a SkipList<G> {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

pub struct Iter<'a> {
    arena: &'a Arena,
    current: NodeId,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let node = &self.arena[self.current];
        let key = node.key_str()?;
        self.current = node.forward[0];
        self.remaining -= 1;
        Some((key, node.value.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

pub struct Range<'a> {
    arena: &'a Arena,
    current: NodeId,
    end: &'a str,
}

impl<'a> Iterator for Range<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let node = &self.arena[self.current];
        let key = node.key_str()?;
        if key >= self.end {
            return None;
        }
        self.current = node.forward[0];
        Some((key, node.value.as_str()))
    }
}
