//! SKU disambiguation shared by the product and option passes.
//!
//! A [`SkuLedger`] covers one uniqueness scope: the whole productos file, or
//! the option rows of a single product. The first row carrying a SKU keeps it;
//! later duplicates get a prefix from [`sku_prefix`] and rows without a SKU are
//! filled from the same sequence.

use std::collections::{HashMap, HashSet};

use crate::domain::entities::table::Cell;

const ALPHABET: &[u8; 26] = b"abcdefghijklmnopqrstuvwxyz";

/// `a`..`z` for the first 26 occurrences, then `1`, `2`, ...
pub fn sku_prefix(count: usize) -> String {
    match ALPHABET.get(count) {
        Some(letter) => char::from(*letter).to_string(),
        None => (count - ALPHABET.len() + 1).to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkuAssignment {
    /// First occurrence, the row keeps its SKU.
    Kept(String),
    /// The row had no SKU and received one from the fill sequence.
    Filled(String),
    /// A later duplicate of `original`.
    Renamed { original: String, renamed: String },
}

impl SkuAssignment {
    /// The SKU the row ends up with.
    pub fn sku(&self) -> &str {
        match self {
            SkuAssignment::Kept(sku) | SkuAssignment::Filled(sku) => sku,
            SkuAssignment::Renamed { renamed, .. } => renamed,
        }
    }
}

#[derive(Debug, Default)]
pub struct SkuLedger {
    counts: HashMap<String, usize>,
    empty_count: usize,
    taken: HashSet<String>,
}

impl SkuLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decides the SKU of the next row in processing order.
    pub fn assign(&mut self, raw: &Cell) -> SkuAssignment {
        let original = raw.to_trimmed_string();
        if original.is_empty() {
            return SkuAssignment::Filled(self.next_fill());
        }

        let seen = self.counts.get(&original).copied().unwrap_or(0);
        if seen == 0 && self.taken.insert(original.clone()) {
            self.counts.insert(original.clone(), 1);
            return SkuAssignment::Kept(original);
        }

        // a bare SKU already handed out by the fill sequence counts as its first occurrence
        let mut ordinal = seen.max(1);
        let renamed = loop {
            let candidate = format!("{}{}", sku_prefix(ordinal - 1), original);
            ordinal += 1;
            if self.taken.insert(candidate.clone()) {
                break candidate;
            }
        };
        self.counts.insert(original.clone(), ordinal);

        SkuAssignment::Renamed { original, renamed }
    }

    fn next_fill(&mut self) -> String {
        loop {
            let candidate = sku_prefix(self.empty_count);
            self.empty_count += 1;
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}
