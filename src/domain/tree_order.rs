//! Deterministic tree-order comparison of content items.
//!
//! Rule precedence follows the position of redirect map records in the
//! content tree: a depth-first, pre-order walk where siblings are visited by
//! sort order and then by name. An ancestor always precedes its descendants.

use std::cmp::Ordering;

use crate::domain::entities::{ContentItem, TreeStep};

/// Comparator signature accepted by the rule loader.
pub type ItemComparator = fn(&ContentItem, &ContentItem) -> Ordering;

/// Orders items by their lineage in pre-order.
///
/// Both items must carry lineages relative to the same origin, as returned by
/// a single `get_descendants` call.
pub fn tree_order(a: &ContentItem, b: &ContentItem) -> Ordering {
    compare_lineage(&a.lineage, &b.lineage)
}

fn compare_lineage(a: &[TreeStep], b: &[TreeStep]) -> Ordering {
    for (left, right) in a.iter().zip(b.iter()) {
        let ordering = left
            .sort_order
            .cmp(&right.sort_order)
            .then_with(|| compare_names(&left.name, &right.name));

        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    // Common prefix: the ancestor (shorter lineage) comes first.
    a.len().cmp(&b.len())
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}
