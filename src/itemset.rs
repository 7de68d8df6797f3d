use std::collections::BTreeSet;
use std::fmt::{Display, Formatter, Result};

use itertools::Itertools;

use crate::types::Item;

/// An unordered, duplicate-free set of items.
///
/// Backed by a `BTreeSet`, so equality, hashing and ordering never depend on
/// the order in which items were inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Itemset {
    items: BTreeSet<Item>,
}

impl Itemset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn singleton(item: Item) -> Self {
        let mut items = BTreeSet::new();
        items.insert(item);
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items.contains(item)
    }

    pub fn is_subset(&self, other: &Itemset) -> bool {
        self.items.is_subset(&other.items)
    }

    pub fn union(&self, other: &Itemset) -> Itemset {
        Self {
            items: self.items.union(&other.items).cloned().collect(),
        }
    }

    /// Items in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn to_vec(&self) -> Vec<Item> {
        self.items.iter().cloned().collect()
    }
}

impl FromIterator<Item> for Itemset {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<&'a str> for Itemset {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(str::to_owned).collect()
    }
}

impl IntoIterator for Itemset {
    type Item = Item;
    type IntoIter = std::collections::btree_set::IntoIter<Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl Display for Itemset {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{{{}}}", self.items.iter().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_insertion_order() {
        let x: Itemset = vec!["bread", "milk"].into_iter().collect();
        let y: Itemset = vec!["milk", "bread"].into_iter().collect();
        assert_eq!(x, y);
    }

    #[test]
    fn duplicates_collapse() {
        let x: Itemset = vec!["milk", "milk", "eggs"].into_iter().collect();
        assert_eq!(x.len(), 2);
    }

    #[test]
    fn union_and_subset() {
        let x: Itemset = vec!["a", "b"].into_iter().collect();
        let y: Itemset = vec!["a", "c"].into_iter().collect();
        let u = x.union(&y);

        assert_eq!(u.len(), 3);
        assert!(x.is_subset(&u));
        assert!(y.is_subset(&u));
        assert!(!u.is_subset(&x));
        assert_eq!(x.union(&x), x);
    }

    #[test]
    fn display_is_sorted() {
        let x: Itemset = vec!["c", "a", "b"].into_iter().collect();
        assert_eq!(x.to_string(), "{a, b, c}");
    }
}
