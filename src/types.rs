use crate::itemset::Itemset;

pub type Item = String;
pub type RawTransaction = Vec<Item>;
pub type Transaction = Itemset;

pub type SupportCount = u64;
/// Absolute support threshold. Kept fractional and compared exactly.
pub type MinCount = f64;
pub type ItemsetLength = usize;

/// An itemset paired with the number of transactions containing it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SupportEntry {
    pub itemset: Itemset,
    pub support_count: SupportCount,
}

impl SupportEntry {
    pub fn new(itemset: Itemset, support_count: SupportCount) -> Self {
        Self {
            itemset,
            support_count,
        }
    }
}

impl From<(Itemset, SupportCount)> for SupportEntry {
    fn from((itemset, support_count): (Itemset, SupportCount)) -> Self {
        Self::new(itemset, support_count)
    }
}

pub type Level = Vec<SupportEntry>;

/// Frequent itemsets grouped by level, L1 first, together with the number of
/// transactions they were mined from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MiningResult {
    num_transactions: usize,
    levels: Vec<Level>,
}

impl MiningResult {
    pub(crate) fn from_levels(num_transactions: usize, levels: Vec<Level>) -> Self {
        Self {
            num_transactions,
            levels,
        }
    }

    pub fn num_transactions(&self) -> usize {
        self.num_transactions
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Level `size`, counting from 1.
    pub fn level(&self, size: ItemsetLength) -> Option<&Level> {
        size.checked_sub(1).and_then(|i| self.levels.get(i))
    }

    pub fn len(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All entries in level order.
    pub fn iter(&self) -> impl Iterator<Item = &SupportEntry> {
        self.levels.iter().flatten()
    }

    pub fn support_count(&self, itemset: &Itemset) -> Option<SupportCount> {
        self.level(itemset.len())?
            .iter()
            .find(|entry| &entry.itemset == itemset)
            .map(|entry| entry.support_count)
    }

    pub fn into_entries(self) -> Vec<SupportEntry> {
        self.levels.into_iter().flatten().collect()
    }
}
