use tracing::debug;

use crate::engine::Dataset;
use crate::itemset::Itemset;
use crate::types::ItemsetLength;

/// Candidate itemsets of size `size` from the frequent itemsets of size
/// `size - 1`.
///
/// Every ordered pair of the previous level is unioned, self-pairs and mirror
/// pairs included, and unions of the wrong size are dropped. Duplicates are
/// removed by value. No subset pruning is done.
pub fn generate_candidates(prev: &Dataset<Itemset>, size: ItemsetLength) -> Dataset<Itemset> {
    debug!(size, "generating candidates");
    prev.cartesian(prev)
        .map(|(a, b)| a.union(&b))
        .filter(move |union| union.len() == size)
        .distinct()
}
