use tracing::debug;

use crate::engine::Dataset;
use crate::itemset::Itemset;
use crate::types::{Item, MinCount, SupportCount, SupportEntry, Transaction};

/// Frequent 1-itemsets: every item occurring in at least `min_count`
/// transactions, as a singleton itemset with its count.
pub fn generate_frequent_1_itemset_counts(
    transactions: &Dataset<Transaction>,
    min_count: MinCount,
) -> Dataset<SupportEntry> {
    debug!(min_count, "counting 1-itemsets");
    transactions
        .flat_map(|transaction: Transaction| transaction.into_iter())
        .map(|item: Item| (item, 1 as SupportCount))
        .reduce_by_key(|a, b| a + b, transactions.context().default_parallelism())
        .filter(move |&(_, count)| count as f64 >= min_count)
        .map(|(item, count)| SupportEntry::new(Itemset::singleton(item), count))
}

/// Counts every candidate against every transaction and keeps those reaching
/// `min_count`.
///
/// Each candidate is seeded with a zero count, so candidates contained in no
/// transaction still reach the threshold filter.
pub fn generate_frequent_k_itemset_counts(
    transactions: &Dataset<Transaction>,
    candidates: &Dataset<Itemset>,
    min_count: MinCount,
) -> Dataset<SupportEntry> {
    let seeds = candidates.map(|candidate| (candidate, 0 as SupportCount));
    let hits = transactions
        .cartesian(candidates)
        .map(|(transaction, candidate)| {
            let hit = candidate.is_subset(&transaction) as SupportCount;
            (candidate, hit)
        });

    seeds
        .union(&hits)
        .reduce_by_key(|a, b| a + b, candidates.context().default_parallelism())
        .filter(move |&(_, count)| count as f64 >= min_count)
        .map(SupportEntry::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Context, EngineConfig};
    use maplit::hashmap;
    use std::collections::HashMap;

    const A: &str = "Item A";
    const B: &str = "Item B";
    const C: &str = "Item C";
    const D: &str = "Item D";

    macro_rules! itemset {
        ($($x:expr),*) => {
            {
                let items: Vec<&str> = vec![$($x),*];
                items.into_iter().collect::<Itemset>()
            }
        };
    }

    fn context() -> Context {
        Context::new(EngineConfig::new().num_partitions(3)).unwrap()
    }

    fn as_map(level: Dataset<SupportEntry>) -> HashMap<Itemset, SupportCount> {
        level
            .collect()
            .unwrap()
            .into_iter()
            .map(|entry| (entry.itemset, entry.support_count))
            .collect()
    }

    fn count_1(transactions: Vec<Transaction>, min_count: MinCount) -> HashMap<Itemset, SupportCount> {
        as_map(generate_frequent_1_itemset_counts(
            &context().parallelize(transactions),
            min_count,
        ))
    }

    fn count_k(
        transactions: Vec<Transaction>,
        candidates: Vec<Itemset>,
        min_count: MinCount,
    ) -> HashMap<Itemset, SupportCount> {
        let ctx = context();
        as_map(generate_frequent_k_itemset_counts(
            &ctx.parallelize(transactions),
            &ctx.parallelize(candidates),
            min_count,
        ))
    }

    #[test]
    fn count_1_itemsets() {
        let counts = count_1(vec![itemset![A, B, D], itemset![A]], 0.0);
        assert_eq!(
            counts,
            hashmap! {
                itemset![A] => 2,
                itemset![B] => 1,
                itemset![D] => 1,
            }
        );
    }

    #[test]
    fn count_1_itemsets_with_min_count() {
        let transactions = vec![
            itemset![A, B, C],
            itemset![A],
            itemset![B],
            itemset![A, C],
        ];
        let counts = count_1(transactions, 2.0);
        assert_eq!(
            counts,
            hashmap! {
                itemset![A] => 3,
                itemset![B] => 2,
                itemset![C] => 2,
            }
        );
    }

    #[test]
    fn count_1_itemsets_threshold_is_not_rounded() {
        let transactions = vec![itemset![A, B], itemset![A, C], itemset![A, B, C]];
        assert_eq!(count_1(transactions.clone(), 2.5), hashmap! { itemset![A] => 3 });
        assert_eq!(count_1(transactions, 2.0).len(), 3);
    }

    #[test]
    fn count_1_itemsets_of_nothing() {
        assert!(count_1(vec![], 0.0).is_empty());
    }

    #[test]
    fn count_k_itemsets() {
        let transactions = vec![itemset![A, B]];
        let candidates = vec![itemset![A], itemset![B]];
        assert_eq!(
            count_k(transactions, candidates, 0.0),
            hashmap! { itemset![A] => 1, itemset![B] => 1 }
        );
    }

    #[test]
    fn count_k_itemsets_with_min_count() {
        let transactions = vec![
            itemset!["10", "11"],
            itemset!["10", "15"],
            itemset!["10", "13"],
            itemset!["10", "13"],
            itemset!["10", "13"],
            itemset!["11", "13"],
        ];
        let candidates = vec![
            itemset!["10", "11"],
            itemset!["10", "13"],
            itemset!["10", "15"],
            itemset!["11", "13"],
            itemset!["11", "15"],
        ];
        assert_eq!(
            count_k(transactions, candidates, 3.0),
            hashmap! { itemset!["10", "13"] => 3 }
        );
    }

    #[test]
    fn never_matching_candidate_keeps_a_zero_count() {
        let transactions = vec![itemset![A, B], itemset![C]];
        let candidates = vec![itemset![A, B], itemset![A, D]];
        assert_eq!(
            count_k(transactions, candidates, 0.0),
            hashmap! { itemset![A, B] => 1, itemset![A, D] => 0 }
        );
    }

    #[test]
    fn count_k_itemsets_without_transactions() {
        let candidates = vec![itemset![A, B]];
        assert_eq!(
            count_k(vec![], candidates.clone(), 0.0),
            hashmap! { itemset![A, B] => 0 }
        );
        assert!(count_k(vec![], candidates, 0.5).is_empty());
    }
}
