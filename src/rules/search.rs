use std::collections::{HashMap, HashSet, VecDeque};

use rayon::prelude::*;
use tracing::debug;

use crate::error::{Error, Result};
use crate::itemset::Itemset;
use crate::rules::rule::Rule;
use crate::types::{Item, MiningResult, SupportCount, SupportEntry};

pub type SupportLookup = HashMap<Itemset, SupportCount>;

/// Association rules from every frequent itemset of size 2 or more whose
/// confidence reaches `min_confidence`. Lift is relative to the transaction
/// count recorded in `result`.
pub fn generate_rules(result: &MiningResult, min_confidence: f64) -> Result<Vec<Rule>> {
    if !(0.0..=1.0).contains(&min_confidence) {
        return Err(Error::invalid_parameter(format!(
            "min_confidence must be within [0, 1], got {}",
            min_confidence
        )));
    }

    let supports: SupportLookup = result
        .iter()
        .map(|entry| (entry.itemset.clone(), entry.support_count))
        .collect();
    let patterns: Vec<&SupportEntry> = result.levels().iter().skip(1).flatten().collect();
    let num_transactions = result.num_transactions() as f64;

    let rules: Vec<Rule> = patterns
        .par_iter()
        .flat_map_iter(|entry| bfs(&entry.itemset.to_vec(), min_confidence, &supports, num_transactions))
        .collect();

    debug!(patterns = patterns.len(), rules = rules.len(), "rules generated");
    Ok(rules)
}

/// Given a pattern, find the rules over it that reach `min_confidence`.
///
/// Consequents grow one item per round. Once a rule misses the threshold,
/// rules with a larger consequent containing its own are never evaluated.
pub fn bfs(
    pattern: &[Item],
    min_confidence: f64,
    supports: &SupportLookup,
    num_transactions: f64,
) -> Vec<Rule> {
    let mut queue: VecDeque<Rule> = VecDeque::new();
    let mut seen: HashSet<Vec<Item>> = HashSet::new();
    let mut blacklist = vec![];
    let mut final_rules = vec![];

    for rule in Rule::from_pattern(pattern) {
        seen.insert(rule.consequent_items().to_vec());
        queue.push_back(rule);
    }

    while let Some(mut rule) = queue.pop_front() {
        if rule.is_a_child_of_a_blacklisted_rule(&blacklist) {
            continue;
        }

        if rule.compute_confidence(supports, num_transactions) && rule.confidence >= min_confidence {
            for child in rule.create_children(&blacklist) {
                if seen.insert(child.consequent_items().to_vec()) {
                    queue.push_back(child);
                }
            }
            final_rules.push(rule);
        } else {
            blacklist.push(rule);
        }
    }

    final_rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::hashset;

    macro_rules! itemset {
        ($($x:expr),*) => {
            {
                let items: Vec<&str> = vec![$($x),*];
                items.into_iter().collect::<Itemset>()
            }
        };
    }

    fn entry(itemset: Itemset, count: SupportCount) -> SupportEntry {
        SupportEntry::new(itemset, count)
    }

    fn as_pairs(rules: &[Rule]) -> HashSet<(Itemset, Itemset)> {
        rules
            .iter()
            .map(|rule| (rule.antecedent(), rule.consequent()))
            .collect()
    }

    fn three_transactions(num_transactions: usize) -> MiningResult {
        MiningResult::from_levels(
            num_transactions,
            vec![
                vec![
                    entry(itemset!["a"], 3),
                    entry(itemset!["b"], 2),
                    entry(itemset!["c"], 2),
                ],
                vec![entry(itemset!["a", "b"], 2), entry(itemset!["a", "c"], 2)],
            ],
        )
    }

    #[test]
    fn rules_from_three_transactions() {
        let rules = generate_rules(&three_transactions(3), 0.8).unwrap();

        assert_eq!(
            as_pairs(&rules),
            hashset! {
                (itemset!["b"], itemset!["a"]),
                (itemset!["c"], itemset!["a"]),
            }
        );
        for rule in &rules {
            assert_eq!(rule.confidence, 1.0);
            assert_eq!(rule.lift, 1.0);
        }
    }

    #[test]
    fn blacklisted_consequents_prune_larger_ones() {
        let result = MiningResult::from_levels(20, vec![
            vec![
                entry(itemset!["1"], 9),
                entry(itemset!["2"], 8),
                entry(itemset!["3"], 12),
                entry(itemset!["4"], 13),
            ],
            vec![
                entry(itemset!["1", "2"], 4),
                entry(itemset!["1", "3"], 5),
                entry(itemset!["1", "4"], 6),
                entry(itemset!["2", "3"], 3),
                entry(itemset!["2", "4"], 5),
                entry(itemset!["3", "4"], 3),
            ],
            vec![
                entry(itemset!["1", "2", "3"], 3),
                entry(itemset!["1", "2", "4"], 3),
                entry(itemset!["1", "3", "4"], 3),
                entry(itemset!["2", "3", "4"], 3),
            ],
            vec![entry(itemset!["1", "2", "3", "4"], 2)],
        ]);

        let rules = generate_rules(&result, 0.8).unwrap();

        assert_eq!(
            as_pairs(&rules),
            hashset! {
                (itemset!["2", "3"], itemset!["1"]),
                (itemset!["3", "4"], itemset!["1"]),
                (itemset!["3", "4"], itemset!["2"]),
                (itemset!["2", "3"], itemset!["4"]),
            }
        );
    }

    #[test]
    fn lift_uses_the_mined_transaction_count() {
        let rules = generate_rules(&three_transactions(6), 0.8).unwrap();

        assert_eq!(rules.len(), 2);
        for rule in &rules {
            assert_eq!(rule.confidence, 1.0);
            assert_eq!(rule.lift, 2.0);
        }
    }

    #[test]
    fn zero_confidence_keeps_every_rule() {
        let supports: SupportLookup = vec![
            (itemset!["a"], 2),
            (itemset!["b"], 2),
            (itemset!["c"], 2),
            (itemset!["a", "b"], 2),
            (itemset!["a", "c"], 2),
            (itemset!["b", "c"], 2),
            (itemset!["a", "b", "c"], 2),
        ]
        .into_iter()
        .collect();
        let pattern: Vec<Item> = itemset!["a", "b", "c"].to_vec();

        let rules = bfs(&pattern, 0.0, &supports, 2.0);

        // three single-item and three two-item consequents
        assert_eq!(rules.len(), 6);
        assert_eq!(as_pairs(&rules).len(), 6);
    }

    #[test]
    fn no_rules_from_single_items() {
        let result = MiningResult::from_levels(1, vec![vec![entry(itemset!["x"], 1)]]);
        assert!(generate_rules(&result, 0.5).unwrap().is_empty());
    }

    #[test]
    fn invalid_confidence_is_rejected() {
        let result = MiningResult::default();
        assert!(matches!(
            generate_rules(&result, 1.5),
            Err(Error::InvalidParameter(_))
        ));
        assert!(generate_rules(&result, -0.1).is_err());
    }
}
