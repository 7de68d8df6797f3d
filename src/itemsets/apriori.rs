use tracing::{debug, info};

use crate::combi::generate_candidates;
use crate::config::MiningConfig;
use crate::engine::Dataset;
use crate::error::Result;
use crate::itemset::Itemset;
use crate::itemsets::count::{generate_frequent_1_itemset_counts, generate_frequent_k_itemset_counts};
use crate::types::{ItemsetLength, Level, MinCount, MiningResult, RawTransaction, SupportEntry, Transaction};

/// Level-wise Apriori over a partitioned dataset.
#[derive(Debug, Clone)]
pub struct Apriori {
    config: MiningConfig,
}

enum State {
    Init,
    CountingL1 {
        transactions: Dataset<Transaction>,
        min_count: MinCount,
    },
    Iterating {
        size: ItemsetLength,
        transactions: Dataset<Transaction>,
        min_count: MinCount,
        prev: Dataset<SupportEntry>,
        prev_len: usize,
    },
    Done,
}

impl Apriori {
    pub fn new(config: MiningConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MiningConfig {
        &self.config
    }

    /// Mines all frequent itemsets of `input`.
    ///
    /// The loop keeps going while the last level holds more than one itemset,
    /// so it stops at a level of size 1 as well as at an empty one.
    pub fn run(&self, input: &Dataset<RawTransaction>) -> Result<MiningResult> {
        self.config.validate()?;

        let mut levels: Vec<Level> = Vec::new();
        let mut num_transactions = 0;
        let mut state = State::Init;

        loop {
            state = match state {
                State::Init => {
                    num_transactions = input.count()?;
                    let min_count = self.config.min_count(num_transactions);
                    info!(
                        num_transactions,
                        min_support = self.config.min_support,
                        min_count,
                        "starting apriori"
                    );
                    let transactions = input
                        .map(|raw: RawTransaction| raw.into_iter().collect::<Itemset>())
                        .cache()?;
                    State::CountingL1 {
                        transactions,
                        min_count,
                    }
                }
                State::CountingL1 {
                    transactions,
                    min_count,
                } => {
                    let (level, entries) =
                        materialize(generate_frequent_1_itemset_counts(&transactions, min_count))?;
                    let prev_len = entries.len();
                    info!(size = 1, frequent = prev_len, "level complete");
                    if entries.is_empty() {
                        State::Done
                    } else {
                        levels.push(entries);
                        State::Iterating {
                            size: 2,
                            transactions,
                            min_count,
                            prev: level,
                            prev_len,
                        }
                    }
                }
                State::Iterating {
                    size,
                    transactions,
                    min_count,
                    prev,
                    prev_len,
                } => {
                    if !self.should_continue(size, prev_len) {
                        State::Done
                    } else {
                        let candidates =
                            generate_candidates(&prev.map(|entry| entry.itemset), size).cache()?;
                        let num_candidates = candidates.count()?;
                        debug!(size, num_candidates, "candidates ready");
                        let (level, entries) = materialize(generate_frequent_k_itemset_counts(
                            &transactions,
                            &candidates,
                            min_count,
                        ))?;
                        let prev_len = entries.len();
                        info!(size, frequent = prev_len, "level complete");
                        levels.push(entries);
                        State::Iterating {
                            size: size + 1,
                            transactions,
                            min_count,
                            prev: level,
                            prev_len,
                        }
                    }
                }
                State::Done => break,
            };
        }

        let result = MiningResult::from_levels(num_transactions, levels);
        info!(
            levels = result.levels().len(),
            frequent = result.len(),
            "apriori finished"
        );
        Ok(result)
    }

    fn should_continue(&self, size: ItemsetLength, prev_len: usize) -> bool {
        prev_len > 1 && self.config.max_len.map_or(true, |max_len| size <= max_len)
    }
}

/// Evaluates a level once, returning it both cached and as sorted entries.
fn materialize(level: Dataset<SupportEntry>) -> Result<(Dataset<SupportEntry>, Level)> {
    let level = level.cache()?;
    let mut entries = level.collect()?;
    entries.sort_unstable_by(|a, b| a.itemset.cmp(&b.itemset));
    Ok((level, entries))
}
