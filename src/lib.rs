//! Frequent itemset mining with level-wise Apriori over a partitioned,
//! rayon-backed collection engine.
//!
//! ```no_run
//! use apriori_rdd::{apriori, Context};
//!
//! let context = Context::local()?;
//! let transactions = context.parallelize(vec![
//!     vec!["bread".to_string(), "milk".to_string()],
//!     vec!["bread".to_string(), "eggs".to_string()],
//! ]);
//! for entry in apriori(&transactions, 0.5)?.iter() {
//!     println!("{} {}", entry.itemset, entry.support_count);
//! }
//! # Ok::<(), apriori_rdd::Error>(())
//! ```

pub mod combi;
pub mod config;
pub mod engine;
pub mod error;
pub mod itemset;
pub mod itemsets;
pub mod rules;
pub mod types;

#[cfg(feature = "python")]
mod wrapper;

pub use config::MiningConfig;
pub use engine::{Context, Data, Dataset, EngineConfig};
pub use error::{Error, Result};
pub use itemset::Itemset;
pub use itemsets::apriori::Apriori;
pub use rules::{generate_rules, Rule};
pub use types::{Item, MiningResult, RawTransaction, SupportCount, SupportEntry};

/// Frequent itemsets of `input` at `min_support`, level by level.
pub fn apriori(input: &Dataset<RawTransaction>, min_support: f64) -> Result<MiningResult> {
    Apriori::new(MiningConfig::new(min_support)).run(input)
}

/// Like [`apriori`], for transactions held in a local vector. Runs on the
/// shared default context.
pub fn mine(transactions: Vec<RawTransaction>, min_support: f64) -> Result<MiningResult> {
    let context = Context::shared()?;
    apriori(&context.parallelize(transactions), min_support)
}
