use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::wrap_pyfunction;

use crate::config::MiningConfig;
use crate::engine::Context;
use crate::error::Error;
use crate::itemsets::apriori::Apriori;
use crate::rules::search::generate_rules;
use crate::types::{Item, MiningResult, RawTransaction, SupportCount};

type PyItemset = Vec<Item>;

impl From<Error> for PyErr {
    fn from(error: Error) -> PyErr {
        PyValueError::new_err(error.to_string())
    }
}

fn run(
    transactions: Vec<RawTransaction>,
    min_support: f64,
    max_len: Option<usize>,
) -> Result<MiningResult, Error> {
    let mut config = MiningConfig::new(min_support);
    config.max_len = max_len;
    let context = Context::shared()?;
    Apriori::new(config).run(&context.parallelize(transactions))
}

/// Frequent itemsets as `(items, support_count)` pairs, smallest itemsets first.
#[pyfunction]
#[pyo3(text_signature = "(transactions, min_support, max_len=None)")]
fn apriori(
    transactions: Vec<RawTransaction>,
    min_support: f64,
    max_len: Option<usize>,
) -> PyResult<Vec<(PyItemset, SupportCount)>> {
    let result = run(transactions, min_support, max_len)?;
    Ok(result
        .into_entries()
        .into_iter()
        .map(|entry| (entry.itemset.to_vec(), entry.support_count))
        .collect())
}

/// Association rules as `(antecedent, consequent, confidence, lift)`.
#[pyfunction]
#[pyo3(text_signature = "(transactions, min_support, min_confidence)")]
fn association_rules(
    transactions: Vec<RawTransaction>,
    min_support: f64,
    min_confidence: f64,
) -> PyResult<Vec<(PyItemset, PyItemset, f64, f64)>> {
    let result = run(transactions, min_support, None)?;
    let rules = generate_rules(&result, min_confidence)?;
    Ok(rules
        .into_iter()
        .map(|rule| {
            (
                rule.antecedent().to_vec(),
                rule.consequent().to_vec(),
                rule.confidence,
                rule.lift,
            )
        })
        .collect())
}

#[pymodule]
fn apriori_rdd(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(apriori, m)?)?;
    m.add_function(wrap_pyfunction!(association_rules, m)?)?;
    Ok(())
}
