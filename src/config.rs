use crate::error::{Error, Result};
use crate::types::{ItemsetLength, MinCount};

/// Parameters of a mining run.
#[derive(Debug, Clone, PartialEq)]
pub struct MiningConfig {
    /// Fraction of transactions an itemset must appear in, within (0, 1].
    pub min_support: f64,
    /// Largest itemset size to mine. `None` runs until the level loop stops on
    /// its own.
    pub max_len: Option<ItemsetLength>,
}

impl MiningConfig {
    pub fn new(min_support: f64) -> Self {
        Self {
            min_support,
            max_len: None,
        }
    }

    pub fn with_max_len(mut self, max_len: ItemsetLength) -> Self {
        self.max_len = Some(max_len);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.min_support > 0.0 && self.min_support <= 1.0) {
            return Err(Error::invalid_parameter(format!(
                "min_support must be within (0, 1], got {}",
                self.min_support
            )));
        }
        if self.max_len == Some(0) {
            return Err(Error::invalid_parameter("max_len must be at least 1"));
        }
        Ok(())
    }

    /// `min_support * num_transactions`, never rounded.
    pub fn min_count(&self, num_transactions: usize) -> MinCount {
        self.min_support * num_transactions as f64
    }
}
