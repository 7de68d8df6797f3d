use std::fmt::{Display, Formatter, Result};

use itertools::Itertools;

use crate::itemset::Itemset;
use crate::rules::search::SupportLookup;
use crate::types::Item;

/// An association rule `antecedent => consequent` over one frequent itemset.
///
/// `combi` holds every item of the itemset; the first `split` items form the
/// antecedent and the rest the consequent, each part sorted.
#[derive(Debug, Clone)]
pub struct Rule {
    split: usize,
    combi: Vec<Item>,
    pub confidence: f64,
    pub lift: f64,
}

impl Rule {
    /// All rules over `pattern` with a single-item consequent.
    pub fn from_pattern(pattern: &[Item]) -> Vec<Rule> {
        let mother = Rule {
            split: pattern.len(),
            combi: pattern.iter().cloned().sorted().collect(),
            confidence: 0.0,
            lift: 0.0,
        };
        mother.create_children(&[])
    }

    /// Rules obtained by moving one antecedent item into the consequent,
    /// skipping descendants of blacklisted rules.
    pub fn create_children(&self, blacklist: &[Self]) -> Vec<Self> {
        if self.split <= 1 {
            return vec![];
        }

        let new_split = self.split - 1;
        let mut rules = Vec::with_capacity(self.split);
        let mut tmp_combi = self.combi.to_owned();

        for _ in 0..self.split {
            tmp_combi[..self.split].rotate_left(1);

            let mut combi = tmp_combi.clone();
            combi[..new_split].sort_unstable();
            combi[new_split..].sort_unstable();

            let rule = Self {
                split: new_split,
                combi,
                confidence: 0.0,
                lift: 0.0,
            };

            if !rule.is_a_child_of_a_blacklisted_rule(blacklist) {
                rules.push(rule);
            }
        }

        rules
    }

    pub fn is_a_child_of_a_blacklisted_rule(&self, blacklist: &[Self]) -> bool {
        blacklist
            .iter()
            .any(|blacklisted_rule| self.is_child_of(blacklisted_rule))
    }

    pub(crate) fn consequent_items(&self) -> &[Item] {
        &self.combi[self.split..]
    }

    pub fn antecedent(&self) -> Itemset {
        self.combi[..self.split].iter().cloned().collect()
    }

    pub fn consequent(&self) -> Itemset {
        self.consequent_items().iter().cloned().collect()
    }

    pub fn itemset(&self) -> Itemset {
        self.combi.iter().cloned().collect()
    }

    fn is_child_of(&self, parent: &Self) -> bool {
        if self.combi.len() != parent.combi.len() {
            return false;
        }
        if self.consequent_items().len() <= parent.consequent_items().len() {
            return false;
        }

        let conseq = self.consequent_items();
        parent.consequent_items().iter().all(|x| conseq.contains(x))
    }

    /// Fills in confidence and lift. Returns false when a support needed for
    /// them is unknown.
    pub fn compute_confidence(&mut self, supports: &SupportLookup, num_transactions: f64) -> bool {
        let union = supports.get(&self.itemset());
        let antecedent = supports.get(&self.antecedent());
        let consequent = supports.get(&self.consequent());

        match (union, antecedent, consequent) {
            (Some(&union), Some(&antecedent), Some(&consequent)) if antecedent > 0 && consequent > 0 => {
                self.confidence = union as f64 / antecedent as f64;
                self.lift = self.confidence * num_transactions / consequent as f64;
                true
            }
            _ => false,
        }
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Rule) -> bool {
        // assumes same pattern
        self.split == other.split && self.consequent_items() == other.consequent_items()
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{} => {}", self.antecedent(), self.consequent())
    }
}
