pub mod apriori;
pub mod count;
