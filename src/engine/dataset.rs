use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use itertools::Itertools;
use tracing::debug;

use crate::engine::context::Context;
use crate::error::{Error, Result};

/// Anything that can live inside a [`Dataset`].
pub trait Data: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Data for T {}

pub(crate) type ComputeFn<T> = dyn Fn(usize) -> Result<Vec<T>> + Send + Sync;

/// A partitioned collection.
///
/// Narrow transformations (`map`, `flat_map`, `filter`, `union`, `cartesian`)
/// only compose per-partition functions. Shuffles (`reduce_by_key`,
/// `distinct`) and `cache` evaluate their parent on the context's worker pool
/// when called. A failure in that evaluation is held by the returned dataset
/// and surfaces from its next `count`, `collect` or `cache`.
pub struct Dataset<T> {
    context: Context,
    num_partitions: usize,
    compute: Arc<ComputeFn<T>>,
}

impl<T> Clone for Dataset<T> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
            num_partitions: self.num_partitions,
            compute: Arc::clone(&self.compute),
        }
    }
}

impl<T: Data> Dataset<T> {
    pub(crate) fn from_partitions(context: Context, partitions: Vec<Vec<T>>) -> Self {
        let num_partitions = partitions.len();
        let partitions = Arc::new(partitions);
        Self {
            context,
            num_partitions,
            compute: compute_fn(move |p| Ok(partitions[p].clone())),
        }
    }

    fn failed(context: Context, num_partitions: usize, error: Error) -> Self {
        Self {
            context,
            num_partitions,
            compute: compute_fn(move |_| Err(error.clone())),
        }
    }

    fn derive<U: Data>(&self, num_partitions: usize, compute: Arc<ComputeFn<U>>) -> Dataset<U> {
        Dataset {
            context: self.context.clone(),
            num_partitions,
            compute,
        }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn num_partitions(&self) -> usize {
        self.num_partitions
    }

    pub fn map<U, F>(&self, f: F) -> Dataset<U>
    where
        U: Data,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let parent = Arc::clone(&self.compute);
        self.derive(
            self.num_partitions,
            compute_fn(move |p| Ok(parent(p)?.into_iter().map(&f).collect())),
        )
    }

    pub fn flat_map<U, I, F>(&self, f: F) -> Dataset<U>
    where
        U: Data,
        I: IntoIterator<Item = U>,
        F: Fn(T) -> I + Send + Sync + 'static,
    {
        let parent = Arc::clone(&self.compute);
        self.derive(
            self.num_partitions,
            compute_fn(move |p| Ok(parent(p)?.into_iter().flat_map(&f).collect())),
        )
    }

    pub fn filter<F>(&self, predicate: F) -> Dataset<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let parent = Arc::clone(&self.compute);
        self.derive(
            self.num_partitions,
            compute_fn(move |p| Ok(parent(p)?.into_iter().filter(|x| predicate(x)).collect())),
        )
    }

    /// Partitions of `self` followed by partitions of `other`.
    pub fn union(&self, other: &Dataset<T>) -> Dataset<T> {
        let left = Arc::clone(&self.compute);
        let right = Arc::clone(&other.compute);
        let split = self.num_partitions;
        self.derive(
            self.num_partitions + other.num_partitions,
            compute_fn(move |p| if p < split { left(p) } else { right(p - split) }),
        )
    }

    /// Every ordered pair `(a, b)` with `a` from `self` and `b` from `other`.
    /// Output partition `i * m + j` pairs left partition `i` with right
    /// partition `j`, where `m` is the partition count of `other`.
    pub fn cartesian<U: Data>(&self, other: &Dataset<U>) -> Dataset<(T, U)> {
        let left = Arc::clone(&self.compute);
        let right = Arc::clone(&other.compute);
        let width = other.num_partitions;
        self.derive(
            self.num_partitions * width,
            compute_fn(move |p| {
                let xs = left(p / width)?;
                let ys = right(p % width)?;
                Ok(xs
                    .iter()
                    .cartesian_product(ys.iter())
                    .map(|(x, y)| (x.clone(), y.clone()))
                    .collect())
            }),
        )
    }

    pub fn count(&self) -> Result<usize> {
        let partitions = self.context.run(self.num_partitions, self.compute.as_ref())?;
        Ok(partitions.iter().map(Vec::len).sum())
    }

    pub fn collect(&self) -> Result<Vec<T>> {
        let partitions = self.context.run(self.num_partitions, self.compute.as_ref())?;
        Ok(partitions.into_iter().flatten().collect())
    }

    /// Evaluates the dataset now and keeps the partitions in memory.
    pub fn cache(&self) -> Result<Dataset<T>> {
        let partitions = self.context.run(self.num_partitions, self.compute.as_ref())?;
        Ok(Self::from_partitions(self.context.clone(), partitions))
    }
}

impl<T: Data + Eq + Hash> Dataset<T> {
    pub fn distinct(&self) -> Dataset<T> {
        self.distinct_with_num_partitions(self.context.default_parallelism())
    }

    pub fn distinct_with_num_partitions(&self, num_partitions: usize) -> Dataset<T> {
        self.map(|x| (x, ()))
            .reduce_by_key(|a, _| a, num_partitions)
            .map(|(x, _)| x)
    }
}

impl<K, V> Dataset<(K, V)>
where
    K: Data + Eq + Hash,
    V: Data,
{
    /// Groups equal keys and folds their values with `f`, which must be
    /// associative and commutative. Output is hash partitioned by key.
    pub fn reduce_by_key<F>(&self, f: F, num_partitions: usize) -> Dataset<(K, V)>
    where
        F: Fn(V, V) -> V + Send + Sync + 'static,
    {
        let num_partitions = num_partitions.max(1);
        let parent = Arc::clone(&self.compute);

        // map side: combine locally, then route each key to its bucket
        let map_side = |p: usize| -> Result<Vec<HashMap<K, V>>> {
            let mut buckets: Vec<HashMap<K, V>> = vec![HashMap::new(); num_partitions];
            for (key, value) in parent(p)? {
                let bucket = bucket_of(&key, num_partitions);
                combine_into(&mut buckets[bucket], key, value, &f);
            }
            Ok(buckets)
        };
        let map_outputs = match self.context.run(self.num_partitions, &map_side) {
            Ok(outputs) => outputs,
            Err(e) => return Self::failed(self.context.clone(), num_partitions, e),
        };

        let mut reduce_inputs: Vec<Vec<HashMap<K, V>>> = vec![Vec::new(); num_partitions];
        for buckets in map_outputs {
            for (bucket, combined) in buckets.into_iter().enumerate() {
                if !combined.is_empty() {
                    reduce_inputs[bucket].push(combined);
                }
            }
        }

        let reduce_side = |bucket: usize| -> Result<Vec<(K, V)>> {
            let mut merged: HashMap<K, V> = HashMap::new();
            for combined in &reduce_inputs[bucket] {
                for (key, value) in combined {
                    combine_into(&mut merged, key.clone(), value.clone(), &f);
                }
            }
            Ok(merged.into_iter().collect())
        };
        match self.context.run(num_partitions, &reduce_side) {
            Ok(partitions) => {
                debug!(
                    map_partitions = self.num_partitions,
                    reduce_partitions = num_partitions,
                    "shuffle stage complete"
                );
                Self::from_partitions(self.context.clone(), partitions)
            }
            Err(e) => Self::failed(self.context.clone(), num_partitions, e),
        }
    }
}

fn compute_fn<T, F>(f: F) -> Arc<ComputeFn<T>>
where
    F: Fn(usize) -> Result<Vec<T>> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn bucket_of<K: Hash>(key: &K, num_buckets: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    (hasher.finish() % num_buckets as u64) as usize
}

fn combine_into<K, V, F>(map: &mut HashMap<K, V>, key: K, value: V, f: &F)
where
    K: Eq + Hash,
    F: Fn(V, V) -> V,
{
    let value = match map.remove(&key) {
        Some(previous) => f(previous, value),
        None => value,
    };
    map.insert(key, value);
}
