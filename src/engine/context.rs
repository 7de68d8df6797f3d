use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::debug;

use crate::engine::dataset::{Data, Dataset};
use crate::error::{Error, Result};

/// Settings for a [`Context`].
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    num_partitions: Option<usize>,
    num_threads: usize,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Partition count used by `parallelize` and `distinct`.
    /// Defaults to the size of the worker pool.
    pub fn num_partitions(mut self, num_partitions: usize) -> Self {
        self.num_partitions = Some(num_partitions);
        self
    }

    /// Worker threads. 0 lets rayon pick.
    pub fn num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }
}

/// Entry point of the collection engine. Owns the worker pool every dataset
/// created from it is evaluated on. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

#[derive(Debug)]
struct ContextInner {
    pool: ThreadPool,
    default_parallelism: usize,
}

impl Context {
    pub fn new(config: EngineConfig) -> Result<Self> {
        if config.num_partitions == Some(0) {
            return Err(Error::invalid_parameter("num_partitions must be at least 1"));
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(config.num_threads)
            .thread_name(|i| format!("apriori-worker-{}", i))
            .build()
            .map_err(|e| Error::engine(format!("cannot build worker pool: {}", e)))?;
        let default_parallelism = config
            .num_partitions
            .unwrap_or_else(|| pool.current_num_threads())
            .max(1);

        debug!(
            threads = pool.current_num_threads(),
            default_parallelism, "engine context created"
        );

        Ok(Self {
            inner: Arc::new(ContextInner {
                pool,
                default_parallelism,
            }),
        })
    }

    pub fn local() -> Result<Self> {
        Self::new(EngineConfig::default())
    }

    /// A process-wide context with default settings, built on first use.
    pub fn shared() -> Result<Self> {
        static SHARED: OnceLock<Context> = OnceLock::new();

        if let Some(context) = SHARED.get() {
            return Ok(context.clone());
        }
        let context = Self::local()?;
        Ok(SHARED.get_or_init(|| context).clone())
    }

    pub(crate) fn same_pool(&self, other: &Context) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn default_parallelism(&self) -> usize {
        self.inner.default_parallelism
    }

    pub fn parallelize<T: Data>(&self, data: Vec<T>) -> Dataset<T> {
        self.parallelize_with(data, self.default_parallelism())
    }

    /// Splits `data` into `num_partitions` contiguous partitions, some of which
    /// may be empty.
    pub fn parallelize_with<T: Data>(&self, data: Vec<T>, num_partitions: usize) -> Dataset<T> {
        let num_partitions = num_partitions.max(1);
        let len = data.len();
        let mut iter = data.into_iter();
        let partitions: Vec<Vec<T>> = (0..num_partitions)
            .map(|p| {
                let start = p * len / num_partitions;
                let end = (p + 1) * len / num_partitions;
                iter.by_ref().take(end - start).collect()
            })
            .collect();

        Dataset::from_partitions(self.clone(), partitions)
    }

    /// Evaluates every partition on the worker pool. A panicking task is
    /// reported as an engine failure for its partition.
    pub(crate) fn run<T, F>(&self, num_partitions: usize, compute: &F) -> Result<Vec<Vec<T>>>
    where
        T: Data,
        F: Fn(usize) -> Result<Vec<T>> + Sync + ?Sized,
    {
        self.inner.pool.install(|| {
            (0..num_partitions)
                .into_par_iter()
                .map(|p| {
                    panic::catch_unwind(AssertUnwindSafe(|| compute(p))).unwrap_or_else(|payload| {
                        Err(Error::engine(format!(
                            "task for partition {} panicked: {}",
                            p,
                            panic_message(payload.as_ref())
                        )))
                    })
                })
                .collect()
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}
