//! Running independent property checks concurrently.
//!
//! Each check stays internally sequential; only whole checks are spread over
//! worker threads. With a base seed, check `i` always runs with
//! `partition_seed(base, i)`, so the outcome does not depend on scheduling.

use std::fmt;

use crate::config::CheckConfig;
use crate::error::{CheckError, CheckResult};
use crate::execution::PropertyTest;
use crate::generator::Generator;
use crate::property::Property;
use crate::report::TestRunner;
use crate::rng::partition_seed;

/// Configuration for parallel execution
#[derive(Debug, Clone)]
pub struct ParallelConfig {
    /// Number of worker threads
    pub num_threads: usize,
    /// Base seed partitioned across checks; each check's own seed is used when `None`
    pub base_seed: Option<u64>,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            num_threads: num_cpus::get(),
            base_seed: None,
        }
    }
}

/// How a check ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Every trial held
    Passed,
    /// A counterexample was found
    Failed,
    /// The run ended with a [`CheckError`] before reaching a verdict
    Error,
}

/// Type-erased outcome of one check in a parallel batch
#[derive(Debug, Clone, PartialEq)]
pub struct CheckSummary {
    /// Label of the property
    pub label: String,
    /// Seed the check ran with, when it got far enough to pick one
    pub seed: Option<u64>,
    /// Passed, failed or errored
    pub verdict: Verdict,
    /// Formatted report, as produced by [`TestRunner::format_outcome`]
    pub report: String,
}

impl CheckSummary {
    /// Summarize the outcome of a `check*` call
    pub fn from_outcome<T: fmt::Debug>(
        label: String,
        outcome: &Result<CheckResult<T>, CheckError>,
    ) -> Self {
        let (seed, verdict) = match outcome {
            Ok(result) if result.is_passed() => (Some(result.seed()), Verdict::Passed),
            Ok(result) => (Some(result.seed()), Verdict::Failed),
            Err(_) => (None, Verdict::Error),
        };
        Self {
            label,
            seed,
            verdict,
            report: TestRunner::format_outcome(outcome),
        }
    }

    /// Whether the check passed
    pub fn is_passed(&self) -> bool {
        self.verdict == Verdict::Passed
    }
}

type Job<'a> = Box<dyn FnOnce(Option<u64>) -> CheckSummary + Send + 'a>;

/// A batch of independent checks to run on worker threads
pub struct ParallelChecks<'a> {
    config: ParallelConfig,
    jobs: Vec<Job<'a>>,
}

impl<'a> ParallelChecks<'a> {
    /// Create an empty batch with the default parallel configuration
    pub fn new() -> Self {
        Self::with_config(ParallelConfig::default())
    }

    /// Create an empty batch
    pub fn with_config(config: ParallelConfig) -> Self {
        Self {
            config,
            jobs: Vec::new(),
        }
    }

    /// Queue a check; results come back in the order checks were added
    pub fn add<T, G, P, S>(
        &mut self,
        label: S,
        generator: G,
        property: P,
        config: CheckConfig,
    ) -> &mut Self
    where
        T: Clone + fmt::Debug + 'a,
        G: Generator<T> + Send + 'a,
        P: Property<T> + Send + 'a,
        S: Into<String>,
    {
        let label = label.into();
        self.jobs.push(Box::new(move |seed: Option<u64>| {
            let mut config = config;
            if seed.is_some() {
                config.seed = seed;
            }
            let outcome = PropertyTest::new(generator, property, config)
                .with_label(label.clone())
                .run();
            CheckSummary::from_outcome(label, &outcome)
        }));
        self
    }

    /// Number of queued checks
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Whether no check has been queued
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Run every queued check and return the summaries in submission order
    pub fn run(self) -> Vec<CheckSummary> {
        if self.jobs.is_empty() {
            return Vec::new();
        }

        let total = self.jobs.len();
        let num_threads = self.config.num_threads.clamp(1, total);
        let base_seed = self.config.base_seed;

        let mut batches: Vec<Vec<(usize, Job<'a>)>> =
            (0..num_threads).map(|_| Vec::new()).collect();
        for (index, job) in self.jobs.into_iter().enumerate() {
            batches[index % num_threads].push((index, job));
        }

        // Use crossbeam for scoped threads to avoid lifetime issues
        let joined = crossbeam::scope(|s| {
            let handles: Vec<_> = batches
                .into_iter()
                .map(|batch| {
                    s.spawn(move |_| {
                        batch
                            .into_iter()
                            .map(|(index, job)| {
                                let seed = base_seed.map(|base| partition_seed(base, index));
                                (index, job(seed))
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join())
                .collect::<Vec<_>>()
        });

        let mut summaries = Vec::with_capacity(total);
        let results = joined.unwrap_or_else(|payload| std::panic::resume_unwind(payload));
        for result in results {
            match result {
                Ok(batch) => summaries.extend(batch),
                Err(payload) => std::panic::resume_unwind(payload),
            }
        }

        summaries.sort_by_key(|(index, _)| *index);
        summaries.into_iter().map(|(_, summary)| summary).collect()
    }
}

impl Default for ParallelChecks<'_> {
    fn default() -> Self {
        Self::new()
    }
}
