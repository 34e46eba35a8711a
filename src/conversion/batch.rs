use anyhow::{Context, Result};
use rayon::prelude::*;

use super::convert::{self, EncodeSettings};
use super::report::{ConversionReport, Outcome};
use super::resolve::{PathResolver, ResolveError, WorkItem};
use super::ConversionRequest;

/// Receives streaming progress from a batch run.
///
/// Implemented by the CLI renderer and the JSON-lines emitter; a GUI log
/// pane would implement it the same way. Sinks must be thread-safe because
/// parallel runs emit outcomes from worker threads.
pub trait ProgressSink: Send + Sync {
    /// Called once after resolution with the number of work items.
    fn on_start(&self, _total: usize) {}

    /// Called for every outcome, before the next item is attempted
    /// (sequential runs) or as workers finish (parallel runs).
    fn on_outcome(&self, outcome: &Outcome);

    /// Called once with the sealed report.
    fn on_finish(&self, _report: &ConversionReport) {}
}

/// Sink for callers that only want the final report.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn on_outcome(&self, _outcome: &Outcome) {}
}

/// Drives the resolver's work items through the conversion unit and
/// aggregates outcomes into a report.
///
/// One item's failure never stops the rest of the batch; the run only fails
/// as a whole when resolution itself fails, in which case no report is
/// produced.
pub struct BatchRunner {
    jobs: usize,
    pool: Option<rayon::ThreadPool>,
}

impl BatchRunner {
    /// `jobs == 0` auto-detects the CPU count; `jobs == 1` runs
    /// sequentially.
    pub fn new(jobs: usize) -> Result<Self> {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        let pool = if jobs > 1 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(jobs)
                    .build()
                    .context("failed to initialize worker pool")?,
            )
        } else {
            None
        };
        Ok(Self { jobs, pool })
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    pub fn run(
        &self,
        request: &ConversionRequest,
        sink: &dyn ProgressSink,
    ) -> Result<ConversionReport, ResolveError> {
        let resolver = PathResolver::new(request)?;
        sink.on_start(resolver.len());

        let settings = EncodeSettings {
            target: request.target_format,
            quality: request.quality,
            lossless: request.lossless,
        };

        let mut report = ConversionReport::default();
        match &self.pool {
            None => {
                for item in resolver.iter() {
                    let outcome = convert::convert(&item, &settings);
                    sink.on_outcome(&outcome);
                    report.push(outcome);
                }
            }
            Some(pool) => {
                // Workers emit progress as they finish; the report is
                // re-sorted to enumeration order before it is sealed.
                let items: Vec<WorkItem> = resolver.iter().collect();
                let mut outcomes: Vec<(usize, Outcome)> = pool.install(|| {
                    items
                        .par_iter()
                        .enumerate()
                        .map(|(index, item)| {
                            let outcome = convert::convert(item, &settings);
                            sink.on_outcome(&outcome);
                            (index, outcome)
                        })
                        .collect()
                });
                outcomes.sort_by_key(|(index, _)| *index);
                for (_, outcome) in outcomes {
                    report.push(outcome);
                }
            }
        }

        sink.on_finish(&report);
        Ok(report)
    }
}
