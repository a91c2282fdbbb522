//! Batch image tools: format conversion and resizing.
//!
//! Files are processed on a dedicated rayon pool; results are collected back in input order so
//! reports and logs do not depend on scheduling.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::foundation::error::{YardError, YardResult};

/// Convert images to PNG.
pub mod convert;
/// Resize images to target sizes.
pub mod resize;

/// Per-run outcome of a batch tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Files written.
    pub written: Vec<PathBuf>,
    /// Inputs that failed, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    /// Number of failed inputs.
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    fn record(&mut self, input: &Path, result: YardResult<Vec<PathBuf>>) {
        match result {
            Ok(written) => {
                for out in &written {
                    tracing::info!(input = %input.display(), "wrote {}", out.display());
                }
                self.written.extend(written);
            }
            Err(e) => {
                tracing::warn!(input = %input.display(), "failed: {e}");
                self.failed.push((input.to_path_buf(), e.to_string()));
            }
        }
    }
}

pub(crate) fn build_thread_pool(threads: Option<usize>) -> YardResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(YardError::validation("'threads' must be >= 1 when set"));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| YardError::validation(format!("failed to build rayon thread pool: {e}")))
}

/// Run `job` over `inputs` on a pool and fold the results, in input order, into a report.
pub(crate) fn run_batch<F>(inputs: &[PathBuf], threads: Option<usize>, job: F) -> YardResult<BatchReport>
where
    F: Fn(&Path) -> YardResult<Vec<PathBuf>> + Sync,
{
    let pool = build_thread_pool(threads)?;
    let results: Vec<YardResult<Vec<PathBuf>>> =
        pool.install(|| inputs.par_iter().map(|p| job(p)).collect());

    let mut report = BatchReport::default();
    for (input, result) in inputs.iter().zip(results) {
        report.record(input, result);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_threads_is_rejected() {
        assert!(build_thread_pool(Some(0)).is_err());
        assert!(build_thread_pool(Some(2)).is_ok());
    }

    #[test]
    fn results_keep_input_order() {
        let inputs: Vec<PathBuf> = (0..16).map(|i| PathBuf::from(format!("{i}.png"))).collect();
        let report = run_batch(&inputs, Some(4), |p| {
            if p == Path::new("3.png") {
                Err(YardError::image("bad"))
            } else {
                Ok(vec![p.with_extension("out")])
            }
        })
        .unwrap();

        assert_eq!(report.written.len(), 15);
        assert_eq!(report.written[0], PathBuf::from("0.out"));
        assert_eq!(report.written[14], PathBuf::from("15.out"));
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.failed[0].0, PathBuf::from("3.png"));
    }
}
