//! Worker pool and bookkeeping shared by the pipelines

use log::{debug, log, warn, Level};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use crate::error::{ConvertError, ConvertResult};
use crate::utils::progress::ProgressTracker;

/// Outcome of one batch run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub processed: usize,
    /// Item name and the reason it was skipped
    pub skipped: Vec<(String, String)>,
}

impl RunSummary {
    /// Level the summary is logged at
    ///
    /// Runs that skipped anything report at `warn` so the summary shows at
    /// the default verbosity.
    pub fn level(&self) -> Level {
        if self.skipped.is_empty() { Level::Info } else { Level::Warn }
    }

    /// Logs the totals and every skipped item with its reason
    ///
    /// # Arguments
    /// * `what` - Name of the pipeline, prefixed to the totals line
    pub fn log(&self, what: &str) {
        let level = self.level();
        log!(level, "{}: {}", what, self);
        for (item, reason) in &self.skipped {
            log!(level, "  skipped {}: {}", item, reason);
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} processed, {} skipped", self.processed, self.skipped.len())
    }
}

/// Worker count when none is requested
pub fn default_threads() -> usize {
    thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

/// Files directly inside `dir` whose extension is one of `extensions`,
/// compared case-insensitively, sorted by name
pub fn list_inputs(dir: &Path, extensions: &[&str]) -> ConvertResult<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    debug!("Found {} input file(s) in {}", files.len(), dir.display());
    Ok(files)
}

/// File stem as UTF-8
pub(crate) fn file_stem(path: &Path) -> ConvertResult<&str> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| ConvertError::InvalidArgument(format!("cannot derive a name from {}", path.display())))
}

pub(crate) fn require_dir(path: &Path, what: &str) -> ConvertResult<()> {
    if !path.is_dir() {
        return Err(ConvertError::InvalidArgument(format!("{} {} does not exist", what, path.display())));
    }
    Ok(())
}

/// Runs `work` on every item with `threads` workers
///
/// Failures are logged and recorded in the summary; they never stop the
/// batch.
pub fn run_batch<T, D, F>(
    items: &[T],
    threads: usize,
    description: &str,
    describe: D,
    work: F
) -> ConvertResult<RunSummary>
where
    T: Sync,
    D: Fn(&T) -> String + Sync,
    F: Fn(&T) -> ConvertResult<()> + Sync,
{
    let pool = ThreadPoolBuilder::new().num_threads(threads.max(1)).build()?;
    let progress = ProgressTracker::new(items.len() as u64, description);

    let failures: Vec<(String, String)> = pool.install(|| {
        items.par_iter()
            .filter_map(|item| {
                let result = work(item);
                progress.increment(1);
                match result {
                    Ok(()) => None,
                    Err(e) => {
                        let name = describe(item);
                        warn!("Skipping {}: {}", name, e);
                        Some((name, e.to_string()))
                    }
                }
            })
            .collect()
    });
    progress.finish();

    Ok(RunSummary {
        processed: items.len() - failures.len(),
        skipped: failures,
    })
}
