//! Multi-file aggregation.
//!
//! [`Aggregator`] analyses every input file at every configured window width,
//! applies the configured [`ErrorPolicy`] to per-file failures and summarises
//! the per-file maxima of each width.

use std::path::{Path, PathBuf};

use resonometer_analysis::AggregateStats;
use resonometer_config::{ConfigError, ErrorPolicy, MeterConfig};
use serde::Serialize;

use crate::error::{InputError, PipelineError, ProcessingError};
use crate::file::{FileResult, analyze_file};

/// Progress notification emitted while a run is in flight.
#[derive(Debug)]
pub enum FileEvent<'a> {
    /// Processing of a file is about to start.
    Started {
        /// The file.
        path: &'a Path,
        /// Window width of this pass.
        window_width_ms: f64,
        /// Zero-based position among all (width, file) jobs.
        index: usize,
        /// Total number of jobs in the run.
        total: usize,
    },
    /// The file was analysed.
    Finished {
        /// The file.
        path: &'a Path,
        /// Its result.
        result: &'a FileResult,
    },
    /// The file failed and was skipped.
    Failed {
        /// The file.
        path: &'a Path,
        /// Why it failed.
        error: &'a ProcessingError,
    },
}

/// A file that failed under [`ErrorPolicy::Skip`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileFailure {
    /// Path as given on input.
    pub file: PathBuf,
    /// Error message.
    pub error: String,
}

/// All results for one window width.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidthRun {
    /// Window width in seconds.
    pub window_width_s: f64,
    /// Successfully analysed files, in input order.
    pub results: Vec<FileResult>,
    /// Skipped files, in input order.
    pub failures: Vec<FileFailure>,
    /// Statistics over `results`; `None` when no file succeeded.
    pub stats: Option<AggregateStats>,
}

impl WidthRun {
    /// Build a run from results and failures, computing the statistics.
    pub fn new(window_width_s: f64, results: Vec<FileResult>, failures: Vec<FileFailure>) -> Self {
        let stats = results.first().and_then(|first| {
            let levels: Vec<f64> = results.iter().map(|r| r.max_level_db).collect();
            AggregateStats::from_levels(&levels, first.unit)
        });
        Self {
            window_width_s,
            results,
            failures,
            stats,
        }
    }
}

/// Check the file list before anything is read.
///
/// # Errors
///
/// [`InputError::NoFiles`] for an empty list, [`InputError::NotWav`] for the
/// first path without a `.wav` extension (any case).
pub fn validate_inputs<P: AsRef<Path>>(paths: &[P]) -> Result<(), InputError> {
    if paths.is_empty() {
        return Err(InputError::NoFiles);
    }
    for path in paths {
        let path = path.as_ref();
        let is_wav = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));
        if !is_wav {
            return Err(InputError::NotWav(path.to_path_buf()));
        }
    }
    Ok(())
}

type Observer<'a> = Box<dyn FnMut(FileEvent<'_>) + 'a>;

/// Runs the single-file analysis over a set of files and window widths.
pub struct Aggregator<'a> {
    config: &'a MeterConfig,
    observer: Option<Observer<'a>>,
}

impl<'a> Aggregator<'a> {
    /// Create an aggregator for `config`.
    pub fn new(config: &'a MeterConfig) -> Self {
        Self {
            config,
            observer: None,
        }
    }

    /// Receive a [`FileEvent`] for every file processed.
    pub fn with_observer(mut self, observer: impl FnMut(FileEvent<'_>) + 'a) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Analyse `paths` at every configured window width.
    ///
    /// Returns one [`WidthRun`] per width, in configuration order.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Config`] if the configuration does not validate
    /// - [`PipelineError::Input`] if the file list is unusable
    /// - [`PipelineError::Processing`] for the first failing file under
    ///   [`ErrorPolicy::Abort`]
    pub fn run<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<Vec<WidthRun>, PipelineError> {
        let config = self.config;
        config.validate().map_err(ConfigError::from)?;
        validate_inputs(paths)?;

        let widths = &config.window_widths_ms;
        let total = widths.len() * paths.len();
        let mut runs = Vec::with_capacity(widths.len());

        for (w, &width_ms) in widths.iter().enumerate() {
            let mut results = Vec::with_capacity(paths.len());
            let mut failures = Vec::new();

            for (i, path) in paths.iter().enumerate() {
                let path = path.as_ref();
                self.notify(FileEvent::Started {
                    path,
                    window_width_ms: width_ms,
                    index: w * paths.len() + i,
                    total,
                });

                match analyze_file(path, width_ms, config) {
                    Ok(result) => {
                        self.notify(FileEvent::Finished {
                            path,
                            result: &result,
                        });
                        results.push(result);
                    }
                    Err(error) => match config.error_policy {
                        ErrorPolicy::Abort => {
                            return Err(PipelineError::Processing {
                                file: path.to_path_buf(),
                                source: error,
                            });
                        }
                        ErrorPolicy::Skip => {
                            tracing::warn!(file = %path.display(), error = %error, "skipping file");
                            self.notify(FileEvent::Failed {
                                path,
                                error: &error,
                            });
                            failures.push(FileFailure {
                                file: path.to_path_buf(),
                                error: error.to_string(),
                            });
                        }
                    },
                }
            }

            let run = WidthRun::new(width_ms * 1e-3, results, failures);
            if let Some(stats) = &run.stats {
                tracing::info!(
                    width_ms,
                    files = stats.count,
                    mean_db = stats.mean_db,
                    std_db = stats.std_db,
                    "window width aggregated"
                );
            }
            runs.push(run);
        }

        Ok(runs)
    }

    fn notify(&mut self, event: FileEvent<'_>) {
        if let Some(observer) = self.observer.as_mut() {
            observer(event);
        }
    }
}
