//! Batch conversion of a sketch directory.
//!
//! Walks a source tree for images, mirrors its layout into an output tree
//! as PNGs, and only converts files whose output is missing or older than
//! the source (unless forced). Files are converted in parallel; each PNG
//! is written to a temporary file and renamed into place, so an output
//! either appears complete or not at all.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use image::ImageFormat;
use rayon::prelude::*;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::alpha::{AlphaOptions, to_transparent};
use crate::error::{SketchError, SketchResult};

/// File extensions (lowercase) that are picked up as sketches.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Configuration for a batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Directory tree to read sketches from.
    pub source_dir: PathBuf,
    /// Directory tree to write transparent PNGs to.
    pub output_dir: PathBuf,
    /// Reconvert everything, even up-to-date outputs.
    pub force: bool,
    /// Transform options applied to every file.
    pub alpha: AlphaOptions,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::new("res/images", "res/sketch")
    }
}

impl BatchConfig {
    /// Create a config for the given source and output trees.
    pub fn new(source_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            force: false,
            alpha: AlphaOptions::default(),
        }
    }

    /// Set whether up-to-date outputs are reconverted.
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Set the transform options.
    pub fn with_alpha(mut self, alpha: AlphaOptions) -> Self {
        self.alpha = alpha;
        self
    }
}

/// One source image and where its conversion goes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SketchJob {
    /// The source image.
    pub input: PathBuf,
    /// The PNG to write.
    pub output: PathBuf,
}

/// A file that could not be converted.
#[derive(Debug)]
pub struct FailedImage {
    /// The source image.
    pub input: PathBuf,
    /// Why it failed.
    pub error: SketchError,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Output files written, sorted.
    pub processed: Vec<PathBuf>,
    /// Number of files skipped because their output was up to date.
    pub skipped: usize,
    /// Files that failed to convert.
    pub failed: Vec<FailedImage>,
}

impl BatchReport {
    /// Returns true if no file failed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Find every supported image under `source_dir`, sorted by path.
///
/// Each job's output mirrors the input's relative path under `output_dir`
/// with a `.png` extension. If `output_dir` lies inside `source_dir` it is
/// not walked, however either path is spelled.
pub fn find_images(source_dir: &Path, output_dir: &Path) -> SketchResult<Vec<SketchJob>> {
    if !source_dir.is_dir() {
        return Err(SketchError::SourceMissing(source_dir.to_path_buf()));
    }

    let skip = fs::canonicalize(output_dir).ok();
    let mut inputs = Vec::new();
    walk(source_dir, skip.as_deref(), &mut inputs)?;

    let mut jobs: Vec<SketchJob> = inputs
        .into_iter()
        .filter_map(|input| {
            let relative = input.strip_prefix(source_dir).ok()?;
            let output = output_dir.join(relative).with_extension("png");
            Some(SketchJob { input, output })
        })
        .collect();
    jobs.sort();
    Ok(jobs)
}

fn walk(dir: &Path, skip: Option<&Path>, found: &mut Vec<PathBuf>) -> SketchResult<()> {
    let entries = fs::read_dir(dir).map_err(io_error(dir))?;
    for entry in entries {
        let entry = entry.map_err(io_error(dir))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(io_error(&path))?;

        if file_type.is_dir() {
            if !is_same_dir(&path, skip) {
                walk(&path, skip, found)?;
            }
        } else if is_supported(&path) {
            found.push(path);
        }
    }
    Ok(())
}

fn is_same_dir(dir: &Path, canonical: Option<&Path>) -> bool {
    canonical.is_some_and(|canonical| fs::canonicalize(dir).is_ok_and(|dir| dir == canonical))
}

/// Keep one job per output path.
///
/// When several inputs map to the same PNG (`a.png` and `a.bmp`), the one
/// whose extension comes first in [`SUPPORTED_EXTENSIONS`] wins, then the
/// lowest path. The rest are returned as conflicts. Both lists stay sorted.
pub fn resolve_conflicts(jobs: Vec<SketchJob>) -> (Vec<SketchJob>, Vec<FailedImage>) {
    let mut groups: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
    for job in jobs {
        groups.entry(job.output).or_default().push(job.input);
    }

    let mut kept = Vec::new();
    let mut conflicts = Vec::new();
    for (output, mut inputs) in groups {
        inputs.sort_by(|a, b| extension_rank(a).cmp(&extension_rank(b)).then_with(|| a.cmp(b)));
        let mut inputs = inputs.into_iter();
        let Some(winner) = inputs.next() else {
            continue;
        };
        for input in inputs {
            warn!(input = %input.display(), kept = %winner.display(), "output name taken");
            conflicts.push(FailedImage {
                error: SketchError::OutputConflict {
                    input: input.clone(),
                    output: output.clone(),
                    kept: winner.clone(),
                },
                input,
            });
        }
        kept.push(SketchJob {
            input: winner,
            output,
        });
    }
    kept.sort();
    conflicts.sort_by(|a, b| a.input.cmp(&b.input));
    (kept, conflicts)
}

fn extension_rank(path: &Path) -> usize {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.iter().position(|known| *known == ext)
        })
        .unwrap_or(SUPPORTED_EXTENSIONS.len())
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Returns true if `output` is missing or older than `input`.
pub fn needs_processing(input: &Path, output: &Path) -> io::Result<bool> {
    let output_meta = match fs::metadata(output) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(true),
        Err(e) => return Err(e),
    };
    let input_modified = fs::metadata(input)?.modified()?;
    Ok(input_modified > output_meta.modified()?)
}

/// Convert every out-of-date image described by `config`.
///
/// Fails only if the source tree cannot be listed. Individual file
/// failures, including inputs that lose an output-name conflict (see
/// [`resolve_conflicts`]), are collected in [`BatchReport::failed`] and do
/// not stop the rest of the batch.
pub fn process_images(config: &BatchConfig) -> SketchResult<BatchReport> {
    let (jobs, conflicts) = resolve_conflicts(find_images(&config.source_dir, &config.output_dir)?);
    let mut report = BatchReport {
        failed: conflicts,
        ..BatchReport::default()
    };
    let mut pending = Vec::new();

    for job in jobs {
        if config.force {
            pending.push(job);
            continue;
        }
        match needs_processing(&job.input, &job.output) {
            Ok(true) => pending.push(job),
            Ok(false) => {
                debug!(input = %job.input.display(), "up to date");
                report.skipped += 1;
            }
            Err(source) => {
                warn!(input = %job.input.display(), error = %source, "cannot compare timestamps");
                report.failed.push(FailedImage {
                    error: SketchError::Io {
                        path: job.input.clone(),
                        source,
                    },
                    input: job.input,
                });
            }
        }
    }

    info!(
        pending = pending.len(),
        skipped = report.skipped,
        force = config.force,
        "converting sketches"
    );

    let results: Vec<(SketchJob, SketchResult<()>)> = pending
        .into_par_iter()
        .map(|job| {
            let result = convert_file(&job.input, &job.output, &config.alpha);
            (job, result)
        })
        .collect();

    for (job, result) in results {
        match result {
            Ok(()) => {
                info!(output = %job.output.display(), "converted");
                report.processed.push(job.output);
            }
            Err(error) => {
                warn!(input = %job.input.display(), %error, "conversion failed");
                report.failed.push(FailedImage {
                    input: job.input,
                    error,
                });
            }
        }
    }

    report.processed.sort();
    Ok(report)
}

/// Convert a single file, writing the PNG atomically.
pub fn convert_file(input: &Path, output: &Path, options: &AlphaOptions) -> SketchResult<()> {
    let image = image::open(input).map_err(|source| SketchError::Decode {
        path: input.to_path_buf(),
        source,
    })?;
    let rgba = to_transparent(&image, options);

    let parent = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(io_error(parent))?;

    let mut staged = NamedTempFile::new_in(parent).map_err(io_error(parent))?;
    {
        let mut writer = BufWriter::new(staged.as_file_mut());
        rgba.write_to(&mut writer, ImageFormat::Png)
            .map_err(|source| SketchError::Encode {
                path: output.to_path_buf(),
                source,
            })?;
        writer.flush().map_err(io_error(output))?;
    }
    staged
        .persist(output)
        .map_err(|e| SketchError::Io {
            path: output.to_path_buf(),
            source: e.error,
        })?;
    Ok(())
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> SketchError + '_ {
    move |source| SketchError::Io {
        path: path.to_path_buf(),
        source,
    }
}
