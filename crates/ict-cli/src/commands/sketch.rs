use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use ict_sketch::{AlphaOptions, BatchConfig, BatchReport, DEFAULT_THRESHOLD, process_images};

/// Where sketches are read from and written to.
#[derive(Args, Clone)]
pub struct SketchDirs {
    /// Directory of source sketches
    #[arg(short, long, default_value = "res/images")]
    pub source: PathBuf,

    /// Directory for transparent PNGs
    #[arg(short, long, default_value = "res/sketch")]
    pub output: PathBuf,

    /// Opacity (0.0-1.0) below which a pixel becomes fully transparent
    #[arg(short, long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: f64,
}

impl SketchDirs {
    pub fn config(&self, force: bool, invert: bool) -> BatchConfig {
        BatchConfig::new(&self.source, &self.output)
            .with_force(force)
            .with_alpha(
                AlphaOptions::default()
                    .with_invert(invert)
                    .with_threshold(self.threshold),
            )
    }
}

#[derive(Args)]
pub struct SketchArgs {
    #[command(flatten)]
    pub dirs: SketchDirs,

    /// Reconvert everything, even up-to-date outputs
    #[arg(short, long)]
    pub force: bool,

    /// Invert colors first (for white-on-black sketches)
    #[arg(short, long)]
    pub invert: bool,
}

pub fn run(args: &SketchArgs) -> Result<(), String> {
    let config = args.dirs.config(args.force, args.invert);
    let report = process_images(&config).map_err(|e| e.to_string())?;

    write_report(&mut io::stdout().lock(), &report)
        .map_err(|e| format!("cannot write output: {e}"))?;

    if report.is_success() {
        Ok(())
    } else {
        Err(format!("{} image(s) failed to convert", report.failed.len()))
    }
}

/// Summarize a batch run.
pub fn write_report<W: Write>(out: &mut W, report: &BatchReport) -> io::Result<()> {
    for path in &report.processed {
        writeln!(out, "  Processed: {}", path.display())?;
    }
    for failure in &report.failed {
        writeln!(out, "  Failed:    {}: {}", failure.input.display(), failure.error)?;
    }

    if report.processed.is_empty() && report.failed.is_empty() {
        writeln!(out, "  No new images to process.")?;
    } else {
        writeln!(out)?;
        writeln!(out, "  {} images processed.", report.processed.len())?;
    }
    Ok(())
}
