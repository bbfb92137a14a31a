//! Directory and archive traversal that renames every invoice PDF it finds.
//!
//! A run walks the input directory depth-first, opens `.zip` files (and ZIPs
//! nested inside them), deduplicates PDFs by base name and writes each
//! renamed copy to the output directory. Progress is reported through a line
//! sink using the prefixes `OK:`, `ERR:`, `SKIP:` and `INFO:`. Per-file
//! failures are logged and counted; only configuration errors end a run.

mod archive;
mod dedup;
mod output;
pub(crate) mod paths;

pub use output::{collision_name, write_pdf};

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, trace};
use walkdir::WalkDir;

use crate::error::{ConfigError, Error, Result};
use crate::invoice::extract_invoice_info;
use crate::models::config::RunConfig;
use crate::models::invoice::RunSummary;
use crate::naming::output_file_name;

use dedup::DedupSet;

/// Kinds of input a run acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Pdf,
    Zip,
}

impl InputKind {
    /// Classify a file or entry name by the text after the last `.` of its
    /// base name, ignoring case. A name like `.pdf` counts as a PDF.
    pub fn from_name(name: impl AsRef<Path>) -> Option<Self> {
        let base = name.as_ref().file_name()?.to_string_lossy();
        let (_, ext) = base.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "zip" => Some(Self::Zip),
            _ => None,
        }
    }
}

/// Rename every invoice PDF under `config.input_dir` into `config.output_dir`.
///
/// `log_line` receives one human-readable line per notable event. Returns
/// the run's counters, or an error when the configuration is unusable.
pub fn run<F>(config: &RunConfig, log_line: F) -> Result<RunSummary>
where
    F: FnMut(&str),
{
    let config = config.normalized()?;
    let mut ctx = RunContext::new(config, log_line);

    if let Some(skip) = ctx.skip_dir.clone() {
        ctx.log(&format!(
            "INFO: output directory is inside the input directory and will be skipped: {}",
            skip.display()
        ));
    }
    fs::create_dir_all(&ctx.config.output_dir).map_err(ConfigError::CreateOutputDir)?;

    info!(
        "Scanning {} -> {} (date field: {})",
        ctx.config.input_dir.display(),
        ctx.config.output_dir.display(),
        ctx.config.date_field
    );
    ctx.walk();
    info!("Run finished: {}", ctx.summary);
    Ok(ctx.summary)
}

/// State owned by a single run.
struct RunContext<F> {
    config: RunConfig,
    log_line: F,
    summary: RunSummary,
    skip_dir: Option<PathBuf>,
    seen: DedupSet,
}

impl<F: FnMut(&str)> RunContext<F> {
    fn new(config: RunConfig, log_line: F) -> Self {
        let skip_dir = paths::is_child_dir(&config.output_dir, &config.input_dir)
            .then(|| config.output_dir.clone());
        Self {
            config,
            log_line,
            summary: RunSummary::default(),
            skip_dir,
            seen: DedupSet::default(),
        }
    }

    fn log(&mut self, line: &str) {
        (self.log_line)(line);
    }

    fn fail(&mut self, source: impl Display, err: &Error) {
        debug!("{source} failed: {err:?}");
        self.summary.failed += 1;
        self.log(&format!("ERR: {source}: {err}"));
    }

    /// Count a PDF unless its base name was already seen.
    fn admit_pdf(&mut self, key: &str, source: &str) -> bool {
        if !self.seen.admit(key) {
            self.log(&format!("SKIP: duplicate PDF name (deduplicated by file name): {source}"));
            return false;
        }
        self.summary.found_pdf += 1;
        true
    }

    fn walk(&mut self) {
        let root = self.config.input_dir.clone();
        let skip = self.skip_dir.clone();
        let walker = WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| {
                let pruned = entry.file_type().is_dir()
                    && skip.as_deref().is_some_and(|skip| paths::same_dir(entry.path(), skip));
                if pruned {
                    debug!("Pruning {}", entry.path().display());
                }
                !pruned
            });

        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_dir() => {}
                Ok(entry) => self.visit_file(entry.path()),
                Err(err) => {
                    let path = err.path().unwrap_or(root.as_path()).display().to_string();
                    let reason = err
                        .io_error()
                        .map(ToString::to_string)
                        .unwrap_or_else(|| err.to_string());
                    self.summary.failed += 1;
                    self.log(&format!("ERR: cannot access {path}: {reason}"));
                }
            }
        }
    }

    fn visit_file(&mut self, path: &Path) {
        let source = path.display().to_string();
        match InputKind::from_name(path) {
            Some(InputKind::Pdf) => {
                if !self.admit_pdf(&dedup::key_for_path(path), &source) {
                    return;
                }
                match self.process_pdf_file(path) {
                    Ok(()) => self.summary.succeeded += 1,
                    Err(err) => self.fail(&source, &err),
                }
            }
            Some(InputKind::Zip) => {
                if let Err(err) = self.process_zip_file(path) {
                    self.fail(&source, &err);
                }
            }
            None => trace!("Ignoring {source}"),
        }
    }

    fn process_pdf_file(&mut self, path: &Path) -> Result<()> {
        let pdf = fs::read(path).map_err(Error::io("failed to read PDF"))?;
        self.process_pdf_bytes(&path.display().to_string(), &pdf)
    }

    /// Extract, name and write one PDF, then report it.
    fn process_pdf_bytes(&mut self, source: &str, pdf: &[u8]) -> Result<()> {
        let info = extract_invoice_info(pdf)?;
        let file_name = output_file_name(&info, self.config.date_field)?;
        let written = write_pdf(&self.config.output_dir, &file_name, pdf)?;
        self.log(&format!("OK: {source} -> {}", written.display()));
        Ok(())
    }
}
