//! Rename command - run one pass over the input directory.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;
use tracing::debug;

use trainticket_core::{DateField, RunSummary, Settings, run as run_core};

use super::{load_settings, settings_path};

/// Arguments for the rename command.
#[derive(Args)]
pub struct RenameArgs {
    /// Directory scanned for PDFs and ZIP archives
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Directory receiving renamed copies
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Date used in output names: travel or issue
    #[arg(short, long)]
    date_field: Option<DateField>,

    /// Remember the effective directories and date field
    #[arg(long)]
    save: bool,
}

pub async fn run(args: RenameArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = settings_path(config_path);
    let (stored, _) = load_settings(&path)?;
    let settings = Settings {
        input_dir: args.input.unwrap_or(stored.input_dir),
        output_dir: args.output.unwrap_or(stored.output_dir),
        date_field: args.date_field.unwrap_or(stored.date_field),
    };

    if args.save {
        settings.save(&path)?;
        println!("{} Saved settings to {}", style("✓").green(), path.display());
    }

    println!(
        "{} Renaming PDFs from {} into {} (date: {})",
        style("ℹ").blue(),
        settings.input_dir.display(),
        settings.output_dir.display(),
        settings.date_field
    );

    let start = Instant::now();
    let config = settings.to_run_config();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let worker = tokio::task::spawn_blocking(move || {
        run_core(&config, |line| {
            tx.send(line.to_string()).ok();
        })
    });

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("scanning…");

    let mut received = 0u64;
    while let Some(line) = rx.recv().await {
        received += 1;
        pb.suspend(|| println!("{}", styled_line(&line)));
        pb.set_message(format!("{received} event(s)"));
    }
    pb.finish_and_clear();

    let summary = worker.await??;
    debug!("Worker finished after {received} log line(s)");
    print_summary(&summary, start.elapsed());
    Ok(())
}

fn styled_line(line: &str) -> String {
    let styled = style(line);
    let styled = if line.starts_with("OK:") {
        styled.green()
    } else if line.starts_with("ERR:") {
        styled.red()
    } else if line.starts_with("SKIP:") {
        styled.yellow()
    } else if line.starts_with("INFO:") {
        styled.blue()
    } else {
        styled
    };
    styled.to_string()
}

fn print_summary(summary: &RunSummary, elapsed: Duration) {
    println!();
    println!(
        "{} Done in {:?}: found {} PDF(s)",
        style("✓").green(),
        elapsed,
        summary.found_pdf
    );
    println!(
        "   {} succeeded, {} failed",
        style(summary.succeeded).green(),
        style(summary.failed).red()
    );
}
