//! Console output utilities.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::batch::BatchReport;

/// Prints a success message.
pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Prints an error message.
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Prints an info message.
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Creates the batch progress bar, or a hidden one when `visible` is false.
pub fn progress_bar(total: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

/// Prints the end-of-run summary.
pub fn summary(report: &BatchReport) {
    let seconds = report.elapsed.as_secs_f64();

    if report.error.is_none() {
        success(&format!(
            "Finished creating {} users in {:.2} seconds.",
            report.succeeded, seconds
        ));
    } else {
        error(&format!(
            "Stopped after creating {} of {} users in {:.2} seconds.",
            report.succeeded, report.requested, seconds
        ));
    }

    if report.refreshes > 0 {
        info(&format!("Access token refreshed {} time(s).", report.refreshes));
    }
}
