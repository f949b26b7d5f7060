//! CLI progress display utilities
//!
//! Spinner and summary styling for recursive extraction runs.

use std::time::Duration;

use console::{Emoji, style};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};

/// Package - extraction in progress
pub static PACKAGE: Emoji<'_, '_> = Emoji("📦 ", "");
/// Sparkles - completion
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");
/// Warning sign - skipped or failed archives
pub static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "");

/// Spinner ticking once per archive outcome.
pub fn archive_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} {pos} archives  {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner
}

/// Print completion message: `✨ Done in 2s`
pub fn print_done(elapsed: Duration) {
    println!("{SPARKLE}Done in {}", HumanDuration(elapsed));
}

/// Print the extracted/skipped/failed tally.
pub fn print_summary(extracted: usize, skipped: usize, failed: usize) {
    println!(
        "{PACKAGE}{} extracted, {} skipped, {}",
        style(extracted).green().bold(),
        style(skipped).yellow(),
        if failed == 0 {
            format!("{} failed", style(0).dim())
        } else {
            format!("{WARNING}{} failed", style(failed).red().bold())
        }
    );
}
