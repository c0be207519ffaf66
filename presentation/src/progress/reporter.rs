//! Progress reporting for batch lookups
//!
//! Everything here draws to stderr so stdout stays clean for exports.

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use ror_application::{Backoff, BatchProgressNotifier};
use ror_domain::{BatchSummary, OrganisationRecord, RorId};
use std::sync::Mutex;
use std::time::Duration;

/// `m:ss`, rounding partial seconds up
pub fn format_countdown(remaining: Duration) -> String {
    let secs = remaining.as_millis().div_ceil(1000) as u64;
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// "Fetching i of N: id", 1-based, noting retries
pub fn attempt_message(index: usize, total: usize, id: &RorId, attempt: u32) -> String {
    let mut message = format!("Fetching {} of {}: {}", index + 1, total, id);
    if attempt > 1 {
        message.push_str(&format!(" (attempt {})", attempt));
    }
    message
}

/// One-line description of a backoff in progress
pub fn backoff_message(backoff: &Backoff) -> String {
    format!(
        "{}. Retrying in {} ({}/{}) for {}",
        backoff.reason,
        format_countdown(backoff.remaining),
        backoff.attempt,
        backoff.max_attempts,
        backoff.id
    )
}

/// Reports progress during a batch lookup with fancy progress bars
pub struct ProgressReporter {
    multi: MultiProgress,
    batch_bar: Mutex<Option<ProgressBar>>,
    backoff_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            batch_bar: Mutex::new(None),
            backoff_bar: Mutex::new(None),
        }
    }

    fn batch_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.yellow} {msg}")
            .unwrap()
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchProgressNotifier for ProgressReporter {
    fn on_batch_start(&self, total: usize) {
        let pb = self.multi.add(ProgressBar::new(total as u64));
        pb.set_style(Self::batch_style());
        pb.set_prefix("Fetching");
        pb.set_message("Starting...");
        pb.enable_steady_tick(Duration::from_millis(120));

        *self.batch_bar.lock().unwrap() = Some(pb);
    }

    fn on_attempt(&self, index: usize, total: usize, id: &RorId, attempt: u32) {
        if let Some(pb) = self.batch_bar.lock().unwrap().as_ref() {
            pb.set_message(attempt_message(index, total, id, attempt));
        }
    }

    fn on_item_complete(&self, _index: usize, record: &OrganisationRecord) {
        if let Some(pb) = self.batch_bar.lock().unwrap().as_ref() {
            let status = if record.is_placeholder() {
                format!("{} {}", "x".red(), record.id)
            } else {
                format!("{} {}", "v".green(), record.name)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_batch_complete(&self, summary: &BatchSummary) {
        if let Some(pb) = self.batch_bar.lock().unwrap().take() {
            let message = if summary.all_succeeded() {
                format!("{} resolved", summary.succeeded).green().to_string()
            } else {
                format!(
                    "{} resolved, {}",
                    summary.succeeded,
                    format!("{} failed", summary.failed).red()
                )
            };
            pb.finish_with_message(message);
        }
    }

    fn on_backoff_start(&self, backoff: &Backoff) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_message(backoff_message(backoff));
        pb.enable_steady_tick(Duration::from_millis(120));

        if let Some(old) = self.backoff_bar.lock().unwrap().replace(pb) {
            old.finish_and_clear();
        }
    }

    fn on_backoff_tick(&self, backoff: &Backoff) {
        let mut guard = self.backoff_bar.lock().unwrap();
        if backoff.remaining.is_zero() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        } else if let Some(pb) = guard.as_ref() {
            pb.set_message(backoff_message(backoff));
        }
    }

    fn on_notice(&self, message: &str) {
        let _ = self.multi.println(format!("{} {}", "!".yellow().bold(), message));
    }
}

/// Simple text-based progress (no fancy UI)
///
/// Backoff countdowns are reported once per minute and in the final ten
/// seconds rather than on every tick.
pub struct SimpleProgress;

impl BatchProgressNotifier for SimpleProgress {
    fn on_batch_start(&self, total: usize) {
        eprintln!(
            "{} {} ({} identifiers)",
            "->".cyan(),
            "Fetching organisation details".bold(),
            total
        );
    }

    fn on_attempt(&self, index: usize, total: usize, id: &RorId, attempt: u32) {
        eprintln!("  {} {}", "->".cyan(), attempt_message(index, total, id, attempt));
    }

    fn on_item_complete(&self, index: usize, record: &OrganisationRecord) {
        if record.is_placeholder() {
            eprintln!("  {} [{}] {} ({})", "x".red(), index + 1, record.id, record.name);
        } else {
            eprintln!("  {} [{}] {} {}", "v".green(), index + 1, record.id, record.name);
        }
    }

    fn on_batch_complete(&self, _summary: &BatchSummary) {
        eprintln!();
    }

    fn on_backoff_start(&self, backoff: &Backoff) {
        eprintln!("  {} {}", "!".yellow(), backoff_message(backoff));
    }

    fn on_backoff_tick(&self, backoff: &Backoff) {
        let secs = backoff.remaining.as_secs();
        if secs > 0 && (secs % 60 == 0 || secs <= 10) {
            eprintln!("  {} {}", "!".yellow(), backoff_message(backoff));
        }
    }

    fn on_notice(&self, message: &str) {
        eprintln!("{} {}", "!".yellow().bold(), message);
    }
}
