//! Progress reporting for generation rounds

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use namesmith_application::ports::progress::ProgressNotifier;
use namesmith_domain::{Availability, CreatorTag, DomainName};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Reports progress during a round with spinners and a check bar
pub struct ProgressReporter {
    multi: MultiProgress,
    attempt_bar: Mutex<Option<ProgressBar>>,
    check_bar: Mutex<Option<ProgressBar>>,
}

fn locked<T>(slot: &Mutex<T>) -> MutexGuard<'_, T> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            attempt_bar: Mutex::new(None),
            check_bar: Mutex::new(None),
        }
    }

    fn check_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_attempt_start(&self, attempt: usize, max_attempts: usize) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix(format!("Attempt {}/{}", attempt, max_attempts));
        pb.set_message("Generating...");
        pb.enable_steady_tick(Duration::from_millis(100));

        *locked(&self.attempt_bar) = Some(pb);
    }

    fn on_creator_complete(&self, tag: &CreatorTag, produced: usize, success: bool) {
        if let Some(pb) = locked(&self.attempt_bar).as_ref() {
            let status = if success {
                format!("{} {} ({} new)", "v".green(), tag, produced)
            } else {
                format!("{} {}", "x".red(), tag)
            };
            pb.set_message(status);
        }
    }

    fn on_check_start(&self, total: usize) {
        let pb = self.multi.add(ProgressBar::new(total as u64));
        pb.set_style(Self::check_style());
        pb.set_prefix("Checking");
        *locked(&self.check_bar) = Some(pb);
    }

    fn on_name_checked(&self, name: &DomainName, availability: Availability) {
        if let Some(pb) = locked(&self.check_bar).as_ref() {
            let status = match availability {
                Availability::Available => format!("{} {}", "v".green(), name),
                Availability::Taken => format!("{} {}", "x".red(), name),
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_attempt_complete(&self, attempt: usize, available_so_far: usize) {
        if let Some(pb) = locked(&self.check_bar).take() {
            pb.finish_and_clear();
        }
        if let Some(pb) = locked(&self.attempt_bar).take() {
            pb.finish_with_message(format!(
                "{} {} available so far",
                format!("Attempt {} done:", attempt).green(),
                available_so_far
            ));
        }
    }
}
