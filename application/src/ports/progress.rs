//! Progress notification port
//!
//! Defines the interface for reporting progress during a generation round.

use namesmith_domain::{Availability, CreatorTag, DomainName};

/// Callback for progress updates during a round
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinners, plain lines, nothing).
pub trait ProgressNotifier: Send + Sync {
    /// Called when a convergence attempt starts
    fn on_attempt_start(&self, attempt: usize, max_attempts: usize);

    /// Called when a creator finishes (successfully or not)
    fn on_creator_complete(&self, tag: &CreatorTag, produced: usize, success: bool);

    /// Called before a batch is checked
    fn on_check_start(&self, _total: usize) {}

    /// Called for every classified name
    fn on_name_checked(&self, _name: &DomainName, _availability: Availability) {}

    /// Called when an attempt has been classified
    fn on_attempt_complete(&self, attempt: usize, available_so_far: usize);
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_attempt_start(&self, _attempt: usize, _max_attempts: usize) {}
    fn on_creator_complete(&self, _tag: &CreatorTag, _produced: usize, _success: bool) {}
    fn on_attempt_complete(&self, _attempt: usize, _available_so_far: usize) {}
}
