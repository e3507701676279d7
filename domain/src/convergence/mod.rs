//! Convergence loop bookkeeping.
//!
//! The loop itself (calling the generator and the filter) lives in the
//! application layer. This module owns the pure part: the budget, the
//! state transitions, and the accumulated partition.
//!
//! ```text
//! AwaitingTarget ──▶ Generating ──▶ Classifying ──┐
//!                        ▲                        │ target not met,
//!                        └────────────────────────┘ attempts left
//!                                                 │
//!                               TargetMet ◀───────┴───────▶ BudgetExhausted
//! ```

use crate::availability::Partition;
use crate::candidate::DomainName;
use crate::ledger::SeenSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Parameters for one convergence call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvergenceBudget {
    /// Desired number of available names
    pub target_count: usize,
    /// Hard cap on generation attempts within the call
    pub max_attempts: usize,
}

impl ConvergenceBudget {
    pub fn new(target_count: usize, max_attempts: usize) -> Self {
        Self {
            target_count,
            max_attempts,
        }
    }
}

impl Default for ConvergenceBudget {
    fn default() -> Self {
        Self {
            target_count: 5,
            max_attempts: 5,
        }
    }
}

/// Where the loop currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvergenceState {
    AwaitingTarget,
    Generating,
    Classifying,
    TargetMet,
    BudgetExhausted,
}

impl ConvergenceState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ConvergenceState::TargetMet | ConvergenceState::BudgetExhausted
        )
    }
}

/// How a convergence call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvergenceStatus {
    TargetMet,
    BudgetExhausted,
}

/// Result of a convergence call: everything generated, partitioned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvergenceOutcome {
    pub status: ConvergenceStatus,
    pub attempts: usize,
    pub partition: Partition,
}

impl ConvergenceOutcome {
    pub fn found_any(&self) -> bool {
        !self.partition.available.is_empty()
    }
}

/// Drives the state transitions of one convergence call
#[derive(Debug, Clone)]
pub struct ConvergenceTracker {
    budget: ConvergenceBudget,
    state: ConvergenceState,
    attempts: usize,
    accumulated: Partition,
    generated: BTreeSet<DomainName>,
}

impl ConvergenceTracker {
    pub fn new(budget: ConvergenceBudget) -> Self {
        Self {
            budget,
            state: ConvergenceState::AwaitingTarget,
            attempts: 0,
            accumulated: Partition::new(),
            generated: BTreeSet::new(),
        }
    }

    pub fn state(&self) -> ConvergenceState {
        self.state
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }

    pub fn budget(&self) -> ConvergenceBudget {
        self.budget
    }

    pub fn accumulated(&self) -> &Partition {
        &self.accumulated
    }

    fn target_met(&self) -> bool {
        self.accumulated.available.len() >= self.budget.target_count
    }

    /// Start the next attempt if the target is unmet and budget remains.
    ///
    /// Returns the attempt number (1-based), or `None` once the loop has
    /// reached a terminal state.
    pub fn begin_attempt(&mut self) -> Option<usize> {
        if self.state.is_terminal() {
            return None;
        }
        if self.target_met() {
            self.state = ConvergenceState::TargetMet;
            return None;
        }
        if self.attempts >= self.budget.max_attempts {
            self.state = ConvergenceState::BudgetExhausted;
            return None;
        }
        self.attempts += 1;
        self.state = ConvergenceState::Generating;
        Some(self.attempts)
    }

    /// Names to exclude from the next generation: the session's seen set
    /// plus everything generated so far in this call
    pub fn excluded(&self, seen: &SeenSet) -> BTreeSet<DomainName> {
        seen.iter().chain(self.generated.iter()).cloned().collect()
    }

    /// Note the names returned by the generator for the current attempt
    pub fn note_generated<'a, I>(&mut self, names: I)
    where
        I: IntoIterator<Item = &'a DomainName>,
    {
        self.generated.extend(names.into_iter().cloned());
        self.state = ConvergenceState::Classifying;
    }

    /// Fold the classified batch into the accumulated results
    pub fn absorb(&mut self, batch: Partition) {
        self.accumulated.merge(batch);
        self.state = if self.target_met() {
            ConvergenceState::TargetMet
        } else if self.attempts >= self.budget.max_attempts {
            ConvergenceState::BudgetExhausted
        } else {
            ConvergenceState::Generating
        };
    }

    /// Consume the tracker into its final outcome
    pub fn finish(mut self) -> ConvergenceOutcome {
        if !self.state.is_terminal() {
            self.state = if self.target_met() {
                ConvergenceState::TargetMet
            } else {
                ConvergenceState::BudgetExhausted
            };
        }
        let status = match self.state {
            ConvergenceState::TargetMet => ConvergenceStatus::TargetMet,
            _ => ConvergenceStatus::BudgetExhausted,
        };
        ConvergenceOutcome {
            status,
            attempts: self.attempts,
            partition: self.accumulated,
        }
    }
}
