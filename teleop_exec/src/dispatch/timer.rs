//! Deferred command timers

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::time::Instant;

use super::Intent;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A command waiting for its delay to elapse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingCommand {
    /// Sequence number of the command, unique across categories
    pub id: u64,

    /// The intent which armed the timer. The intent released when the timer
    /// fires is the category's intent at that moment, which may differ.
    pub intent: Intent,

    pub armed_at: Instant,
    pub fire_at: Instant,
}

/// Holds at most one pending command for a category.
///
/// Arming a new command replaces (and so cancels) the previous one.
#[derive(Debug, Default, Clone)]
pub struct CommandTimer {
    pending: Option<PendingCommand>
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl CommandTimer {
    /// Arm the timer with a new command, returning the command it superseded.
    pub fn arm(&mut self, cmd: PendingCommand) -> Option<PendingCommand> {
        self.pending.replace(cmd)
    }

    pub fn cancel(&mut self) -> Option<PendingCommand> {
        self.pending.take()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.fire_at)
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Disarm and return the pending command if its fire time has been
    /// reached.
    pub fn take_due(&mut self, now: Instant) -> Option<PendingCommand> {
        match self.pending {
            Some(p) if p.fire_at <= now => self.pending.take(),
            _ => None
        }
    }
}
