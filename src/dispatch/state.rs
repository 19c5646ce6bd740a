//! Dispatch lifecycle states and outcomes.

use crate::error_handling::NotifyError;
use crate::record::VisitorRecord;

/// Lifecycle of a [`Notifier`](super::Notifier).
///
/// ```text
/// Idle -> Scheduled -> Collecting -> Dispatched
///                   |             \-> Failed
///                   \-> Canceled
/// Idle -> Disabled
/// Idle -> Canceled (unmounted before mount)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchState {
    /// Not mounted yet
    Idle,
    /// Mounted with `disabled = true`; never fires
    Disabled,
    /// Fire pending until the debounce elapses
    Scheduled,
    /// Pipeline running
    Collecting,
    /// Message delivered
    Dispatched,
    /// Unmounted before the fire (or before mount)
    Canceled,
    /// Pipeline failed; no retry
    Failed,
}

impl DispatchState {
    /// True for states that can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DispatchState::Disabled
                | DispatchState::Dispatched
                | DispatchState::Canceled
                | DispatchState::Failed
        )
    }
}

/// Result of one call to `collect_and_notify`.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// The message was delivered; carries the assembled record
    Dispatched(VisitorRecord),
    /// The pipeline failed
    Failed(NotifyError),
    /// The pipeline did not run (already fired, canceled or disabled)
    Skipped,
}

impl DispatchOutcome {
    /// True if the message was delivered.
    pub fn is_dispatched(&self) -> bool {
        matches!(self, DispatchOutcome::Dispatched(_))
    }

    /// The delivered record, if any.
    pub fn record(&self) -> Option<&VisitorRecord> {
        match self {
            DispatchOutcome::Dispatched(record) => Some(record),
            _ => None,
        }
    }

    /// The pipeline error, if any.
    pub fn error(&self) -> Option<&NotifyError> {
        match self {
            DispatchOutcome::Failed(error) => Some(error),
            _ => None,
        }
    }
}
