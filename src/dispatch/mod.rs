//! Dispatch trigger.
//!
//! Ties the lookups, context snapshot, formatting and delivery together into a
//! single at-most-once run per [`Notifier`].

mod notifier;
mod state;

pub use notifier::{ErrorCallback, Notifier, NotifierBuilder, SuccessCallback};
pub use state::{DispatchOutcome, DispatchState};
