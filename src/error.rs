//! Invariant violations of the subscription lifecycle.
//!
//! Cancellation is never an error in this crate: disposing a subscription is
//! the expected terminal path and always completes silently. The only failures
//! are broken caller contracts, which abort the current thread of execution
//! through [`fatal`] instead of surfacing as a recoverable `Result`.

use crate::logging::error;

/// A breach of the latch-once contract.
///
/// Continuing after any of these would either leak the latched resources or
/// release them twice, so they are raised as panics carrying this value's
/// `Display` text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleViolation {
  /// `SinkDisposer::latch` was called a second time.
  #[error("sink and upstream were already latched")]
  LatchedTwice,
  /// The disposer was marked latched but holds no handles to release.
  #[error("subscription is latched but its sink and upstream are missing")]
  MissingHandles,
  /// `SingleAssignmentDisposable::set` was called a second time.
  #[error("disposable was already assigned")]
  AssignedTwice,
  /// An observer emitted back into the sink that is delivering to it.
  #[error("notification delivered reentrantly into a sink that is still forwarding")]
  ReentrantEmission,
}

#[cold]
#[track_caller]
pub(crate) fn fatal(violation: LifecycleViolation) -> ! {
  error!(%violation, "subscription lifecycle invariant violated");
  panic!("{violation}")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn display_text() {
    assert_eq!(LifecycleViolation::LatchedTwice.to_string(), "sink and upstream were already latched");
    assert_eq!(LifecycleViolation::AssignedTwice.to_string(), "disposable was already assigned");
  }

  #[test]
  #[should_panic(expected = "are missing")]
  fn fatal_panics_with_message() { fatal(LifecycleViolation::MissingHandles) }
}
