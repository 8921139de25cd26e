use std::fmt;
use std::time::{Duration, Instant};

/// A cooperative cancellation deadline.
///
/// The core has no suspension points; instead the parser, converter, and
/// rule engine poll the deadline at coarse boundaries (each top-level
/// declaration, each statement of a large block, each rule invocation) and
/// unwind with [`DeadlineExceeded`] once it has passed.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// A deadline that never expires.
    pub fn never() -> Self {
        Self { at: None }
    }

    /// A deadline at a specific instant.
    pub fn at(instant: Instant) -> Self {
        Self { at: Some(instant) }
    }

    /// A deadline `duration` from now.
    pub fn within(duration: Duration) -> Self {
        Self {
            at: Some(Instant::now() + duration),
        }
    }

    /// Whether the deadline has passed.
    pub fn is_expired(&self) -> bool {
        match self.at {
            Some(at) => Instant::now() >= at,
            None => false,
        }
    }

    /// Poll the deadline, failing once it has passed.
    pub fn check(&self) -> Result<(), DeadlineExceeded> {
        if self.is_expired() {
            Err(DeadlineExceeded)
        } else {
            Ok(())
        }
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::never()
    }
}

/// Raised when the cooperative deadline is past; the in-flight operation
/// unwinds cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineExceeded;

impl fmt::Display for DeadlineExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "deadline exceeded")
    }
}

impl std::error::Error for DeadlineExceeded {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_does_not_expire() {
        let deadline = Deadline::never();
        assert!(!deadline.is_expired());
        assert!(deadline.check().is_ok());
    }

    #[test]
    fn past_instant_is_expired() {
        let deadline = Deadline::at(Instant::now());
        assert!(deadline.is_expired());
        assert_eq!(deadline.check(), Err(DeadlineExceeded));
    }

    #[test]
    fn future_instant_is_not_expired() {
        let deadline = Deadline::within(Duration::from_secs(3600));
        assert!(!deadline.is_expired());
        assert!(deadline.check().is_ok());
    }
}
