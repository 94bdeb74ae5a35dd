//! Session configuration.

/// Step ceiling for [`Session::run_to_end`](super::Session::run_to_end).
pub const DEFAULT_MAX_STEPS: usize = 10_000;

/// What to do when execution reaches a statement outside the supported
/// subset.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum UnsupportedPolicy {
    /// Stop with an `UnsupportedSyntax` error.
    #[default]
    Error,
    /// Skip the statement (and the block, for a header).
    Ignore,
}

/// Configuration for a [`Session`](super::Session).
///
/// ```
/// use jstep_eval::{SessionConfig, UnsupportedPolicy};
///
/// let config = SessionConfig::new()
///     .max_steps(500)
///     .unsupported(UnsupportedPolicy::Ignore);
/// assert_eq!(config.max_steps, 500);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Maximum number of steps a single `run_to_end` call may execute.
    pub max_steps: usize,
    pub unsupported: UnsupportedPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            max_steps: DEFAULT_MAX_STEPS,
            unsupported: UnsupportedPolicy::default(),
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        SessionConfig::default()
    }

    /// Set the `run_to_end` step ceiling.
    #[must_use]
    pub fn max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Set the policy for unsupported statements.
    #[must_use]
    pub fn unsupported(mut self, policy: UnsupportedPolicy) -> Self {
        self.unsupported = policy;
        self
    }

    /// Shorthand for `unsupported(UnsupportedPolicy::Ignore)`.
    #[must_use]
    pub fn lenient(self) -> Self {
        self.unsupported(UnsupportedPolicy::Ignore)
    }
}
