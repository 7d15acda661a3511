//! # Failure Policy
//!
//! What happens when a caller breaks a precondition: hand back the error, or
//! degrade to a defined fallback and carry on.

use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{TreeError, TreeResult};

/// Uniform reaction to precondition violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FailurePolicy {
    /// Violations come back as `Err`
    #[default]
    Raise,
    /// Violations yield the operation's fallback value
    Degrade,
}

impl FailurePolicy {
    /// Route a violation through the policy
    ///
    /// Under `Raise` the error is returned; under `Degrade` the fallback is.
    pub fn resolve<R>(&self, error: TreeError, fallback: R) -> TreeResult<R> {
        match self {
            FailurePolicy::Raise => Err(error),
            FailurePolicy::Degrade => {
                debug!("degrading precondition violation: {}", error);
                Ok(fallback)
            }
        }
    }

    /// Like [`resolve`](Self::resolve) with a lazily built fallback
    pub fn resolve_with<R, F>(&self, error: TreeError, fallback: F) -> TreeResult<R>
    where
        F: FnOnce() -> R,
    {
        match self {
            FailurePolicy::Raise => Err(error),
            FailurePolicy::Degrade => {
                debug!("degrading precondition violation: {}", error);
                Ok(fallback())
            }
        }
    }

    pub fn is_raise(&self) -> bool {
        matches!(self, FailurePolicy::Raise)
    }
}
