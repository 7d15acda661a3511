//! # Tree Configuration
//!
//! Sizing limits and the failure policy, fixed when the tree is built.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::FailurePolicy;

/// Configuration for an `NTree`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TreeConfig {
    /// Upper bound on children per node
    pub max_children: usize,

    /// Maximum number of simultaneous nodes
    pub capacity: usize,

    /// Reaction to precondition violations
    pub policy: FailurePolicy,
}

impl TreeConfig {
    /// Create a config with the default (`Raise`) policy
    pub fn new(max_children: usize, capacity: usize) -> Self {
        Self {
            max_children,
            capacity,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_max_children(mut self, max_children: usize) -> Self {
        self.max_children = max_children;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Shorthand for `with_policy(FailurePolicy::Degrade)`
    pub fn degrading(self) -> Self {
        self.with_policy(FailurePolicy::Degrade)
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self::new(16, 1024)
    }
}
