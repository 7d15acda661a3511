//! # Storage Adapters
//!
//! Implementations of the `NodeStore` port.
//!
//! Available adapters:
//! - `ArenaStore` - fixed-capacity slot arena with free-list reuse

mod arena;

pub use arena::ArenaStore;
