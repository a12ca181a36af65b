//! Operators built on the subscribe substrate.
//!
//! `map` is the reference operator: its `run` subscribes to its source, the
//! pattern every composed operator follows.
pub mod map;
