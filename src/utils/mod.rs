//! Utility Module
//!
//! - [`time`]: frame timer shared through the scene's engine context

pub mod time;

pub use time::Timer;
