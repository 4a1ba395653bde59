//! Application-facing platform seams.

pub mod window;

pub use window::{HeadlessWindow, Window};
