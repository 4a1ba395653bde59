//! Platform-independent window abstraction.
//!
//! The core only needs a handful of window queries: its size for context
//! creation, a title, and whether the user asked to close it. Concrete
//! backends implement [`Window`]; [`HeadlessWindow`] stands in when there is no
//! display.

use std::any::Any;
use std::cell::{Cell, RefCell};

use crate::settings::WindowSettings;

/// Platform-independent window interface.
///
/// Methods take `&self` because windows are shared between the engine and
/// the scene's engine context.
pub trait Window {
    fn set_title(&self, title: &str);

    fn title(&self) -> String;

    /// Inner (client area) size in physical pixels.
    fn inner_size(&self) -> (u32, u32);

    /// Display scale factor (DPI scaling).
    fn scale_factor(&self) -> f32 {
        1.0
    }

    /// Whether the window was asked to close.
    fn should_close(&self) -> bool;

    fn request_close(&self);

    /// Returns the concrete window for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// A window that never appears on screen.
#[derive(Debug)]
pub struct HeadlessWindow {
    title: RefCell<String>,
    size: Cell<(u32, u32)>,
    close_requested: Cell<bool>,
}

impl HeadlessWindow {
    #[must_use]
    pub fn new(title: &str, width: u32, height: u32) -> Self {
        Self {
            title: RefCell::new(title.to_string()),
            size: Cell::new((width, height)),
            close_requested: Cell::new(false),
        }
    }

    #[must_use]
    pub fn from_settings(settings: &WindowSettings) -> Self {
        Self::new(&settings.title, settings.width, settings.height)
    }

    pub fn resize(&self, width: u32, height: u32) {
        self.size.set((width, height));
    }
}

impl Window for HeadlessWindow {
    fn set_title(&self, title: &str) {
        title.clone_into(&mut self.title.borrow_mut());
    }

    fn title(&self) -> String {
        self.title.borrow().clone()
    }

    fn inner_size(&self) -> (u32, u32) {
        self.size.get()
    }

    fn should_close(&self) -> bool {
        self.close_requested.get()
    }

    fn request_close(&self) {
        self.close_requested.set(true);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
