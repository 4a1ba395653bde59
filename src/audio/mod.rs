//! Audio Engine
//!
//! Holds the global mixing settings. Playback lives in the platform backend;
//! the scene only carries a reference so components can reach it.

use crate::settings::AudioSettings;

#[derive(Debug, Clone)]
pub struct AudioEngine {
    master_volume: f32,
    muted: bool,
}

impl Default for AudioEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(&AudioSettings::default())
    }

    #[must_use]
    pub fn with_settings(settings: &AudioSettings) -> Self {
        Self {
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            muted: settings.muted,
        }
    }

    /// Clamped to `[0, 1]`.
    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = volume.clamp(0.0, 1.0);
    }

    #[must_use]
    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Volume actually applied to output.
    #[must_use]
    pub fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }
}
