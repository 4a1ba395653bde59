//! Error Types
//!
//! This module defines the error types used throughout the engine.
//!
//! # Overview
//!
//! The main error type [`EncoError`] covers the failure modes of the core:
//! - Scene hierarchy misuse (unknown handles, cycles, removing the root)
//! - Component lifecycle misuse (double attachment, missing engines)
//! - Resource loading and decoding errors
//! - Configuration parsing errors
//!
//! Degenerate math (singular matrices, parallel basis vectors) is *not* an
//! error: those cases resolve to defined fallback values.
//!
//! # Usage
//!
//! All fallible public APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, EncoError>`.
//!
//! ```rust,ignore
//! use enco::errors::{EncoError, Result};
//!
//! fn attach() -> Result<()> {
//!     Ok(())
//! }
//! ```

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Identifies one of the backend engines a component can depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineKind {
    Rendering,
    Physics,
    Audio,
    Window,
    Timer,
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineKind::Rendering => "rendering engine",
            EngineKind::Physics => "physics engine",
            EngineKind::Audio => "audio engine",
            EngineKind::Window => "window",
            EngineKind::Timer => "timer",
        };
        f.write_str(name)
    }
}

/// The main error type for the Enco engine.
#[derive(Error, Debug)]
pub enum EncoError {
    // ========================================================================
    // Scene Hierarchy Errors
    // ========================================================================
    /// The node handle does not refer to a live node.
    #[error("Node not found")]
    NodeNotFound,

    /// Attaching would make a node its own ancestor.
    #[error("Attaching node would create a cycle in the hierarchy")]
    HierarchyCycle,

    /// The root node cannot be removed, detached or re-parented.
    #[error("The root node cannot be removed, detached or re-parented")]
    RootNodeImmutable,

    // ========================================================================
    // Component Errors
    // ========================================================================
    /// The component key does not refer to a live component.
    #[error("Component not found")]
    ComponentNotFound,

    /// The component is already attached to a node and must be detached first.
    #[error("Component is already attached to a node")]
    ComponentAlreadyAttached,

    /// A component hook needed an engine that was never set on its node.
    #[error("Missing {0}: set it on the scene before running the lifecycle")]
    MissingEngine(EngineKind),

    // ========================================================================
    // Resource Errors
    // ========================================================================
    /// A pooled resource could not be read or decoded.
    #[error("Failed to load resource '{path}': {reason}")]
    ResourceLoad {
        /// Path that was requested
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    // ========================================================================
    // I/O & Format Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Alias for `Result<T, EncoError>`.
pub type Result<T> = std::result::Result<T, EncoError>;
