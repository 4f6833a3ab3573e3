//! clampgen - fluid `clamp()` sizes for typographic and spacing scales
//!
//! Turns an ordered list of named steps, a base step, two scale ratios and a
//! viewport range into one CSS `clamp()` per step, interpolating linearly
//! between the small and large viewport.
//!
//! # Architecture
//!
//! - [`core`] - Scale model, size computation and CSS generation
//! - [`validators`] - Input validation at the edit boundary
//! - [`command`] - Undo/redo of step edits
//! - [`config`] - Configuration persistence
//! - [`utils`] - XDG directories
//!
//! # Example
//!
//! ```
//! use clampgen::core::defaults::default_profile;
//! use clampgen::core::scale::{Flavor, ScaleKind};
//!
//! let profile = default_profile(ScaleKind::Font);
//! let scale = profile.scale(Flavor::TagRule).unwrap();
//! let css = scale.render(profile.kind).unwrap();
//! assert!(css.lines().any(|line| line.starts_with("h1 { font-size: clamp(")));
//! ```

#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::missing_errors_doc)]

pub mod command;
pub mod config;
pub mod core;
pub mod utils;
pub mod validators;

// Re-export commonly used types
pub use crate::core::error::{Error, Result};
pub use crate::core::scale::{Flavor, Profile, Scale, ScaleKind, ScaleSettings, Step, UnitType};
