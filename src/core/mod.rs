//! Core scale computation
//!
//! - [`scale`]: Data structures for steps, settings, scales and profiles
//! - [`engine`]: Size computation and `clamp()` generation
//! - [`css`]: CSS rendering for each output flavor
//! - [`defaults`]: Default step lists for new profiles
//! - [`error`]: Error types
//! - [`profiles`]: Profile storage

pub mod css;
pub mod defaults;
pub mod engine;
pub mod error;
pub mod profiles;
pub mod scale;

#[cfg(test)]
pub mod test_helpers;
