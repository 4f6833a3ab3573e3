//! Fluid size computation
//!
//! Sizes grow exponentially away from the base step: a step `n` places before
//! the base is `scale^n` times larger, a step `n` places after it is `scale^n`
//! times smaller. The small-viewport and large-viewport bounds use their own
//! ratio, and [`generate_clamp`] interpolates linearly between them.
//!
//! Everything here is pure. Inputs are never mutated; callers get a new list.

use super::error::{Error, Result};
use super::scale::{ScaleSettings, Step, UnitType};

/// Browser default root font size used for px -> rem conversion.
///
/// This is the assumed default, not the visitor's actual browser setting.
pub const DEFAULT_ROOT_FONT_SIZE: f64 = 16.0;

/// Rounds to 3 decimal places, half away from zero.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn require_finite(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::InvalidInput(format!("{name} is not a finite number")))
    }
}

/// Converts the settings' root bounds into the active unit.
pub fn base_sizes(settings: &ScaleSettings) -> Result<(f64, f64)> {
    let min_root = require_finite("min_root_size", settings.min_root_size)?;
    let max_root = require_finite("max_root_size", settings.max_root_size)?;

    Ok(match settings.unit_type {
        UnitType::Px => (min_root, max_root),
        UnitType::Rem => (
            min_root / DEFAULT_ROOT_FONT_SIZE,
            max_root / DEFAULT_ROOT_FONT_SIZE,
        ),
    })
}

/// Computes `min`/`max` for every step.
///
/// Returns a copy of `steps` with both bounds populated, in the settings' unit.
///
/// # Errors
///
/// - [`Error::Configuration`] if `base_step_id` is not in `steps` (including
///   when `steps` is empty). Choosing a replacement base is the caller's call.
/// - [`Error::InvalidInput`] if a scale ratio or root size is not finite, or a
///   computed size overflows.
pub fn compute_sizes(steps: &[Step], settings: &ScaleSettings) -> Result<Vec<Step>> {
    let min_scale = require_finite("min_scale", settings.min_scale)?;
    let max_scale = require_finite("max_scale", settings.max_scale)?;
    let (min_base, max_base) = base_sizes(settings)?;

    let base_index = steps
        .iter()
        .position(|s| s.id == settings.base_step_id)
        .ok_or_else(|| {
            Error::Configuration(format!(
                "base step {} not found among {} steps",
                settings.base_step_id,
                steps.len()
            ))
        })?;

    if let [only] = steps {
        let mut step = only.clone();
        step.min = Some(round3(min_base));
        step.max = Some(round3(max_base));
        return Ok(vec![step]);
    }

    steps
        .iter()
        .enumerate()
        .map(|(index, step)| {
            // Earlier rows are larger: positive distance before the base
            let distance = base_index as i32 - index as i32;
            let min = round3(min_base * min_scale.powi(distance));
            let max = round3(max_base * max_scale.powi(distance));

            let mut sized = step.clone();
            sized.min = Some(require_finite("computed min size", min)?);
            sized.max = Some(require_finite("computed max size", max)?);
            Ok(sized)
        })
        .collect()
}

/// Formats to 4 decimals without ever printing a negative zero.
fn fixed4(value: f64) -> String {
    let formatted = format!("{value:.4}");
    if formatted == "-0.0000" {
        "0.0000".to_string()
    } else {
        formatted
    }
}

/// Builds a `clamp(MIN, PREFERRED, MAX)` expression that interpolates
/// linearly from `min_size` at `min_viewport` to `max_size` at `max_viewport`.
///
/// The preferred value is `intersection + slope * 100vw`. For rem output the
/// px-denominated slope is reused unchanged, which is the usual convention
/// for fluid clamp generators.
///
/// # Example
///
/// ```
/// use clampgen::core::engine::generate_clamp;
/// use clampgen::core::scale::UnitType;
///
/// let css = generate_clamp(16.0, 20.0, 375.0, 1620.0, UnitType::Px).unwrap();
/// assert_eq!(css, "clamp(16px, 14.7952px + 0.3213vw, 20px)");
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the viewports are equal or any input is
/// not finite.
pub fn generate_clamp(
    min_size: f64,
    max_size: f64,
    min_viewport: f64,
    max_viewport: f64,
    unit: UnitType,
) -> Result<String> {
    require_finite("min size", min_size)?;
    require_finite("max size", max_size)?;
    require_finite("min viewport", min_viewport)?;
    require_finite("max viewport", max_viewport)?;

    let viewport_range = max_viewport - min_viewport;
    if viewport_range == 0.0 {
        return Err(Error::InvalidInput(format!(
            "viewport range has zero width ({min_viewport}px to {max_viewport}px)"
        )));
    }

    let slope = (max_size - min_size) / viewport_range;
    let intersection = min_size - slope * min_viewport;
    let slope_vw = slope * 100.0;
    let unit = unit.as_str();

    Ok(format!(
        "clamp({min_size}{unit}, {}{unit} + {}vw, {max_size}{unit})",
        fixed4(intersection),
        fixed4(slope_vw)
    ))
}
