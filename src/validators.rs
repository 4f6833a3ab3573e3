//! Input validation for scale settings and steps
//!
//! The engine rejects bad numbers but never repairs them. Repairs happen here,
//! at the input boundary, before a scale is computed or saved.

use crate::core::defaults::FIXED_TAGS;
use crate::core::error::{Error, Result};
use crate::core::scale::{Flavor, Scale, ScaleSettings, Step, MAX_STEPS};
use std::ops::RangeInclusive;

pub const ROOT_SIZE_RANGE: RangeInclusive<f64> = 1.0..=100.0;
pub const VIEWPORT_RANGE: RangeInclusive<f64> = 200.0..=5000.0;
pub const SCALE_RANGE: RangeInclusive<f64> = 1.0..=3.0;
pub const LINE_HEIGHT_RANGE: RangeInclusive<f64> = 0.8..=3.0;

/// Maximum length of a step display name
pub const MAX_NAME_LEN: usize = 64;

/// Validates a number against an inclusive range.
///
/// # Errors
///
/// Returns `Err` if the value is not finite or falls outside `range`.
pub fn validate_in_range(field: &str, value: f64, range: &RangeInclusive<f64>) -> Result<f64> {
    if !value.is_finite() {
        return Err(Error::validation(field, "must be a number"));
    }
    if !range.contains(&value) {
        return Err(Error::validation(
            field,
            format!("must be between {} and {}", range.start(), range.end()),
        ));
    }
    Ok(value)
}

/// Clamps a number into `range`, replacing non-finite input with `fallback`.
pub fn clamp_to_range(value: f64, range: &RangeInclusive<f64>, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(*range.start(), *range.end())
    } else {
        fallback
    }
}

/// Validates every numeric setting and the viewport ordering.
///
/// # Errors
///
/// Returns the first failing field as [`Error::Validation`].
pub fn validate_settings(settings: &ScaleSettings) -> Result<()> {
    validate_in_range("min_root_size", settings.min_root_size, &ROOT_SIZE_RANGE)?;
    validate_in_range("max_root_size", settings.max_root_size, &ROOT_SIZE_RANGE)?;
    validate_in_range("min_viewport", settings.min_viewport, &VIEWPORT_RANGE)?;
    validate_in_range("max_viewport", settings.max_viewport, &VIEWPORT_RANGE)?;
    validate_in_range("min_scale", settings.min_scale, &SCALE_RANGE)?;
    validate_in_range("max_scale", settings.max_scale, &SCALE_RANGE)?;

    if settings.min_viewport >= settings.max_viewport {
        return Err(Error::validation(
            "min_viewport",
            "must be smaller than max_viewport",
        ));
    }
    Ok(())
}

/// Returns a copy of `settings` with every value forced into its domain.
///
/// Non-finite values take the default. If the viewports end up out of order
/// or equal, the maximum is pushed just above the minimum, or both are pinned
/// to the top of the range when the minimum is already at the ceiling.
pub fn sanitize_settings(settings: &ScaleSettings) -> ScaleSettings {
    let defaults = ScaleSettings::default();
    let mut clean = ScaleSettings {
        min_root_size: clamp_to_range(
            settings.min_root_size,
            &ROOT_SIZE_RANGE,
            defaults.min_root_size,
        ),
        max_root_size: clamp_to_range(
            settings.max_root_size,
            &ROOT_SIZE_RANGE,
            defaults.max_root_size,
        ),
        min_viewport: clamp_to_range(settings.min_viewport, &VIEWPORT_RANGE, defaults.min_viewport),
        max_viewport: clamp_to_range(settings.max_viewport, &VIEWPORT_RANGE, defaults.max_viewport),
        min_scale: clamp_to_range(settings.min_scale, &SCALE_RANGE, defaults.min_scale),
        max_scale: clamp_to_range(settings.max_scale, &SCALE_RANGE, defaults.max_scale),
        unit_type: settings.unit_type,
        base_step_id: settings.base_step_id,
    };

    if clean.min_viewport >= clean.max_viewport {
        if clean.min_viewport < *VIEWPORT_RANGE.end() {
            clean.max_viewport = (clean.min_viewport + 1.0).min(*VIEWPORT_RANGE.end());
        } else {
            clean.min_viewport = *VIEWPORT_RANGE.end() - 1.0;
            clean.max_viewport = *VIEWPORT_RANGE.end();
        }
    }
    clean
}

/// Validates a step display name for use as a CSS identifier.
///
/// Allows ASCII alphanumerics, `-` and `_`. After an optional `--` (custom
/// property) or a single `-`, the name must go on with a non-digit.
///
/// # Errors
///
/// Returns `Err` for empty, over-long or non-identifier names.
pub fn validate_display_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("display_name", "cannot be empty"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(Error::validation(
            "display_name",
            format!("too long (max {MAX_NAME_LEN} characters)"),
        ));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
    {
        return Err(Error::validation(
            "display_name",
            "use only letters, digits, '-' and '_'",
        ));
    }

    let body = match name.strip_prefix("--") {
        Some(rest) => rest,
        None => name.strip_prefix('-').unwrap_or(name),
    };
    match body.chars().next() {
        None => Err(Error::validation(
            "display_name",
            "needs a name after the leading dashes",
        )),
        Some(c) if c.is_ascii_digit() => {
            Err(Error::validation("display_name", "cannot start with a digit"))
        }
        Some(_) => Ok(name.to_string()),
    }
}

/// Validates an optional line height.
///
/// # Errors
///
/// Returns `Err` if set and outside 0.8..=3.0.
pub fn validate_line_height(line_height: Option<f64>) -> Result<Option<f64>> {
    line_height
        .map(|lh| validate_in_range("line_height", lh, &LINE_HEIGHT_RANGE))
        .transpose()
}

/// Checks that `name` is free within `scale`, ignoring the step `except_id`.
///
/// # Errors
///
/// Returns `Err` if another step already uses the name (case-sensitive).
pub fn ensure_unique_name(scale: &Scale, name: &str, except_id: Option<u32>) -> Result<()> {
    let taken = scale
        .steps
        .iter()
        .any(|s| Some(s.id) != except_id && s.display_name == name);
    if taken {
        Err(Error::validation(
            "display_name",
            format!("'{name}' is already used in this scale"),
        ))
    } else {
        Ok(())
    }
}

/// Validates a new step before it's added to `scale`.
///
/// # Errors
///
/// Returns `Err` on a bad/duplicate name, bad line height, a full scale, or
/// any attempt to add to the fixed tag list.
pub fn validate_new_step(scale: &Scale, step: &Step) -> Result<()> {
    if scale.flavor == Flavor::TagRule {
        return Err(Error::validation("display_name", "the tag list is fixed"));
    }
    if scale.steps.len() >= MAX_STEPS {
        return Err(Error::validation(
            "steps",
            format!("a scale holds at most {MAX_STEPS} steps"),
        ));
    }
    if scale.step(step.id).is_some() {
        return Err(Error::validation("id", format!("id {} is already in use", step.id)));
    }
    validate_display_name(&step.display_name)?;
    ensure_unique_name(scale, &step.display_name, None)?;
    validate_line_height(step.line_height)?;
    Ok(())
}

/// Validates an edit of an existing step.
///
/// # Errors
///
/// Returns `Err` if the step is unknown, the new name is invalid or taken,
/// a fixed tag is renamed, or the line height is out of range.
pub fn validate_step_edit(scale: &Scale, edited: &Step) -> Result<()> {
    let current = scale
        .step(edited.id)
        .ok_or_else(|| Error::validation("id", format!("no step with id {}", edited.id)))?;

    if current.display_name != edited.display_name {
        if scale.flavor == Flavor::TagRule && FIXED_TAGS.contains(&current.display_name.as_str()) {
            return Err(Error::validation(
                "display_name",
                format!("tag '{}' cannot be renamed", current.display_name),
            ));
        }
        validate_display_name(&edited.display_name)?;
        ensure_unique_name(scale, &edited.display_name, Some(edited.id))?;
    }
    validate_line_height(edited.line_height)?;
    Ok(())
}

/// Validates a whole loaded scale (names unique, ids unique, sizes in range).
///
/// # Errors
///
/// Returns the first problem found.
pub fn validate_scale(scale: &Scale) -> Result<()> {
    if scale.steps.len() > MAX_STEPS {
        return Err(Error::validation(
            "steps",
            format!("{} steps (max: {MAX_STEPS})", scale.steps.len()),
        ));
    }
    for (index, step) in scale.steps.iter().enumerate() {
        let earlier = &scale.steps[..index];
        if earlier.iter().any(|s| s.id == step.id) {
            return Err(Error::validation("id", format!("duplicate id {}", step.id)));
        }
        if earlier.iter().any(|s| s.display_name == step.display_name) {
            return Err(Error::validation(
                "display_name",
                format!("duplicate name '{}'", step.display_name),
            ));
        }
        validate_line_height(step.line_height)?;
    }
    validate_settings(&scale.settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::defaults::default_scale;
    use crate::core::scale::ScaleKind;

    #[test]
    fn test_validate_settings_defaults_pass() {
        assert!(validate_settings(&ScaleSettings::default()).is_ok());
    }

    #[test]
    fn test_validate_settings_viewport_order() {
        let settings = ScaleSettings {
            min_viewport: 1200.0,
            max_viewport: 1200.0,
            ..ScaleSettings::default()
        };
        let err = validate_settings(&settings).unwrap_err();
        assert!(err.to_string().contains("max_viewport"));
    }

    #[test]
    fn test_validate_settings_rejects_nan() {
        let settings = ScaleSettings {
            min_scale: f64::NAN,
            ..ScaleSettings::default()
        };
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_sanitize_settings_clamps() {
        let settings = ScaleSettings {
            min_root_size: 0.0,
            max_root_size: f64::INFINITY,
            min_viewport: 100.0,
            max_viewport: 9000.0,
            min_scale: 0.5,
            max_scale: 7.0,
            ..ScaleSettings::default()
        };
        let clean = sanitize_settings(&settings);
        assert_eq!(clean.min_root_size, 1.0);
        assert_eq!(clean.max_root_size, 20.0);
        assert_eq!(clean.min_viewport, 200.0);
        assert_eq!(clean.max_viewport, 5000.0);
        assert_eq!(clean.min_scale, 1.0);
        assert_eq!(clean.max_scale, 3.0);
        assert!(validate_settings(&clean).is_ok());
    }

    #[test]
    fn test_sanitize_settings_fixes_inverted_viewports() {
        let settings = ScaleSettings {
            min_viewport: 5000.0,
            max_viewport: 5000.0,
            ..ScaleSettings::default()
        };
        let clean = sanitize_settings(&settings);
        assert!(clean.min_viewport < clean.max_viewport);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(validate_display_name(" medium ").unwrap(), "medium");
        assert!(validate_display_name("--fs-lg").is_ok());
        assert!(validate_display_name("space_2").is_ok());
        assert!(validate_display_name("").is_err());
        assert!(validate_display_name("--").is_err());
        assert!(validate_display_name("2xl").is_err());
        assert!(validate_display_name("--2xl").is_err());
        assert!(validate_display_name("-").is_err());
        assert!(validate_display_name("-1").is_err());
        assert!(validate_display_name("-2xl").is_err());
        assert!(validate_display_name("-lg").is_ok());
        assert!(validate_display_name("--s-1").is_ok());
        assert!(validate_display_name("big text").is_err());
        assert!(validate_display_name("a{b}").is_err());
    }

    #[test]
    fn test_unique_names_are_case_sensitive() {
        let scale = default_scale(ScaleKind::Font, Flavor::ClassRule).unwrap();
        assert!(ensure_unique_name(&scale, "medium", None).is_err());
        assert!(ensure_unique_name(&scale, "Medium", None).is_ok());
        assert!(ensure_unique_name(&scale, "medium", Some(5)).is_ok());
    }

    #[test]
    fn test_fixed_tags_cannot_be_renamed() {
        let scale = default_scale(ScaleKind::Font, Flavor::TagRule).unwrap();
        let mut edited = scale.steps[0].clone();
        edited.display_name = "title".to_string();
        assert!(validate_step_edit(&scale, &edited).is_err());

        let mut line_only = scale.steps[0].clone();
        line_only.line_height = Some(1.05);
        assert!(validate_step_edit(&scale, &line_only).is_ok());
    }

    #[test]
    fn test_tag_list_is_closed() {
        let scale = default_scale(ScaleKind::Font, Flavor::TagRule).unwrap();
        let step = Step::new(scale.next_id(), "blockquote");
        assert!(validate_new_step(&scale, &step).is_err());
    }

    #[test]
    fn test_new_step_checks() {
        let scale = default_scale(ScaleKind::Space, Flavor::UtilityRule).unwrap();
        assert!(validate_new_step(&scale, &Step::new(scale.next_id(), "xxxxl")).is_ok());
        assert!(validate_new_step(&scale, &Step::new(scale.next_id(), "m")).is_err());
        assert!(validate_new_step(&scale, &Step::new(1, "fresh")).is_err());
        assert!(
            validate_new_step(
                &scale,
                &Step::new(scale.next_id(), "tall").with_line_height(5.0)
            )
            .is_err()
        );
    }

    #[test]
    fn test_validate_scale_detects_duplicates() {
        let mut scale = default_scale(ScaleKind::Space, Flavor::ClassRule).unwrap();
        assert!(validate_scale(&scale).is_ok());
        scale.steps[1].display_name = scale.steps[0].display_name.clone();
        assert!(validate_scale(&scale).is_err());
    }
}
