//! CSS generation for computed scales
//!
//! Each [`Flavor`] maps to one formatter through [`formatter_for`]. Formatters
//! only see steps that already carry both `min` and `max`; anything still
//! missing a bound (mid-edit data) is skipped rather than treated as an error.
//!
//! Numbers are written with `format!`, which is locale-independent, so the
//! same inputs always produce byte-identical CSS.

use std::fmt::Write;

use super::engine::generate_clamp;
use super::error::{Error, Result};
use super::scale::{Flavor, ScaleKind, ScaleSettings, Step};

/// Directional utility suffixes and the longhand properties each one sets
const UTILITY_SIDES: [(&str, &[&str]); 6] = [
    ("t", &["top"]),
    ("b", &["bottom"]),
    ("l", &["left"]),
    ("r", &["right"]),
    ("x", &["left", "right"]),
    ("y", &["top", "bottom"]),
];

/// A step paired with its generated clamp expression
struct ClampedStep<'a> {
    step: &'a Step,
    clamp: String,
}

type Formatter = fn(&[ClampedStep<'_>], ScaleKind) -> String;

/// Dispatch table from output flavor to formatter
const FORMATTERS: [(Flavor, Formatter); 4] = [
    (Flavor::ClassRule, format_class_rules),
    (Flavor::CssVariable, format_variables),
    (Flavor::TagRule, format_tag_rules),
    (Flavor::UtilityRule, format_utilities),
];

fn formatter_for(flavor: Flavor) -> Formatter {
    FORMATTERS
        .iter()
        .find_map(|(f, formatter)| (*f == flavor).then_some(*formatter))
        .unwrap_or(format_class_rules)
}

/// Renders computed steps as CSS text in the requested flavor.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the flavor is not available for `kind`
/// (utilities on a font scale) or if clamp generation fails for a step.
pub fn render_css(
    steps: &[Step],
    settings: &ScaleSettings,
    kind: ScaleKind,
    flavor: Flavor,
) -> Result<String> {
    if flavor == Flavor::UtilityRule && kind != ScaleKind::Space {
        return Err(Error::InvalidInput(format!(
            "{flavor} flavor is only available for space scales"
        )));
    }

    let clamped = steps
        .iter()
        .filter_map(|step| step.sizes().map(|sizes| (step, sizes)))
        .map(|(step, (min, max))| {
            let clamp = generate_clamp(
                min,
                max,
                settings.min_viewport,
                settings.max_viewport,
                settings.unit_type,
            )?;
            Ok(ClampedStep { step, clamp })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(formatter_for(flavor)(&clamped, kind))
}

fn write_rule(out: &mut String, selector: &str, clamped: &ClampedStep<'_>, kind: ScaleKind) {
    match kind {
        ScaleKind::Font => {
            let _ = write!(out, "{selector} {{ font-size: {};", clamped.clamp);
            if let Some(line_height) = clamped.step.line_height {
                let _ = write!(out, " line-height: {line_height};");
            }
            let _ = writeln!(out, " }}");
        }
        ScaleKind::Space => {
            let _ = writeln!(out, "{selector} {{ margin: {}; }}", clamped.clamp);
        }
    }
}

fn format_class_rules(steps: &[ClampedStep<'_>], kind: ScaleKind) -> String {
    let mut out = String::new();
    for clamped in steps {
        let selector = format!(".{}", clamped.step.display_name);
        write_rule(&mut out, &selector, clamped, kind);
    }
    out
}

fn format_tag_rules(steps: &[ClampedStep<'_>], kind: ScaleKind) -> String {
    let mut out = String::new();
    for clamped in steps {
        write_rule(&mut out, &clamped.step.display_name, clamped, kind);
    }
    out
}

/// Custom property name for a step, adding the `--` prefix when absent
pub fn variable_name(display_name: &str) -> String {
    if display_name.starts_with("--") {
        display_name.to_string()
    } else {
        format!("--{display_name}")
    }
}

fn format_variables(steps: &[ClampedStep<'_>], _kind: ScaleKind) -> String {
    let mut out = String::from(":root {\n");
    for clamped in steps {
        let _ = writeln!(
            out,
            "  {}: {};",
            variable_name(&clamped.step.display_name),
            clamped.clamp
        );
    }
    out.push_str("}\n");
    out
}

fn format_utilities(steps: &[ClampedStep<'_>], _kind: ScaleKind) -> String {
    let mut out = String::new();
    for clamped in steps {
        let name = &clamped.step.display_name;
        for property in clamped.step.effective_properties() {
            let (abbrev, prop) = (property.abbrev(), property.as_str());

            for (suffix, sides) in UTILITY_SIDES {
                let _ = write!(out, ".{abbrev}-{name}-{suffix} {{");
                for side in sides {
                    let _ = write!(out, " {prop}-{side}: {};", clamped.clamp);
                }
                let _ = writeln!(out, " }}");
            }

            let _ = writeln!(out, ".{abbrev}-{name} {{ {prop}: {}; }}", clamped.clamp);
        }
    }
    out
}

/// Line diff of two generated stylesheets, `None` when they are identical.
///
/// Lines are prefixed `- ` (only in `old`), `+ ` (only in `new`) or two spaces.
pub fn diff_css(old: &str, new: &str) -> Option<String> {
    if old == new {
        return None;
    }

    let diff = similar::TextDiff::from_lines(old, new);
    let mut result = String::new();

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            similar::ChangeTag::Delete => "- ",
            similar::ChangeTag::Insert => "+ ",
            similar::ChangeTag::Equal => "  ",
        };
        let _ = write!(result, "{sign}{change}");
        if change.missing_newline() {
            result.push('\n');
        }
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scale::SpaceProperty;

    #[test]
    fn test_diff_css() {
        assert!(diff_css(".a { }\n", ".a { }\n").is_none());

        let diff = diff_css(".a { x }\n.b { y }\n", ".a { x }\n.b { z }\n").unwrap();
        let lines: Vec<&str> = diff.lines().collect();
        assert_eq!(lines, ["  .a { x }", "- .b { y }", "+ .b { z }"]);
    }

    fn sized(id: u32, name: &str, min: f64, max: f64) -> Step {
        let mut step = Step::new(id, name);
        step.min = Some(min);
        step.max = Some(max);
        step
    }

    #[test]
    fn test_dispatch_table_covers_every_flavor() {
        use strum::IntoEnumIterator;
        for flavor in Flavor::iter() {
            assert!(FORMATTERS.iter().any(|(f, _)| *f == flavor), "{flavor}");
        }
    }

    #[test]
    fn test_font_class_rule_with_line_height() {
        let steps = vec![sized(1, "medium", 16.0, 20.0).with_line_height(1.4)];
        let css = render_css(
            &steps,
            &ScaleSettings::default(),
            ScaleKind::Font,
            Flavor::ClassRule,
        )
        .unwrap();
        assert_eq!(
            css,
            ".medium { font-size: clamp(16px, 14.7952px + 0.3213vw, 20px); line-height: 1.4; }\n"
        );
    }

    #[test]
    fn test_space_class_rule_uses_margin() {
        let steps = vec![sized(1, "space-m", 16.0, 20.0).with_line_height(1.4)];
        let css = render_css(
            &steps,
            &ScaleSettings::default(),
            ScaleKind::Space,
            Flavor::ClassRule,
        )
        .unwrap();
        assert_eq!(
            css,
            ".space-m { margin: clamp(16px, 14.7952px + 0.3213vw, 20px); }\n"
        );
    }

    #[test]
    fn test_tag_rule_has_bare_selector() {
        let steps = vec![sized(1, "h2", 16.0, 20.0)];
        let css = render_css(
            &steps,
            &ScaleSettings::default(),
            ScaleKind::Font,
            Flavor::TagRule,
        )
        .unwrap();
        assert!(css.starts_with("h2 { font-size: clamp("));
        assert!(!css.contains("line-height"));
    }

    #[test]
    fn test_variable_block() {
        let steps = vec![sized(1, "--fs-lg", 18.0, 26.66), sized(2, "fs-md", 16.0, 20.0)];
        let css = render_css(
            &steps,
            &ScaleSettings::default(),
            ScaleKind::Font,
            Flavor::CssVariable,
        )
        .unwrap();
        let lines: Vec<&str> = css.lines().collect();
        assert_eq!(lines.first(), Some(&":root {"));
        assert_eq!(lines.last(), Some(&"}"));
        assert!(lines[1].starts_with("  --fs-lg: clamp(18px,"));
        assert!(lines[2].starts_with("  --fs-md: clamp(16px,"));
    }

    #[test]
    fn test_utilities_emit_seven_classes_per_property() {
        let steps = vec![sized(1, "md", 16.0, 20.0)];
        let css = render_css(
            &steps,
            &ScaleSettings::default(),
            ScaleKind::Space,
            Flavor::UtilityRule,
        )
        .unwrap();
        assert_eq!(css.lines().count(), 14);
        assert!(css.contains(".m-md-t { margin-top: clamp("));
        assert!(css.contains(".p-md-y { padding-top: clamp("));
        assert!(css.contains("; padding-bottom: clamp("));
        assert!(css.contains(".p-md { padding: clamp("));
    }

    #[test]
    fn test_utilities_respect_step_properties() {
        let steps = vec![sized(1, "lg", 16.0, 20.0).with_properties(vec![SpaceProperty::Padding])];
        let css = render_css(
            &steps,
            &ScaleSettings::default(),
            ScaleKind::Space,
            Flavor::UtilityRule,
        )
        .unwrap();
        assert_eq!(css.lines().count(), 7);
        assert!(!css.contains("margin"));
    }

    #[test]
    fn test_utilities_rejected_for_font_scales() {
        let steps = vec![sized(1, "md", 16.0, 20.0)];
        let result = render_css(
            &steps,
            &ScaleSettings::default(),
            ScaleKind::Font,
            Flavor::UtilityRule,
        );
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_steps_missing_bounds_are_skipped() {
        let mut partial = Step::new(2, "sm");
        partial.min = Some(14.0);
        let steps = vec![sized(1, "lg", 18.0, 24.0), partial, Step::new(3, "xs")];
        let css = render_css(
            &steps,
            &ScaleSettings::default(),
            ScaleKind::Font,
            Flavor::ClassRule,
        )
        .unwrap();
        assert_eq!(css.lines().count(), 1);
        assert!(css.starts_with(".lg "));
    }

    #[test]
    fn test_equal_viewports_fail_render() {
        let steps = vec![sized(1, "md", 16.0, 20.0)];
        let settings = ScaleSettings {
            min_viewport: 800.0,
            max_viewport: 800.0,
            ..ScaleSettings::default()
        };
        let result = render_css(&steps, &settings, ScaleKind::Font, Flavor::ClassRule);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
