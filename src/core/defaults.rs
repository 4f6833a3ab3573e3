//! Default scale seeding
//!
//! New profiles start from these lists. Step ids are assigned from 1 in list
//! order and the base step is the "medium" entry of each list (the paragraph
//! tag for the tag flavor).

use super::scale::{Flavor, Profile, Scale, ScaleKind, ScaleSettings, Step, UnitType};

/// Heading and body tags of the tag flavor, largest first. Never renamed.
pub const FIXED_TAGS: [&str; 7] = ["h1", "h2", "h3", "h4", "h5", "h6", "p"];

/// Font class names, largest first
const FONT_CLASSES: [(&str, f64); 8] = [
    ("xxxlarge", 1.1),
    ("xxlarge", 1.2),
    ("xlarge", 1.2),
    ("large", 1.3),
    ("medium", 1.4),
    ("small", 1.5),
    ("xsmall", 1.5),
    ("xxsmall", 1.6),
];

const FONT_VARIABLES: [(&str, f64); 8] = [
    ("--fs-xxxl", 1.1),
    ("--fs-xxl", 1.2),
    ("--fs-xl", 1.2),
    ("--fs-lg", 1.3),
    ("--fs-md", 1.4),
    ("--fs-sm", 1.5),
    ("--fs-xs", 1.5),
    ("--fs-xxs", 1.6),
];

const TAG_LINE_HEIGHTS: [f64; 7] = [1.1, 1.2, 1.2, 1.3, 1.4, 1.4, 1.5];

const SPACE_CLASSES: [&str; 8] = [
    "space-xxxl",
    "space-xxl",
    "space-xl",
    "space-l",
    "space-m",
    "space-s",
    "space-xs",
    "space-xxs",
];

const SPACE_VARIABLES: [&str; 8] = [
    "--sp-xxxl", "--sp-xxl", "--sp-xl", "--sp-l", "--sp-m", "--sp-s", "--sp-xs", "--sp-xxs",
];

const SPACE_UTILITIES: [&str; 8] = ["xxxl", "xxl", "xl", "l", "m", "s", "xs", "xxs"];

/// Index of the base entry in the 8-entry class/variable/utility lists
const MEDIUM_INDEX: u32 = 4;

/// Index of `p` in [`FIXED_TAGS`]
const PARAGRAPH_INDEX: u32 = 6;

/// Settings a fresh scale of `kind` starts with
pub fn default_settings(kind: ScaleKind, base_step_id: u32) -> ScaleSettings {
    match kind {
        ScaleKind::Font => ScaleSettings {
            min_root_size: 16.0,
            max_root_size: 20.0,
            min_viewport: 375.0,
            max_viewport: 1620.0,
            min_scale: 1.125,
            max_scale: 1.333,
            unit_type: UnitType::Rem,
            base_step_id,
        },
        ScaleKind::Space => ScaleSettings {
            min_root_size: 8.0,
            max_root_size: 12.0,
            min_viewport: 375.0,
            max_viewport: 1620.0,
            min_scale: 1.25,
            max_scale: 1.414,
            unit_type: UnitType::Px,
            base_step_id,
        },
    }
}

fn numbered<I, S>(names: I) -> Vec<Step>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    (1..).zip(names).map(|(id, name)| Step::new(id, name)).collect()
}

fn numbered_with_line_heights(entries: &[(&str, f64)]) -> Vec<Step> {
    (1..)
        .zip(entries)
        .map(|(id, (name, line_height))| Step::new(id, *name).with_line_height(*line_height))
        .collect()
}

/// Default step list for one flavor of a scale kind.
///
/// Returns `None` for combinations the kind doesn't carry.
pub fn default_steps(kind: ScaleKind, flavor: Flavor) -> Option<Vec<Step>> {
    let steps = match (kind, flavor) {
        (ScaleKind::Font, Flavor::ClassRule) => numbered_with_line_heights(&FONT_CLASSES),
        (ScaleKind::Font, Flavor::CssVariable) => numbered_with_line_heights(&FONT_VARIABLES),
        (ScaleKind::Font, Flavor::TagRule) => (1..)
            .zip(FIXED_TAGS.iter().zip(TAG_LINE_HEIGHTS))
            .map(|(id, (tag, line_height))| Step::new(id, *tag).with_line_height(line_height))
            .collect(),
        (ScaleKind::Space, Flavor::ClassRule) => numbered(SPACE_CLASSES),
        (ScaleKind::Space, Flavor::CssVariable) => numbered(SPACE_VARIABLES),
        (ScaleKind::Space, Flavor::UtilityRule) => numbered(SPACE_UTILITIES),
        _ => return None,
    };
    Some(steps)
}

/// Default scale for one flavor, with the base step set to its middle entry
pub fn default_scale(kind: ScaleKind, flavor: Flavor) -> Option<Scale> {
    let steps = default_steps(kind, flavor)?;
    let base_index = if flavor == Flavor::TagRule {
        PARAGRAPH_INDEX
    } else {
        MEDIUM_INDEX
    };
    Some(Scale {
        flavor,
        settings: default_settings(kind, base_index + 1),
        steps,
    })
}

/// A fresh profile with every flavor the kind carries
pub fn default_profile(kind: ScaleKind) -> Profile {
    Profile {
        kind,
        scales: kind
            .flavors()
            .iter()
            .filter_map(|flavor| default_scale(kind, *flavor))
            .collect(),
        saved_at: None,
    }
}
