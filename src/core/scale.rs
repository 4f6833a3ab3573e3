//! Scale data structures
//!
//! A scale is an ordered list of [`Step`]s plus one [`ScaleSettings`]. The
//! position of a step in the list is its place in the scale: steps earlier in
//! the list than the base step are larger, later ones are smaller.
//!
//! # Example
//!
//! ```
//! use clampgen::core::scale::{Flavor, Scale, ScaleKind, ScaleSettings, Step};
//!
//! let scale = Scale {
//!     flavor: Flavor::ClassRule,
//!     settings: ScaleSettings {
//!         base_step_id: 2,
//!         ..ScaleSettings::default()
//!     },
//!     steps: vec![Step::new(1, "large"), Step::new(2, "medium"), Step::new(3, "small")],
//! };
//!
//! let css = scale.render(ScaleKind::Space).unwrap();
//! assert!(css.contains(".medium { margin: clamp("));
//! ```

use serde::{Deserialize, Serialize};

/// Maximum number of steps allowed in a single scale
///
/// Realistic scales have a dozen steps at most; the cap keeps hand-edited
/// profile files from producing absurd exponents.
pub const MAX_STEPS: usize = 64;

/// Size unit for computed values and generated CSS
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Default,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    #[default]
    #[strum(serialize = "px")]
    Px,
    #[strum(serialize = "rem")]
    Rem,
}

impl UnitType {
    /// CSS unit suffix
    pub const fn as_str(self) -> &'static str {
        match self {
            UnitType::Px => "px",
            UnitType::Rem => "rem",
        }
    }
}

/// Which calculator a scale belongs to
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Default,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
pub enum ScaleKind {
    /// Typographic scale: emits `font-size` and `line-height`
    #[default]
    #[strum(serialize = "font")]
    Font,
    /// Spacing scale: emits `margin` (and `padding` for utilities)
    #[strum(serialize = "space")]
    Space,
}

impl ScaleKind {
    /// Output flavors a profile of this kind carries, in display order
    pub const fn flavors(self) -> &'static [Flavor] {
        match self {
            ScaleKind::Font => &[Flavor::ClassRule, Flavor::CssVariable, Flavor::TagRule],
            ScaleKind::Space => &[Flavor::ClassRule, Flavor::CssVariable, Flavor::UtilityRule],
        }
    }

    /// Returns display name for CLI output
    pub const fn display_name(self) -> &'static str {
        match self {
            ScaleKind::Font => "Font Clamp",
            ScaleKind::Space => "Space Clamp",
        }
    }
}

/// Output CSS shape
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
pub enum Flavor {
    /// `.name { ... }`
    #[strum(serialize = "class")]
    ClassRule,
    /// `:root { --name: ...; }`
    #[strum(serialize = "variable")]
    CssVariable,
    /// `h1 { ... }`
    #[strum(serialize = "tag")]
    TagRule,
    /// `.m-name-t { ... }` and friends (spacing only)
    #[strum(serialize = "utility")]
    UtilityRule,
}

impl Flavor {
    /// Returns display name for CLI output
    pub const fn display_name(self) -> &'static str {
        match self {
            Flavor::ClassRule => "Classes",
            Flavor::CssVariable => "Variables",
            Flavor::TagRule => "Tags",
            Flavor::UtilityRule => "Utilities",
        }
    }

    /// Whether a scale of `kind` can be rendered in this flavor
    pub fn supported_by(self, kind: ScaleKind) -> bool {
        kind.flavors().contains(&self)
    }
}

/// Box property a spacing utility targets
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
pub enum SpaceProperty {
    #[strum(serialize = "margin")]
    Margin,
    #[strum(serialize = "padding")]
    Padding,
}

impl SpaceProperty {
    /// Single-letter prefix used in utility class names
    pub const fn abbrev(self) -> &'static str {
        match self {
            SpaceProperty::Margin => "m",
            SpaceProperty::Padding => "p",
        }
    }

    /// CSS property name
    pub const fn as_str(self) -> &'static str {
        match self {
            SpaceProperty::Margin => "margin",
            SpaceProperty::Padding => "padding",
        }
    }
}

/// One named entry in a scale
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Step {
    pub id: u32,
    pub display_name: String,
    /// Unitless line height (font scales only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    /// Utility properties (spacing utilities only); empty means margin and padding
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<SpaceProperty>,
    /// Computed minimum size in the scale's unit
    #[serde(default)]
    pub min: Option<f64>,
    /// Computed maximum size in the scale's unit
    #[serde(default)]
    pub max: Option<f64>,
}

impl Step {
    pub fn new(id: u32, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            line_height: None,
            properties: Vec::new(),
            min: None,
            max: None,
        }
    }

    pub fn with_line_height(mut self, line_height: f64) -> Self {
        self.line_height = Some(line_height);
        self
    }

    pub fn with_properties(mut self, properties: Vec<SpaceProperty>) -> Self {
        self.properties = properties;
        self
    }

    /// Properties a utility render should emit, falling back to both
    pub fn effective_properties(&self) -> &[SpaceProperty] {
        if self.properties.is_empty() {
            &[SpaceProperty::Margin, SpaceProperty::Padding]
        } else {
            &self.properties
        }
    }

    /// Both computed bounds, if present
    pub fn sizes(&self) -> Option<(f64, f64)> {
        Some((self.min?, self.max?))
    }
}

/// Global configuration for one scale
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScaleSettings {
    /// Root font size (font) or base space (spacing) at the small viewport, in px
    pub min_root_size: f64,
    /// Root font size (font) or base space (spacing) at the large viewport, in px
    pub max_root_size: f64,
    pub min_viewport: f64,
    pub max_viewport: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    #[serde(default)]
    pub unit_type: UnitType,
    pub base_step_id: u32,
}

impl Default for ScaleSettings {
    fn default() -> Self {
        Self {
            min_root_size: 16.0,
            max_root_size: 20.0,
            min_viewport: 375.0,
            max_viewport: 1620.0,
            min_scale: 1.125,
            max_scale: 1.333,
            unit_type: UnitType::Px,
            base_step_id: 1,
        }
    }
}

/// One flavor's settings and ordered steps
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scale {
    pub flavor: Flavor,
    pub settings: ScaleSettings,
    pub steps: Vec<Step>,
}

impl Scale {
    /// Computes sizes for every step and returns the annotated copy
    pub fn compute(&self) -> crate::Result<Vec<Step>> {
        super::engine::compute_sizes(&self.steps, &self.settings)
    }

    /// Stores freshly computed sizes on the steps
    pub fn recompute(&mut self) -> crate::Result<()> {
        self.steps = self.compute()?;
        Ok(())
    }

    /// Computes sizes and renders them in this scale's flavor
    pub fn render(&self, kind: ScaleKind) -> crate::Result<String> {
        let sized = self.compute()?;
        super::css::render_css(&sized, &self.settings, kind, self.flavor)
    }

    pub fn step(&self, id: u32) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == id)
    }

    pub fn position(&self, id: u32) -> Option<usize> {
        self.steps.iter().position(|s| s.id == id)
    }

    /// Next free step id (one past the highest in use)
    pub fn next_id(&self) -> u32 {
        self.steps.iter().map(|s| s.id).max().map_or(1, |id| id + 1)
    }

    /// Points the base step at the first step when it no longer exists.
    ///
    /// The engine refuses a dangling base step; this is the caller-side
    /// recovery. Returns `true` if the base had to be moved.
    pub fn ensure_base_step(&mut self) -> bool {
        if self.step(self.settings.base_step_id).is_some() {
            return false;
        }
        let Some(first) = self.steps.first() else {
            return false;
        };
        tracing::warn!(
            "Base step {} missing from {} scale, falling back to '{}'",
            self.settings.base_step_id,
            self.flavor,
            first.display_name
        );
        self.settings.base_step_id = first.id;
        true
    }
}

/// A persisted set of scales for one calculator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub kind: ScaleKind,
    pub scales: Vec<Scale>,
    #[serde(default)]
    pub saved_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Profile {
    pub fn scale(&self, flavor: Flavor) -> Option<&Scale> {
        self.scales.iter().find(|s| s.flavor == flavor)
    }

    pub fn scale_mut(&mut self, flavor: Flavor) -> Option<&mut Scale> {
        self.scales.iter_mut().find(|s| s.flavor == flavor)
    }

    /// Total number of steps across all scales
    pub fn step_count(&self) -> usize {
        self.scales.iter().map(|s| s.steps.len()).sum()
    }

    /// Recomputes the informational sizes stored on every scale.
    ///
    /// Scales that can't be computed (e.g. after "clear all") keep their
    /// steps with the stale sizes cleared. Returns how many scales failed.
    pub fn refresh_sizes(&mut self) -> usize {
        let mut failed = 0;
        for scale in &mut self.scales {
            if let Err(e) = scale.recompute() {
                tracing::warn!("Could not compute {} scale: {}", scale.flavor, e);
                for step in &mut scale.steps {
                    step.min = None;
                    step.max = None;
                }
                failed += 1;
            }
        }
        failed
    }
}
