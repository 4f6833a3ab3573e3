//! Shared test fixtures for core module tests
//!
//! This module is only compiled in test mode.

use crate::core::scale::{Flavor, Scale, ScaleSettings, Step, UnitType};

/// Settings of the worked example: 16px → 20px root, 1.125 → 1.333 ratios,
/// 375px → 1620px viewports, base step id 2.
pub fn example_settings() -> ScaleSettings {
    ScaleSettings {
        min_root_size: 16.0,
        max_root_size: 20.0,
        min_viewport: 375.0,
        max_viewport: 1620.0,
        min_scale: 1.125,
        max_scale: 1.333,
        unit_type: UnitType::Px,
        base_step_id: 2,
    }
}

/// `sm`, `md`, `lg` with ids 1..=3 and `md` as the base.
pub fn three_step_scale() -> Scale {
    Scale {
        flavor: Flavor::ClassRule,
        settings: example_settings(),
        steps: vec![Step::new(1, "sm"), Step::new(2, "md"), Step::new(3, "lg")],
    }
}

/// `count` steps named `s1..` with ids `1..=count`.
pub fn numbered_steps(count: u32) -> Vec<Step> {
    (1..=count).map(|id| Step::new(id, format!("s{id}"))).collect()
}
