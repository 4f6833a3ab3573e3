//! Integration tests for clampgen
//!
//! These tests drive the public library API end to end: seeding profiles,
//! editing scales through the command history, persisting them in a
//! temporary store and rendering CSS.
//!
//! ```bash
//! cargo test --test integration_tests
//! ```

#![allow(clippy::uninlined_format_args)]

use clampgen::command::{
    AddStepCommand, ClearStepsCommand, CommandHistory, DeleteStepCommand, ReorderStepCommand,
    UpdateSettingsCommand,
};
use clampgen::core::css::diff_css;
use clampgen::core::defaults::default_profile;
use clampgen::core::engine::{compute_sizes, generate_clamp};
use clampgen::core::profiles::{ProfileError, ProfileStore};
use clampgen::validators;
use clampgen::{Error, Flavor, Scale, ScaleKind, ScaleSettings, Step, UnitType};

fn temp_store() -> (tempfile::TempDir, ProfileStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = ProfileStore::new(dir.path().join("profiles"));
    (dir, store)
}

fn worked_example() -> Scale {
    Scale {
        flavor: Flavor::ClassRule,
        settings: ScaleSettings {
            base_step_id: 2,
            ..ScaleSettings::default()
        },
        steps: vec![Step::new(1, "sm"), Step::new(2, "md"), Step::new(3, "lg")],
    }
}

#[test]
fn test_worked_example_sizes_and_clamp() {
    let scale = worked_example();
    let sized = compute_sizes(&scale.steps, &scale.settings).unwrap();

    let sizes: Vec<(f64, f64)> = sized.iter().map(|s| s.sizes().unwrap()).collect();
    assert_eq!(sizes, [(18.0, 26.66), (16.0, 20.0), (14.222, 15.004)]);

    assert_eq!(
        generate_clamp(16.0, 20.0, 375.0, 1620.0, UnitType::Px).unwrap(),
        "clamp(16px, 14.7952px + 0.3213vw, 20px)"
    );

    // The input steps are left untouched
    assert!(scale.steps.iter().all(|s| s.sizes().is_none()));
}

#[test]
fn test_rem_profile_renders_rem_units() {
    let mut scale = worked_example();
    scale.settings.unit_type = UnitType::Rem;
    scale.flavor = Flavor::CssVariable;

    let css = scale.render(ScaleKind::Font).unwrap();
    assert!(css.contains("  --md: clamp(1rem, 0.9247rem + 0.0201vw, 1.25rem);"));
    assert!(!css.contains("px"));
}

#[test]
fn test_every_default_flavor_renders() {
    for kind in [ScaleKind::Font, ScaleKind::Space] {
        let profile = default_profile(kind);
        assert_eq!(profile.scales.len(), kind.flavors().len());

        for scale in &profile.scales {
            let css = scale.render(kind).unwrap();
            assert!(!css.is_empty(), "{kind} {}", scale.flavor);
            assert!(!css.contains("NaN") && !css.contains("inf"));
        }
    }
}

#[test]
fn test_missing_base_step_is_configuration_error() {
    let mut scale = worked_example();
    scale.settings.base_step_id = 42;
    assert!(matches!(scale.compute(), Err(Error::Configuration(_))));

    assert!(scale.ensure_base_step());
    let sized = scale.compute().unwrap();
    assert_eq!(sized[0].sizes(), Some((16.0, 20.0)));
}

#[test]
fn test_reorder_moves_sizes_with_position() {
    let mut scale = worked_example();
    let mut history = CommandHistory::default();

    // Drag `lg` to the top: two places above the base
    history.execute(
        Box::new(ReorderStepCommand {
            step_id: 3,
            old_index: 2,
            new_index: 0,
        }),
        &mut scale,
    );
    let sized = scale.compute().unwrap();
    assert_eq!(sized[0].display_name, "lg");
    assert_eq!(sized[0].sizes(), Some((20.25, 35.538)));
    assert_eq!(sized[1].sizes(), Some((18.0, 26.66)));

    history.undo(&mut scale);
    let sized = scale.compute().unwrap();
    assert_eq!(sized[2].display_name, "lg");
    assert_eq!(sized[2].sizes(), Some((14.222, 15.004)));
}

#[test]
fn test_validated_edit_flow() {
    let mut scale = worked_example();
    let mut history = CommandHistory::default();

    let step = Step::new(scale.next_id(), "sm");
    assert!(validators::validate_new_step(&scale, &step).is_err());

    let step = Step::new(scale.next_id(), "xs");
    validators::validate_new_step(&scale, &step).unwrap();
    history.execute(Box::new(AddStepCommand { step }), &mut scale);
    assert_eq!(scale.compute().unwrap().len(), 4);

    let mut settings = scale.settings.clone();
    settings.min_viewport = 9000.0;
    assert!(validators::validate_settings(&settings).is_err());
    let settings = validators::sanitize_settings(&settings);
    validators::validate_settings(&settings).unwrap();
    history.execute(
        Box::new(UpdateSettingsCommand {
            old_settings: scale.settings.clone(),
            new_settings: settings,
        }),
        &mut scale,
    );
    assert!(scale.render(ScaleKind::Font).is_ok());

    assert_eq!(history.undo_count(), 2);
    history.undo(&mut scale);
    history.undo(&mut scale);
    assert_eq!(scale, worked_example());
}

#[test]
fn test_deleting_base_then_healing() {
    let mut scale = worked_example();
    let mut history = CommandHistory::default();

    history.execute(
        Box::new(DeleteStepCommand {
            step: scale.steps[1].clone(),
            index: 1,
        }),
        &mut scale,
    );
    assert!(scale.compute().is_err());
    assert!(scale.ensure_base_step());
    assert_eq!(scale.settings.base_step_id, 1);
    assert!(scale.compute().is_ok());
}

#[tokio::test]
async fn test_profile_store_round_trip() {
    let (_dir, store) = temp_store();
    let mut profile = default_profile(ScaleKind::Space);
    assert_eq!(profile.refresh_sizes(), 0);

    store.save("site", &profile).await.unwrap();
    assert_eq!(store.list().await.unwrap(), ["site"]);

    let loaded = store.load("site").await.unwrap();
    assert!(loaded.saved_at.is_some());
    assert_eq!(loaded.scales, profile.scales);

    for flavor in ScaleKind::Space.flavors() {
        assert_eq!(
            loaded.scale(*flavor).unwrap().render(loaded.kind).unwrap(),
            profile.scale(*flavor).unwrap().render(profile.kind).unwrap()
        );
    }
}

#[tokio::test]
async fn test_cleared_scale_survives_save() {
    let (_dir, store) = temp_store();
    let mut profile = default_profile(ScaleKind::Font);

    let scale = profile.scale_mut(Flavor::ClassRule).unwrap();
    let mut history = CommandHistory::default();
    history.execute(
        Box::new(ClearStepsCommand {
            steps: scale.steps.clone(),
        }),
        scale,
    );
    assert!(!scale.ensure_base_step());
    assert_eq!(profile.refresh_sizes(), 1);

    store.save("cleared", &profile).await.unwrap();
    let loaded = store.load("cleared").await.unwrap();
    let classes = loaded.scale(Flavor::ClassRule).unwrap();
    assert!(classes.steps.is_empty());
    assert!(matches!(classes.compute(), Err(Error::Configuration(_))));
}

#[tokio::test]
async fn test_profile_management() {
    let (_dir, store) = temp_store();
    let profile = default_profile(ScaleKind::Font);

    store.save("default", &profile).await.unwrap();
    store.save("draft", &profile).await.unwrap();

    assert!(matches!(
        store.rename("draft", "default").await,
        Err(ProfileError::AlreadyExists(_))
    ));
    store.rename("draft", "final").await.unwrap();
    assert!(!store.exists("draft").await.unwrap());
    assert!(store.load("final").await.is_ok());

    assert!(store.delete("default").await.is_err());
    store.delete("final").await.unwrap();
    assert!(matches!(
        store.load("final").await,
        Err(ProfileError::NotFound(_))
    ));
    assert_eq!(store.list().await.unwrap(), ["default"]);
}

#[tokio::test]
async fn test_diff_between_saved_profiles() {
    let (_dir, store) = temp_store();
    let base = default_profile(ScaleKind::Font);
    let mut wider = base.clone();
    wider
        .scale_mut(Flavor::TagRule)
        .unwrap()
        .settings
        .max_viewport = 1920.0;

    store.save("base", &base).await.unwrap();
    store.save("wider", &wider).await.unwrap();

    let a = store.load("base").await.unwrap();
    let b = store.load("wider").await.unwrap();

    let class_a = a.scale(Flavor::ClassRule).unwrap().render(a.kind).unwrap();
    let class_b = b.scale(Flavor::ClassRule).unwrap().render(b.kind).unwrap();
    assert!(diff_css(&class_a, &class_b).is_none());

    let tag_a = a.scale(Flavor::TagRule).unwrap().render(a.kind).unwrap();
    let tag_b = b.scale(Flavor::TagRule).unwrap().render(b.kind).unwrap();
    let diff = diff_css(&tag_a, &tag_b).unwrap();
    assert!(diff.lines().any(|l| l.starts_with("- h1 {")));
    assert!(diff.lines().any(|l| l.starts_with("+ h1 {")));
}
