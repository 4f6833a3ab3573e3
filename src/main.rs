//! clampgen - fluid clamp() calculator
//!
//! Command-line front end for font and spacing scales. Profiles live in the
//! data directory; every command that edits a profile recomputes its sizes
//! and saves it back.
//!
//! # Usage
//!
//! ```bash
//! clampgen init site --kind font         # Seed a profile with default steps
//! clampgen show site --flavor tag        # Preview computed sizes and CSS
//! clampgen export site --flavor variable # Print CSS for one flavor
//! clampgen export site --all             # Print CSS for every flavor
//! clampgen export site --format json     # Computed steps as JSON
//! clampgen set site --flavor class --min-viewport 320 --max-scale 1.5
//! clampgen step add huge --profile site --line-height 1.05
//! clampgen step move 9 1 --profile site  # Drag step 9 to the top
//! clampgen diff site other --flavor class
//! ```

use clampgen::command::{
    AddStepCommand, ClearStepsCommand, Command, CommandHistory, DeleteStepCommand,
    EditStepCommand, ReorderStepCommand, UpdateSettingsCommand,
};
use clampgen::config::{self, AppConfig};
use clampgen::core::css::diff_css;
use clampgen::core::defaults::default_profile;
use clampgen::core::profiles::{ProfileError, ProfileStore};
use clampgen::core::scale::{Flavor, Profile, Scale, ScaleKind, SpaceProperty, Step, UnitType};
use clampgen::validators;
use clap::{Args, Parser, Subcommand};
use std::fmt::Write;
use std::process::ExitCode;
use std::str::FromStr;

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn parse_flavor(s: &str) -> Result<Flavor, String> {
    Flavor::from_str(s).map_err(|_| format!("unknown flavor '{s}' (class, variable, tag, utility)"))
}

fn parse_kind(s: &str) -> Result<ScaleKind, String> {
    ScaleKind::from_str(s).map_err(|_| format!("unknown kind '{s}' (font, space)"))
}

fn parse_unit(s: &str) -> Result<UnitType, String> {
    UnitType::from_str(s).map_err(|_| format!("unknown unit '{s}' (px, rem)"))
}

fn parse_format(s: &str) -> Result<ExportFormat, String> {
    ExportFormat::from_str(s).map_err(|_| format!("unknown format '{s}' (css, json)"))
}

fn parse_property(s: &str) -> Result<SpaceProperty, String> {
    SpaceProperty::from_str(s).map_err(|_| format!("unknown property '{s}' (margin, padding)"))
}

/// Output of `export`
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
enum ExportFormat {
    #[strum(serialize = "css")]
    Css,
    /// Computed steps per flavor
    #[strum(serialize = "json")]
    Json,
}

#[derive(Parser)]
#[command(name = "clampgen")]
#[command(about = "Fluid clamp() calculator for font and spacing scales", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all available profiles
    List,
    /// Create a profile seeded with the default steps
    Init {
        name: String,
        /// Scale kind (font or space)
        #[arg(short, long, default_value = "font", value_parser = parse_kind)]
        kind: ScaleKind,
        /// Overwrite an existing profile
        #[arg(long)]
        force: bool,
    },
    /// Show computed sizes and CSS for one flavor
    Show {
        /// Profile name (defaults to the active profile)
        name: Option<String>,
        #[arg(short, long, value_parser = parse_flavor)]
        flavor: Option<Flavor>,
    },
    /// Print generated CSS (or computed steps as JSON)
    Export {
        /// Profile name (defaults to the active profile)
        name: Option<String>,
        #[arg(short, long, value_parser = parse_flavor)]
        flavor: Option<Flavor>,
        /// Export every flavor the profile carries
        #[arg(long, conflicts_with = "flavor")]
        all: bool,
        /// Export format (css or json)
        #[arg(long, default_value = "css", value_parser = parse_format)]
        format: ExportFormat,
    },
    /// Show how the CSS of two profiles differs
    Diff {
        old: String,
        new: String,
        #[arg(short, long, value_parser = parse_flavor)]
        flavor: Option<Flavor>,
    },
    /// Change scale settings
    Set(SetArgs),
    /// Edit the steps of a scale
    Step {
        #[command(subcommand)]
        action: StepAction,
    },
    /// Make a profile the active one
    Use { name: String },
    /// Delete a profile
    Delete { name: String },
    /// Rename a profile
    Rename { old: String, new: String },
}

/// Which scale a command targets
#[derive(Args)]
struct Target {
    /// Profile name (defaults to the active profile)
    #[arg(short, long)]
    profile: Option<String>,
    #[arg(short, long, value_parser = parse_flavor)]
    flavor: Option<Flavor>,
}

#[derive(Args)]
struct SetArgs {
    #[command(flatten)]
    target: Target,
    /// Root font size / base space at the small viewport (px)
    #[arg(long)]
    min_root: Option<f64>,
    /// Root font size / base space at the large viewport (px)
    #[arg(long)]
    max_root: Option<f64>,
    #[arg(long)]
    min_viewport: Option<f64>,
    #[arg(long)]
    max_viewport: Option<f64>,
    #[arg(long)]
    min_scale: Option<f64>,
    #[arg(long)]
    max_scale: Option<f64>,
    #[arg(long, value_parser = parse_unit)]
    unit: Option<UnitType>,
    /// Id of the base step
    #[arg(long)]
    base: Option<u32>,
    /// Clamp out-of-range values instead of rejecting them
    #[arg(long)]
    clamp: bool,
}

#[derive(Subcommand)]
enum StepAction {
    /// List steps with their computed sizes
    List {
        #[command(flatten)]
        target: Target,
    },
    /// Append a step
    Add {
        name: String,
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        line_height: Option<f64>,
        /// Utility properties (margin, padding); repeatable
        #[arg(long = "property", value_parser = parse_property)]
        properties: Vec<SpaceProperty>,
    },
    /// Remove a step by id
    Remove {
        id: u32,
        #[command(flatten)]
        target: Target,
    },
    /// Rename a step or change its line height
    Edit {
        id: u32,
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        line_height: Option<f64>,
    },
    /// Move a step to a 1-based position
    Move {
        id: u32,
        position: usize,
        #[command(flatten)]
        target: Target,
    },
    /// Remove every step
    Clear {
        #[command(flatten)]
        target: Target,
    },
}

fn main() -> ExitCode {
    let _ = clampgen::utils::ensure_dirs();
    init_logging(&config::load_config_blocking());
    let cli = Cli::parse();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(handle_cli(cli.command)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(e.as_ref());
            ExitCode::FAILURE
        }
    }
}

fn init_logging(config: &AppConfig) {
    if config.log_to_file
        && let Some(mut log_path) = clampgen::utils::get_state_dir()
    {
        log_path.push("clampgen.log");
        if let Ok(file) = std::fs::File::create(log_path) {
            tracing_subscriber::fmt().with_writer(file).init();
            return;
        }
    }
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
}

fn report_error(e: &(dyn std::error::Error + 'static)) {
    if let Some(err) = e.downcast_ref::<clampgen::Error>() {
        let translation = err.translate();
        eprintln!("Error: {}", translation.user_message);
        for suggestion in translation.suggestions {
            eprintln!("  - {suggestion}");
        }
    } else {
        eprintln!("Error: {e}");
    }
}

/// Picks the flavor to work on: explicit, then the configured default, then
/// the first flavor the profile carries.
fn resolve_flavor(
    profile: &Profile,
    explicit: Option<Flavor>,
    config: &AppConfig,
) -> Result<Flavor, clampgen::Error> {
    if let Some(flavor) = explicit {
        if flavor.supported_by(profile.kind) {
            return Ok(flavor);
        }
        return Err(clampgen::Error::InvalidInput(format!(
            "{flavor} flavor is not available for {} profiles",
            profile.kind
        )));
    }
    Ok(config
        .default_flavor
        .filter(|f| f.supported_by(profile.kind))
        .unwrap_or(profile.kind.flavors()[0]))
}

fn scale_for(profile: &Profile, flavor: Flavor) -> Result<&Scale, clampgen::Error> {
    profile.scale(flavor).ok_or_else(|| {
        clampgen::Error::Configuration(format!("profile has no {flavor} scale"))
    })
}

fn no_step(id: u32) -> clampgen::Error {
    clampgen::Error::validation("id", format!("no step with id {id}"))
}

/// Computed steps, or none for a cleared scale (which has no base to compute from)
fn sized_steps(scale: &Scale) -> Result<Vec<Step>, clampgen::Error> {
    if scale.steps.is_empty() {
        return Ok(Vec::new());
    }
    scale.compute()
}

/// Rendered CSS, empty for a cleared scale
fn preview_css(scale: &Scale, kind: ScaleKind) -> Result<String, clampgen::Error> {
    if scale.steps.is_empty() {
        return Ok(String::new());
    }
    scale.render(kind)
}

fn format_steps(scale: &Scale) -> Result<String, clampgen::Error> {
    let unit = scale.settings.unit_type.as_str();
    let mut out = format!("{:>4}  {:<20} {:>12} {:>12}\n", "id", "name", "min", "max");
    for step in sized_steps(scale)? {
        let marker = if step.id == scale.settings.base_step_id {
            "  (base)"
        } else {
            ""
        };
        let (min, max) = step.sizes().unwrap_or_default();
        let _ = writeln!(
            out,
            "{:>4}  {:<20} {:>12} {:>12}{marker}",
            step.id,
            step.display_name,
            format!("{min}{unit}"),
            format!("{max}{unit}"),
        );
    }
    Ok(out)
}

/// Validates, applies and saves one step edit
async fn apply_edit<F>(store: &ProfileStore, target: Target, build: F) -> CliResult
where
    F: FnOnce(&Scale) -> Result<Box<dyn Command>, clampgen::Error>,
{
    let config = config::load_config().await;
    let name = target.profile.unwrap_or_else(|| config.active_profile.clone());
    let mut profile = store.load(&name).await?;
    let flavor = resolve_flavor(&profile, target.flavor, &config)?;

    let scale = profile.scale_mut(flavor).ok_or_else(|| {
        clampgen::Error::Configuration(format!("profile has no {flavor} scale"))
    })?;
    let command = build(scale)?;

    let mut history = CommandHistory::default();
    history.execute(command, scale);
    scale.ensure_base_step();
    println!("✓ {}", history.undo_description().unwrap_or_default());

    profile.refresh_sizes();
    store.save(&name, &profile).await?;
    Ok(())
}

async fn handle_cli(command: Commands) -> CliResult {
    let store = ProfileStore::open_default()?;

    match command {
        Commands::List => {
            let profiles = store.list().await?;
            let config = config::load_config().await;
            println!("Available profiles (* = active):");
            for p in profiles {
                if p == config.active_profile {
                    println!("  * {p}");
                } else {
                    println!("    {p}");
                }
            }
        }
        Commands::Init { name, kind, force } => {
            if store.exists(&name).await? && !force {
                return Err(ProfileError::AlreadyExists(name).into());
            }
            let mut profile = default_profile(kind);
            profile.refresh_sizes();
            store.save(&name, &profile).await?;
            println!("✓ Created {} profile '{name}'", kind.display_name());
        }
        Commands::Show { name, flavor } => {
            let config = config::load_config().await;
            let name = name.unwrap_or_else(|| config.active_profile.clone());
            let profile = store.load(&name).await?;
            let flavor = resolve_flavor(&profile, flavor, &config)?;
            let scale = scale_for(&profile, flavor)?;
            let s = &scale.settings;

            println!("{} · {} · {name}", profile.kind.display_name(), flavor.display_name());
            println!(
                "root {}px → {}px · viewport {}px → {}px · scale {} → {} · unit {}",
                s.min_root_size,
                s.max_root_size,
                s.min_viewport,
                s.max_viewport,
                s.min_scale,
                s.max_scale,
                s.unit_type
            );
            println!();
            print!("{}", format_steps(scale)?);
            println!();
            print!("{}", preview_css(scale, profile.kind)?);
        }
        Commands::Export {
            name,
            flavor,
            all,
            format,
        } => {
            let config = config::load_config().await;
            let name = name.unwrap_or_else(|| config.active_profile.clone());
            let profile = store.load(&name).await?;
            let flavors = if all {
                profile.kind.flavors().to_vec()
            } else {
                vec![resolve_flavor(&profile, flavor, &config)?]
            };

            match format {
                ExportFormat::Css => {
                    for flavor in flavors {
                        let css = preview_css(scale_for(&profile, flavor)?, profile.kind)?;
                        if all {
                            println!("/* {} */", flavor.display_name());
                        }
                        print!("{css}");
                    }
                }
                ExportFormat::Json => {
                    let mut computed = serde_json::Map::new();
                    for flavor in flavors {
                        let steps = sized_steps(scale_for(&profile, flavor)?)?;
                        computed.insert(flavor.to_string(), serde_json::to_value(steps)?);
                    }
                    println!("{}", serde_json::to_string_pretty(&computed)?);
                }
            }
        }
        Commands::Diff { old, new, flavor } => {
            let config = config::load_config().await;
            let old_profile = store.load(&old).await?;
            let new_profile = store.load(&new).await?;
            if old_profile.kind != new_profile.kind {
                return Err(format!(
                    "Cannot compare a {} profile with a {} profile",
                    old_profile.kind, new_profile.kind
                )
                .into());
            }
            let flavor = resolve_flavor(&old_profile, flavor, &config)?;
            let old_css = preview_css(scale_for(&old_profile, flavor)?, old_profile.kind)?;
            let new_css = preview_css(scale_for(&new_profile, flavor)?, new_profile.kind)?;

            match diff_css(&old_css, &new_css) {
                Some(diff) => print!("{diff}"),
                None => println!("No differences in {}.", flavor.display_name()),
            }
        }
        Commands::Set(args) => {
            apply_edit(&store, args.target, |scale| {
                let mut settings = scale.settings.clone();
                let updates = [
                    (&mut settings.min_root_size, args.min_root),
                    (&mut settings.max_root_size, args.max_root),
                    (&mut settings.min_viewport, args.min_viewport),
                    (&mut settings.max_viewport, args.max_viewport),
                    (&mut settings.min_scale, args.min_scale),
                    (&mut settings.max_scale, args.max_scale),
                ];
                for (field, value) in updates {
                    if let Some(value) = value {
                        *field = value;
                    }
                }
                if let Some(unit) = args.unit {
                    settings.unit_type = unit;
                }
                if let Some(base) = args.base {
                    if scale.step(base).is_none() {
                        return Err(clampgen::Error::validation(
                            "base",
                            format!("no step with id {base}"),
                        ));
                    }
                    settings.base_step_id = base;
                }

                if args.clamp {
                    settings = validators::sanitize_settings(&settings);
                }
                validators::validate_settings(&settings)?;

                Ok(Box::new(UpdateSettingsCommand {
                    old_settings: scale.settings.clone(),
                    new_settings: settings,
                }))
            })
            .await?;
        }
        Commands::Step { action } => handle_step(&store, action).await?,
        Commands::Use { name } => {
            if !store.exists(&name).await? {
                return Err(ProfileError::NotFound(name).into());
            }
            let mut config = config::load_config().await;
            config.active_profile.clone_from(&name);
            config::save_config(&config).await?;
            println!("✓ Active profile: {name}");
        }
        Commands::Delete { name } => {
            store.delete(&name).await?;
            println!("✓ Deleted profile '{name}'");
        }
        Commands::Rename { old, new } => {
            store.rename(&old, &new).await?;
            let mut config = config::load_config().await;
            if config.active_profile == old {
                config.active_profile.clone_from(&new);
                config::save_config(&config).await?;
            }
            println!("✓ Renamed '{old}' to '{new}'");
        }
    }
    Ok(())
}

async fn handle_step(store: &ProfileStore, action: StepAction) -> CliResult {
    match action {
        StepAction::List { target } => {
            let config = config::load_config().await;
            let name = target.profile.unwrap_or_else(|| config.active_profile.clone());
            let profile = store.load(&name).await?;
            let flavor = resolve_flavor(&profile, target.flavor, &config)?;
            print!("{}", format_steps(scale_for(&profile, flavor)?)?);
        }
        StepAction::Add {
            name,
            target,
            line_height,
            properties,
        } => {
            apply_edit(store, target, |scale| {
                let display_name = validators::validate_display_name(&name)?;
                let mut step = Step::new(scale.next_id(), display_name).with_properties(properties);
                step.line_height = line_height;
                validators::validate_new_step(scale, &step)?;
                Ok(Box::new(AddStepCommand { step }))
            })
            .await?;
        }
        StepAction::Remove { id, target } => {
            apply_edit(store, target, |scale| {
                let index = scale
                    .position(id)
                    .ok_or_else(|| no_step(id))?;
                Ok(Box::new(DeleteStepCommand {
                    step: scale.steps[index].clone(),
                    index,
                }))
            })
            .await?;
        }
        StepAction::Edit {
            id,
            target,
            name,
            line_height,
        } => {
            apply_edit(store, target, |scale| {
                let old_step = scale
                    .step(id)
                    .cloned()
                    .ok_or_else(|| no_step(id))?;
                let mut new_step = old_step.clone();
                if let Some(name) = name {
                    new_step.display_name = name.trim().to_string();
                }
                if line_height.is_some() {
                    new_step.line_height = line_height;
                }
                validators::validate_step_edit(scale, &new_step)?;
                Ok(Box::new(EditStepCommand { old_step, new_step }))
            })
            .await?;
        }
        StepAction::Move {
            id,
            position,
            target,
        } => {
            apply_edit(store, target, |scale| {
                let old_index = scale
                    .position(id)
                    .ok_or_else(|| no_step(id))?;
                if position == 0 || position > scale.steps.len() {
                    return Err(clampgen::Error::validation(
                        "position",
                        format!("must be between 1 and {}", scale.steps.len()),
                    ));
                }
                Ok(Box::new(ReorderStepCommand {
                    step_id: id,
                    old_index,
                    new_index: position - 1,
                }))
            })
            .await?;
        }
        StepAction::Clear { target } => {
            apply_edit(store, target, |scale| {
                Ok(Box::new(ClearStepsCommand {
                    steps: scale.steps.clone(),
                }))
            })
            .await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clampgen::core::defaults::default_scale;

    #[test]
    fn test_cleared_scale_previews_empty() {
        let mut scale = default_scale(ScaleKind::Font, Flavor::ClassRule).unwrap();
        scale.steps.clear();
        assert!(scale.compute().is_err());

        let table = format_steps(&scale).unwrap();
        assert_eq!(table.lines().count(), 1);
        assert!(table.contains("name"));
        assert_eq!(preview_css(&scale, ScaleKind::Font).unwrap(), "");
        assert!(sized_steps(&scale).unwrap().is_empty());
    }

    #[test]
    fn test_step_table_marks_base() {
        let scale = default_scale(ScaleKind::Space, Flavor::ClassRule).unwrap();
        let table = format_steps(&scale).unwrap();
        assert_eq!(table.lines().count(), scale.steps.len() + 1);

        let base_lines: Vec<&str> = table.lines().filter(|l| l.ends_with("(base)")).collect();
        assert_eq!(base_lines.len(), 1);
        assert!(base_lines[0].contains("px"));
    }

    #[test]
    fn test_export_format_parse() {
        assert_eq!(parse_format("css").unwrap(), ExportFormat::Css);
        assert_eq!(parse_format("json").unwrap(), ExportFormat::Json);
        assert!(parse_format("yaml").is_err());
    }
}
