//! Command pattern implementation for undo/redo of scale edits
//!
//! Every change to a [`Scale`] is encapsulated as a [`Command`]:
//! - [`AddStepCommand`]: Appends a new step
//! - [`DeleteStepCommand`]: Removes a step
//! - [`EditStepCommand`]: Renames a step or changes its line height/properties
//! - [`ReorderStepCommand`]: Moves a step (a drag-and-drop in the UI)
//! - [`ClearStepsCommand`]: Removes every step
//! - [`UpdateSettingsCommand`]: Replaces the scale settings (including the base step)
//!
//! Reordering changes every computed size, since list position is scale
//! position. Commands don't recompute; callers run [`Scale::compute`] after.
//!
//! # Example
//!
//! ```
//! use clampgen::command::{AddStepCommand, CommandHistory};
//! use clampgen::core::defaults::default_scale;
//! use clampgen::core::scale::{Flavor, ScaleKind, Step};
//!
//! let mut scale = default_scale(ScaleKind::Space, Flavor::UtilityRule).unwrap();
//! let mut history = CommandHistory::default();
//!
//! let step = Step::new(scale.next_id(), "xxxxl");
//! history.execute(Box::new(AddStepCommand { step }), &mut scale);
//! assert_eq!(scale.steps.len(), 9);
//!
//! history.undo(&mut scale);
//! assert_eq!(scale.steps.len(), 8);
//! ```

use crate::core::scale::{Scale, ScaleSettings, Step};
use serde::{Deserialize, Serialize};

/// Command pattern trait for undo/redo functionality
pub trait Command: std::fmt::Debug {
    /// Executes the command, applying changes to the scale
    fn execute(&self, scale: &mut Scale);

    /// Undoes the command, reverting changes to the scale
    fn undo(&self, scale: &mut Scale);

    /// Returns a human-readable description of this command
    fn description(&self) -> String;

    /// Clones the command into a boxed trait object
    fn box_clone(&self) -> Box<dyn Command>;
}

impl Clone for Box<dyn Command> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Appends a new step to the end of the scale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddStepCommand {
    pub step: Step,
}

impl Command for AddStepCommand {
    fn execute(&self, scale: &mut Scale) {
        scale.steps.push(self.step.clone());
    }

    fn undo(&self, scale: &mut Scale) {
        scale.steps.retain(|s| s.id != self.step.id);
    }

    fn description(&self) -> String {
        format!("Add step: {}", self.step.display_name)
    }

    fn box_clone(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

/// Deletes an existing step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteStepCommand {
    pub step: Step,
    pub index: usize,
}

impl Command for DeleteStepCommand {
    fn execute(&self, scale: &mut Scale) {
        scale.steps.retain(|s| s.id != self.step.id);
    }

    fn undo(&self, scale: &mut Scale) {
        // Insert at original index to preserve scale order
        if self.index <= scale.steps.len() {
            scale.steps.insert(self.index, self.step.clone());
        } else {
            scale.steps.push(self.step.clone());
        }
    }

    fn description(&self) -> String {
        format!("Delete step: {}", self.step.display_name)
    }

    fn box_clone(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

/// Edits an existing step in place
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditStepCommand {
    pub old_step: Step,
    pub new_step: Step,
}

impl Command for EditStepCommand {
    fn execute(&self, scale: &mut Scale) {
        if let Some(step) = scale.steps.iter_mut().find(|s| s.id == self.old_step.id) {
            *step = self.new_step.clone();
        }
    }

    fn undo(&self, scale: &mut Scale) {
        if let Some(step) = scale.steps.iter_mut().find(|s| s.id == self.new_step.id) {
            *step = self.old_step.clone();
        }
    }

    fn description(&self) -> String {
        if self.old_step.display_name == self.new_step.display_name {
            format!("Edit step: {}", self.new_step.display_name)
        } else {
            format!(
                "Rename step: {} → {}",
                self.old_step.display_name, self.new_step.display_name
            )
        }
    }

    fn box_clone(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

/// Moves a step from one position to another
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderStepCommand {
    pub step_id: u32,
    pub old_index: usize,
    pub new_index: usize,
}

impl ReorderStepCommand {
    fn move_to(scale: &mut Scale, step_id: u32, index: usize) {
        if let Some(pos) = scale.position(step_id) {
            let step = scale.steps.remove(pos);
            let insert_pos = index.min(scale.steps.len());
            scale.steps.insert(insert_pos, step);
        }
    }
}

impl Command for ReorderStepCommand {
    fn execute(&self, scale: &mut Scale) {
        Self::move_to(scale, self.step_id, self.new_index);
    }

    fn undo(&self, scale: &mut Scale) {
        Self::move_to(scale, self.step_id, self.old_index);
    }

    fn description(&self) -> String {
        format!(
            "Move step (position {} → {})",
            self.old_index + 1,
            self.new_index + 1
        )
    }

    fn box_clone(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

/// Removes every step ("clear all")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearStepsCommand {
    pub steps: Vec<Step>,
}

impl Command for ClearStepsCommand {
    fn execute(&self, scale: &mut Scale) {
        scale.steps.clear();
    }

    fn undo(&self, scale: &mut Scale) {
        scale.steps.clone_from(&self.steps);
    }

    fn description(&self) -> String {
        format!("Clear {} steps", self.steps.len())
    }

    fn box_clone(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

/// Replaces the scale settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSettingsCommand {
    pub old_settings: ScaleSettings,
    pub new_settings: ScaleSettings,
}

impl Command for UpdateSettingsCommand {
    fn execute(&self, scale: &mut Scale) {
        scale.settings = self.new_settings.clone();
    }

    fn undo(&self, scale: &mut Scale) {
        scale.settings = self.old_settings.clone();
    }

    fn description(&self) -> String {
        if self.old_settings.base_step_id == self.new_settings.base_step_id {
            "Update scale settings".to_string()
        } else {
            format!("Set base step to {}", self.new_settings.base_step_id)
        }
    }

    fn box_clone(&self) -> Box<dyn Command> {
        Box::new(self.clone())
    }
}

/// Manages the undo/redo history
#[derive(Debug, Clone)]
pub struct CommandHistory {
    undo_stack: Vec<Box<dyn Command>>,
    redo_stack: Vec<Box<dyn Command>>,
    max_history: usize,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(20)
    }
}

impl CommandHistory {
    /// Creates a new command history with the specified maximum size
    pub fn new(max_history: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_history,
        }
    }

    /// Executes a command and adds it to the undo stack
    pub fn execute(&mut self, command: Box<dyn Command>, scale: &mut Scale) {
        tracing::debug!("{}", command.description());
        command.execute(scale);

        // Clear redo stack when new command is executed
        self.redo_stack.clear();

        self.undo_stack.push(command);

        if self.undo_stack.len() > self.max_history {
            self.undo_stack.remove(0);
        }
    }

    /// Undoes the last command
    pub fn undo(&mut self, scale: &mut Scale) -> Option<String> {
        let command = self.undo_stack.pop()?;
        let description = command.description();
        command.undo(scale);
        self.redo_stack.push(command);
        Some(description)
    }

    /// Redoes the last undone command
    pub fn redo(&mut self, scale: &mut Scale) -> Option<String> {
        let command = self.redo_stack.pop()?;
        let description = command.description();
        command.execute(scale);
        self.undo_stack.push(command);
        Some(description)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Returns the description of the next undo operation
    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.last().map(|cmd| cmd.description())
    }

    /// Returns the number of operations in the undo stack
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }
}
