//! Forwarding committed points to the case action

use crate::error::{ClickHistError, Result};
use crate::hist::PointId;

/// Context handed to the case action along with the flat index
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DispatchContext {
    /// Free-form description forwarded verbatim from the config
    pub metadata: String,
    /// Percentile rank of the point's x value among all x samples
    pub x_percentile: f64,
    /// Percentile rank of the point's y value among all y samples
    pub y_percentile: f64,
    /// Formatted x/y values for display
    pub values: String,
}

/// A pending dispatch produced by a commit click
///
/// Consumed by [`ActionDispatcher::dispatch`], so one commit can only ever
/// reach the action once.
#[derive(Debug, PartialEq)]
pub struct DispatchInstruction {
    pub point_id: Option<PointId>,
    pub flat_index: usize,
    pub context: DispatchContext,
}

/// Something that turns a committed sample into artifacts
pub trait CaseAction {
    /// Handle one committed sample
    fn perform(&mut self, flat_index: usize, context: &DispatchContext) -> Result<()>;

    /// Short hint shown after a preview, telling the user what a second click does
    fn hint(&self) -> &str {
        "commit point..."
    }
}

/// Holds the registered case action and forwards commits to it
#[derive(Default)]
pub struct ActionDispatcher {
    action: Option<Box<dyn CaseAction>>,
    dispatched: u64,
}

impl ActionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_action(action: Box<dyn CaseAction>) -> Self {
        Self {
            action: Some(action),
            dispatched: 0,
        }
    }

    /// Register the action, replacing and returning any previous one
    pub fn register(&mut self, action: Box<dyn CaseAction>) -> Option<Box<dyn CaseAction>> {
        if self.action.is_some() {
            log::warn!("replacing the registered case action");
        }
        self.action.replace(action)
    }

    pub fn is_registered(&self) -> bool {
        self.action.is_some()
    }

    pub fn hint(&self) -> &str {
        self.action.as_deref().map(CaseAction::hint).unwrap_or("")
    }

    /// Number of instructions forwarded so far
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    /// Forward one committed instruction to the action
    pub fn dispatch(&mut self, instruction: DispatchInstruction) -> Result<()> {
        profiling::scope!("dispatch");
        let action = self
            .action
            .as_deref_mut()
            .ok_or(ClickHistError::NoActionRegistered)?;
        self.dispatched += 1;
        log::info!(
            "dispatching flat index {} (point {:?})",
            instruction.flat_index,
            instruction.point_id
        );
        action.perform(instruction.flat_index, &instruction.context)
    }
}
