//! Run state and transitions.
//!
//! A Run represents a single execution of the pipeline. It only lives
//! for the duration of the process; nothing is persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::stage::StageKind;

/// A pipeline execution run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    /// Unique identifier for this run
    pub id: Uuid,

    /// Current state of the run
    pub state: RunState,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run finished (if applicable)
    pub completed_at: Option<DateTime<Utc>>,

    /// Stages that finished successfully, in order
    pub completed_stages: Vec<StageKind>,
}

impl Default for Run {
    fn default() -> Self {
        Self::new(Uuid::new_v4())
    }
}

impl Run {
    /// Create a pending run
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            state: RunState::Pending,
            started_at: Utc::now(),
            completed_at: None,
            completed_stages: Vec::new(),
        }
    }

    /// Enter a stage. Stages must be entered in order, one after the other.
    pub fn begin_stage(&mut self, stage: StageKind) -> Result<(), InvalidTransition> {
        let expected = self.completed_stages.len();
        let prior = match expected {
            0 => RunState::Pending,
            n => StageKind::ALL[n - 1].running_state(),
        };

        if stage.index() != expected || self.state != prior {
            return Err(InvalidTransition {
                from: self.state.clone(),
                to: stage.running_state(),
            });
        }

        self.state = stage.running_state();
        Ok(())
    }

    /// Mark the running stage as finished
    pub fn complete_stage(&mut self, stage: StageKind) -> Result<(), InvalidTransition> {
        if self.state != stage.running_state() || self.completed_stages.len() != stage.index() {
            return Err(InvalidTransition {
                from: self.state.clone(),
                to: stage.running_state(),
            });
        }
        self.completed_stages.push(stage);
        Ok(())
    }

    /// Finish the run successfully once every stage has completed
    pub fn succeed(&mut self) -> Result<(), InvalidTransition> {
        if self.completed_stages.len() != StageKind::ALL.len() || self.state.is_terminal() {
            return Err(InvalidTransition {
                from: self.state.clone(),
                to: RunState::Succeeded,
            });
        }
        self.state = RunState::Succeeded;
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    /// Fail the run from whatever intermediate state it is in
    pub fn fail(&mut self, stage: StageKind, command: String, error: String) {
        if self.state.is_terminal() {
            return;
        }
        self.state = RunState::Failed {
            stage,
            command,
            error,
        };
        self.completed_at = Some(Utc::now());
    }

    /// Check if the run has reached a terminal state
    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    /// Check if a specific stage is completed
    pub fn is_stage_completed(&self, stage: StageKind) -> bool {
        self.completed_stages.contains(&stage)
    }

    /// Process exit code: 0 only for a fully successful run
    pub fn exit_code(&self) -> i32 {
        match self.state {
            RunState::Succeeded => 0,
            _ => 1,
        }
    }

    /// Wall-clock duration, if the run has finished
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.completed_at.map(|end| end - self.started_at)
    }
}

/// State of a pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum RunState {
    /// Not started yet
    Pending,

    SettingUpEnv,
    Testing,
    Building,
    Pushing,
    Deploying,

    /// Every stage completed
    Succeeded,

    /// Aborted on the first failing command
    Failed {
        stage: StageKind,
        /// Command line that failed
        command: String,
        /// Captured standard error of that command
        error: String,
    },
}

impl RunState {
    /// `Succeeded` and `Failed` allow no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed { .. })
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::Pending
    }
}

/// Attempted a transition the state machine does not allow
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid run transition from {from:?} to {to:?}")]
pub struct InvalidTransition {
    pub from: RunState,
    pub to: RunState,
}
