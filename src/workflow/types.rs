//! Workflow result types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Recorded result of a single step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum StepResult {
    /// The step finished and produced an output
    Success {
        /// Step output
        output: Value,
    },
    /// The step failed; the run stopped here
    Failed {
        /// Error message
        error: String,
    },
    /// The step suspended the run
    Suspended {
        /// Data the step attached to the suspension
        #[serde(rename = "suspendPayload")]
        suspend_payload: Value,
    },
}

impl StepResult {
    /// Status reported for an active path ending at this step
    pub fn path_status(&self) -> PathStatus {
        match self {
            StepResult::Success { .. } => PathStatus::Completed,
            StepResult::Failed { .. } => PathStatus::Failed,
            StepResult::Suspended { .. } => PathStatus::Suspended,
        }
    }
}

/// Status of an active path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathStatus {
    /// The run finished at this step
    Completed,
    /// The run is waiting at this step
    Suspended,
    /// The run stopped at this step with an error
    Failed,
}

/// Where a run ended up
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivePath {
    /// Step the path ends at
    pub step_id: String,
    /// Status at that step
    pub status: PathStatus,
    /// Payload of a suspended step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspend_payload: Option<Value>,
    /// Steps traversed, ending with `step_id`
    pub step_path: Vec<String>,
}

/// Outcome of a workflow run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRunResult {
    /// Run identifier
    pub run_id: String,
    /// Results keyed by step id
    pub results: BTreeMap<String, StepResult>,
    /// Where the run stopped: the last step reached, with its completed, failed or suspended status
    pub active_paths: Vec<ActivePath>,
    /// Completion time, milliseconds since the Unix epoch
    pub timestamp: i64,
}

/// Step description served by the framework API
#[derive(Debug, Clone, Serialize)]
pub struct StepInfo {
    /// Step identifier
    pub id: String,
    /// What the step does
    pub description: String,
}

/// Workflow description served by the framework API
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowInfo {
    /// Display name
    pub name: String,
    /// What the workflow does
    pub description: String,
    /// Steps in execution order
    pub steps: Vec<StepInfo>,
}
