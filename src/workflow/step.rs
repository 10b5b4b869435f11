//! Workflow steps
//!
//! `WorkflowStep` is what workflow authors implement. `StepTask` adapts a step
//! to graph-flow's `Task`: it reads the trigger data and earlier outputs from
//! the graph-flow context, runs the step, records its `StepResult`, and picks
//! the next action (continue, end on failure, wait on suspension).

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use graph_flow::{Context, NextAction, Result as GraphFlowResult, Task, TaskResult};
use serde_json::Value;

use crate::workflow::constants::{step_result_key, OUTPUTS_KEY, TRIGGER_KEY};
use crate::workflow::types::StepResult;
use crate::workflow::WorkflowError;

/// What a step produced
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Output handed to later steps
    Success(Value),
    /// Stop the run here, attaching a payload
    Suspend(Value),
}

/// Inputs visible to a step
#[derive(Debug, Clone, Default)]
pub struct StepContext {
    trigger_data: Value,
    outputs: BTreeMap<String, Value>,
}

impl StepContext {
    /// Create a context from trigger data and earlier outputs
    pub fn new(trigger_data: Value, outputs: BTreeMap<String, Value>) -> Self {
        Self {
            trigger_data,
            outputs,
        }
    }

    /// Data the run was started with
    pub fn trigger_data(&self) -> &Value {
        &self.trigger_data
    }

    /// Output of an earlier successful step
    pub fn step_output(&self, step_id: &str) -> Option<&Value> {
        self.outputs.get(step_id)
    }
}

/// A unit of work in a workflow
#[async_trait]
pub trait WorkflowStep: Send + Sync {
    /// Step identifier, unique within a workflow
    fn id(&self) -> &str;

    /// What the step does
    fn description(&self) -> &str;

    /// Run the step
    async fn execute(&self, context: &StepContext) -> Result<StepOutcome, WorkflowError>;
}

/// graph-flow task wrapping a workflow step
pub(crate) struct StepTask {
    step: Arc<dyn WorkflowStep>,
    is_last: bool,
}

impl StepTask {
    pub(crate) fn new(step: Arc<dyn WorkflowStep>, is_last: bool) -> Self {
        Self { step, is_last }
    }
}

#[async_trait]
impl Task for StepTask {
    fn id(&self) -> &str {
        self.step.id()
    }

    async fn run(&self, context: Context) -> GraphFlowResult<TaskResult> {
        let step_id = self.step.id();
        let trigger_data: Value = context.get(TRIGGER_KEY).await.unwrap_or(Value::Null);
        let mut outputs: BTreeMap<String, Value> =
            context.get(OUTPUTS_KEY).await.unwrap_or_default();

        tracing::debug!(step_id = %step_id, "Executing workflow step");

        let step_context = StepContext::new(trigger_data, outputs.clone());
        let (result, next_action) = match self.step.execute(&step_context).await {
            Ok(StepOutcome::Success(output)) => {
                outputs.insert(step_id.to_string(), output.clone());
                context.set(OUTPUTS_KEY, outputs).await;
                let next = if self.is_last {
                    NextAction::End
                } else {
                    NextAction::Continue
                };
                (StepResult::Success { output }, next)
            }
            Ok(StepOutcome::Suspend(payload)) => {
                tracing::debug!(step_id = %step_id, "Workflow step suspended");
                (
                    StepResult::Suspended {
                        suspend_payload: payload,
                    },
                    NextAction::WaitForInput,
                )
            }
            Err(e) => {
                tracing::warn!(step_id = %step_id, error = %e, "Workflow step failed");
                (
                    StepResult::Failed {
                        error: e.to_string(),
                    },
                    NextAction::End,
                )
            }
        };

        context.set(step_result_key(step_id), result).await;

        Ok(TaskResult::new(None, next_action))
    }
}
