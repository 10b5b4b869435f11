//! Workflows
//!
//! A workflow is an ordered list of steps executed with graph-flow. Each run
//! gets its own in-memory session; results are read back from the session
//! context once the runner stops (completed, failed, or suspended).

pub mod constants;
pub mod step;
pub mod types;
pub mod weather;

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use graph_flow::{
    ExecutionStatus, FlowRunner, Graph, GraphBuilder, InMemorySessionStorage, Session,
    SessionStorage, Task,
};
use serde_json::Value;
use thiserror::Error;
use tokio::time::{timeout, Duration};
use uuid::Uuid;

use constants::{step_result_key, TRIGGER_KEY};
pub use step::{StepContext, StepOutcome, WorkflowStep};
use step::StepTask;
pub use types::{ActivePath, PathStatus, StepInfo, StepResult, WorkflowInfo, WorkflowRunResult};

/// Checks trigger data before a run starts, returning the issue message
pub type TriggerValidator = fn(&Value) -> Result<(), String>;

/// Default timeout for a whole run
pub const DEFAULT_RUN_TIMEOUT: Duration = Duration::from_secs(300);

/// Errors raised while defining or running workflows
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// A workflow needs at least one step
    #[error("Workflow '{0}' has no steps")]
    NoSteps(String),

    /// Two steps share an id
    #[error("Duplicate step id: {0}")]
    DuplicateStep(String),

    /// Trigger data did not have the expected shape
    #[error("Invalid trigger data: {0}")]
    InvalidTriggerData(String),

    /// A step needed the output of a step that did not succeed
    #[error("Missing output of step '{0}'")]
    MissingStepOutput(String),

    /// A step failed while doing its work
    #[error("{0}")]
    StepFailed(String),

    /// The run could not be driven to an end
    #[error("Workflow execution failed: {0}")]
    Execution(String),

    /// The run took too long
    #[error("Workflow run timed out after {0:?}")]
    Timeout(Duration),
}

/// A named sequence of steps
pub struct Workflow {
    name: String,
    description: String,
    steps: Vec<Arc<dyn WorkflowStep>>,
    first_step_id: String,
    graph: Arc<Graph>,
    trigger_validator: Option<TriggerValidator>,
    run_timeout: Duration,
}

impl Workflow {
    /// Start defining a workflow
    pub fn builder(name: impl Into<String>) -> WorkflowBuilder {
        WorkflowBuilder {
            name: name.into(),
            description: String::new(),
            steps: Vec::new(),
            trigger_validator: None,
            run_timeout: DEFAULT_RUN_TIMEOUT,
        }
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Description for the framework API
    pub fn info(&self) -> WorkflowInfo {
        WorkflowInfo {
            name: self.name.clone(),
            description: self.description.clone(),
            steps: self
                .steps
                .iter()
                .map(|step| StepInfo {
                    id: step.id().to_string(),
                    description: step.description().to_string(),
                })
                .collect(),
        }
    }

    /// Create a run with a fresh run id
    pub fn create_run(self: &Arc<Self>) -> WorkflowRun {
        WorkflowRun {
            run_id: Uuid::new_v4().to_string(),
            workflow: Arc::clone(self),
        }
    }
}

/// Builder for [`Workflow`]
pub struct WorkflowBuilder {
    name: String,
    description: String,
    steps: Vec<Arc<dyn WorkflowStep>>,
    trigger_validator: Option<TriggerValidator>,
    run_timeout: Duration,
}

impl WorkflowBuilder {
    /// Describe the workflow
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a step
    pub fn step(mut self, step: Arc<dyn WorkflowStep>) -> Self {
        self.steps.push(step);
        self
    }

    /// Reject trigger data before any step runs
    pub fn trigger_validator(mut self, validator: TriggerValidator) -> Self {
        self.trigger_validator = Some(validator);
        self
    }

    /// Bound the duration of a run
    pub fn run_timeout(mut self, run_timeout: Duration) -> Self {
        self.run_timeout = run_timeout;
        self
    }

    /// Validate the steps and build the execution graph
    pub fn build(self) -> Result<Workflow, WorkflowError> {
        let Some(first_step_id) = self.steps.first().map(|step| step.id().to_string()) else {
            return Err(WorkflowError::NoSteps(self.name));
        };

        let mut seen = HashSet::new();
        for step in &self.steps {
            if !seen.insert(step.id().to_string()) {
                return Err(WorkflowError::DuplicateStep(step.id().to_string()));
            }
        }

        let mut builder = GraphBuilder::new(&self.name);
        let last_index = self.steps.len() - 1;
        for (index, step) in self.steps.iter().enumerate() {
            let task: Arc<dyn Task> = Arc::new(StepTask::new(step.clone(), index == last_index));
            builder = builder.add_task(task);
        }
        for pair in self.steps.windows(2) {
            builder = builder.add_edge(pair[0].id(), pair[1].id());
        }

        Ok(Workflow {
            name: self.name,
            description: self.description,
            steps: self.steps,
            first_step_id,
            graph: Arc::new(builder.build()),
            trigger_validator: self.trigger_validator,
            run_timeout: self.run_timeout,
        })
    }
}

/// A single execution of a workflow
pub struct WorkflowRun {
    run_id: String,
    workflow: Arc<Workflow>,
}

impl WorkflowRun {
    /// Run identifier
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Execute the workflow with the given trigger data
    ///
    /// Step failures and suspensions are part of the returned result; errors
    /// are reserved for runs that could not be driven at all.
    ///
    /// # Errors
    /// * `WorkflowError::InvalidTriggerData` if the workflow's validator rejects the trigger
    /// * `WorkflowError::Timeout` if the run exceeds the workflow's timeout
    /// * `WorkflowError::Execution` if graph-flow reports an error
    pub async fn start(&self, trigger_data: Value) -> Result<WorkflowRunResult, WorkflowError> {
        if let Some(validate) = self.workflow.trigger_validator {
            validate(&trigger_data).map_err(WorkflowError::InvalidTriggerData)?;
        }

        let run_timeout = self.workflow.run_timeout;
        timeout(run_timeout, self.start_inner(trigger_data))
            .await
            .map_err(|_| WorkflowError::Timeout(run_timeout))?
    }

    async fn start_inner(&self, trigger_data: Value) -> Result<WorkflowRunResult, WorkflowError> {
        let workflow = &self.workflow;
        let session_storage: Arc<dyn SessionStorage> = Arc::new(InMemorySessionStorage::new());
        let runner = FlowRunner::new(workflow.graph.clone(), session_storage.clone());

        let session = Session::new_from_task(self.run_id.clone(), &workflow.first_step_id);
        session.context.set(TRIGGER_KEY, trigger_data).await;
        session_storage
            .save(session)
            .await
            .map_err(|e| WorkflowError::Execution(format!("Failed to save session: {}", e)))?;

        tracing::debug!(
            run_id = %self.run_id,
            workflow = %workflow.name,
            total_steps = workflow.steps.len(),
            "Starting workflow run"
        );

        loop {
            let execution_result = runner
                .run(&self.run_id)
                .await
                .map_err(|e| WorkflowError::Execution(e.to_string()))?;

            match execution_result.status {
                ExecutionStatus::Completed => break,
                ExecutionStatus::Paused {
                    next_task_id: _,
                    reason: _,
                } => continue,
                ExecutionStatus::WaitingForInput => break,
                ExecutionStatus::Error(err) => {
                    tracing::error!(run_id = %self.run_id, error = %err, "Workflow run failed");
                    return Err(WorkflowError::Execution(err.to_string()));
                }
            }
        }

        let final_session = session_storage
            .get(&self.run_id)
            .await
            .map_err(|e| WorkflowError::Execution(format!("Failed to get final session: {}", e)))?
            .ok_or_else(|| {
                WorkflowError::Execution(format!(
                    "Session '{}' not found after execution",
                    self.run_id
                ))
            })?;

        let mut results = BTreeMap::new();
        let mut step_path = Vec::new();
        let mut last_result: Option<StepResult> = None;
        for step in &workflow.steps {
            let result: Option<StepResult> =
                final_session.context.get(&step_result_key(step.id())).await;
            if let Some(result) = result {
                step_path.push(step.id().to_string());
                results.insert(step.id().to_string(), result.clone());
                last_result = Some(result);
            }
        }

        let active_paths = match (step_path.last(), last_result) {
            (Some(step_id), Some(result)) => vec![ActivePath {
                step_id: step_id.clone(),
                status: result.path_status(),
                suspend_payload: match result {
                    StepResult::Suspended { suspend_payload } => Some(suspend_payload),
                    _ => None,
                },
                step_path: step_path.clone(),
            }],
            _ => Vec::new(),
        };

        tracing::debug!(
            run_id = %self.run_id,
            steps_run = step_path.len(),
            "Workflow run finished"
        );

        Ok(WorkflowRunResult {
            run_id: self.run_id.clone(),
            results,
            active_paths,
            timestamp: chrono::Utc::now().timestamp_millis(),
        })
    }
}
