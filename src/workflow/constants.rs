//! Workflow constants
//!
//! Context keys shared by the run loop and the step tasks.

/// Context key holding the trigger data of a run
pub const TRIGGER_KEY: &str = "trigger";

/// Context key holding the outputs of successful steps (step id -> output)
pub const OUTPUTS_KEY: &str = "outputs";

/// Suffix for step result keys in context
/// Format: "{step_id}{STEP_RESULT_SUFFIX}"
pub const STEP_RESULT_SUFFIX: &str = ".result";

/// Build the context key holding a step's result
pub fn step_result_key(step_id: &str) -> String {
    format!("{}{}", step_id, STEP_RESULT_SUFFIX)
}
