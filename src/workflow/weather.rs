//! The weather workflow
//!
//! `fetch-weather` resolves the trigger city and fetches today's outlook;
//! `plan-activities` asks the planning agent for suggestions based on it.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::time::Duration;

use crate::agent::Agent;
use crate::llm::ChatMessage;
use crate::weather::{DailyForecast, WeatherClient};
use crate::workflow::{StepContext, StepOutcome, Workflow, WorkflowError, WorkflowStep};

/// Id of the forecast step
pub const FETCH_WEATHER_STEP: &str = "fetch-weather";

/// Id of the planning step
pub const PLAN_ACTIVITIES_STEP: &str = "plan-activities";

/// Instructions for the agent that turns a forecast into suggestions
pub const PLANNER_INSTRUCTIONS: &str = "You are a local activities and travel expert who excels at weather-based planning. \
Analyze the weather data and provide practical activity recommendations.

For each day in the forecast, structure your response as:
- The date and location
- A one-line weather summary with the temperature range
- Two or three outdoor activities suited to the conditions, with the best timing
- Two indoor alternatives in case conditions change
- Any special considerations such as heat, rain gear, or wind

Keep suggestions specific to the location, and mention precipitation chance whenever it is above 50%.";

/// Build the weather workflow
pub fn weather_workflow(
    weather: Arc<WeatherClient>,
    planner: Arc<Agent>,
    run_timeout: Duration,
) -> Result<Workflow, WorkflowError> {
    Workflow::builder("weather-workflow")
        .description("Fetches the forecast for a city and suggests activities")
        .step(Arc::new(FetchWeatherStep { client: weather }))
        .step(Arc::new(PlanActivitiesStep { agent: planner }))
        .trigger_validator(validate_trigger)
        .run_timeout(run_timeout)
        .build()
}

/// Accepts `{ city }` with a non-empty string city
pub fn validate_trigger(trigger_data: &Value) -> Result<(), String> {
    trigger_city(trigger_data).map(|_| ())
}

fn trigger_city(trigger_data: &Value) -> Result<&str, String> {
    let object = trigger_data
        .as_object()
        .ok_or_else(|| "Expected object".to_string())?;
    object
        .get("city")
        .and_then(Value::as_str)
        .filter(|city| !city.trim().is_empty())
        .ok_or_else(|| "City is required".to_string())
}

/// Fetches the daily outlook for the trigger city
pub struct FetchWeatherStep {
    client: Arc<WeatherClient>,
}

#[async_trait]
impl WorkflowStep for FetchWeatherStep {
    fn id(&self) -> &str {
        FETCH_WEATHER_STEP
    }

    fn description(&self) -> &str {
        "Fetches weather forecast for a given city"
    }

    async fn execute(&self, context: &StepContext) -> Result<StepOutcome, WorkflowError> {
        let city =
            trigger_city(context.trigger_data()).map_err(WorkflowError::InvalidTriggerData)?;

        let forecast = self
            .client
            .daily_forecast(city)
            .await
            .map_err(|e| WorkflowError::StepFailed(e.to_string()))?;

        let output =
            serde_json::to_value(forecast).map_err(|e| WorkflowError::StepFailed(e.to_string()))?;
        Ok(StepOutcome::Success(output))
    }
}

/// Turns the forecast into activity suggestions
pub struct PlanActivitiesStep {
    agent: Arc<Agent>,
}

#[async_trait]
impl WorkflowStep for PlanActivitiesStep {
    fn id(&self) -> &str {
        PLAN_ACTIVITIES_STEP
    }

    fn description(&self) -> &str {
        "Suggests activities based on weather conditions"
    }

    async fn execute(&self, context: &StepContext) -> Result<StepOutcome, WorkflowError> {
        let forecast_value = context
            .step_output(FETCH_WEATHER_STEP)
            .cloned()
            .ok_or_else(|| WorkflowError::MissingStepOutput(FETCH_WEATHER_STEP.to_string()))?;
        let forecast: DailyForecast = serde_json::from_value(forecast_value.clone())
            .map_err(|e| WorkflowError::StepFailed(format!("Invalid forecast data: {}", e)))?;

        let prompt = format!(
            "Based on the following weather forecast for {}, suggest appropriate activities:\n{}",
            forecast.location,
            serde_json::to_string_pretty(&forecast_value)
                .map_err(|e| WorkflowError::StepFailed(e.to_string()))?
        );

        let activities = self
            .agent
            .generate(vec![ChatMessage::user(prompt)])
            .await
            .map_err(|e| WorkflowError::StepFailed(e.to_string()))?;

        Ok(StepOutcome::Success(json!({ "activities": activities })))
    }
}
