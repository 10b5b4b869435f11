//! Agent and workflow registry
//!
//! Names the agents and workflows the HTTP layer can reach.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::time::Duration;

use crate::agent::Agent;
use crate::config::Config;
use crate::llm::LanguageModel;
use crate::weather::{WeatherClient, WeatherTool};
use crate::workflow::weather::{weather_workflow, PLANNER_INSTRUCTIONS};
use crate::workflow::{Workflow, WorkflowError};

/// Registry id of the weather agent
pub const WEATHER_AGENT_ID: &str = "weatherAgent";

/// Registry id of the weather workflow
pub const WEATHER_WORKFLOW_ID: &str = "weatherWorkflow";

/// Instructions for the weather agent
pub const WEATHER_AGENT_INSTRUCTIONS: &str = "You are a helpful weather assistant that provides accurate weather information.

Your primary function is to help users get weather details for specific locations. When responding:
- Always ask for a location if none is provided
- If the location name isn't in English, please translate it
- If giving a location with multiple parts (e.g. \"New York, NY\"), use the most relevant part (e.g. \"New York\")
- Include relevant details like humidity, wind conditions, and precipitation
- Keep responses concise but informative

Use the get-weather tool to fetch current weather data.";

/// Named agents and workflows
#[derive(Default)]
pub struct Registry {
    agents: BTreeMap<String, Arc<Agent>>,
    workflows: BTreeMap<String, Arc<Workflow>>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent under an id
    pub fn with_agent(mut self, id: impl Into<String>, agent: Agent) -> Self {
        self.agents.insert(id.into(), Arc::new(agent));
        self
    }

    /// Register a workflow under an id
    pub fn with_workflow(mut self, id: impl Into<String>, workflow: Workflow) -> Self {
        self.workflows.insert(id.into(), Arc::new(workflow));
        self
    }

    /// Build the weather agent and workflow on top of a language model
    pub fn weather(
        config: &Config,
        http_client: reqwest::Client,
        model: Arc<dyn LanguageModel>,
    ) -> Result<Self, WorkflowError> {
        let weather_client = Arc::new(WeatherClient::new(http_client, &config.weather));

        let weather_agent = Agent::new("Weather Agent", WEATHER_AGENT_INSTRUCTIONS, model.clone())
            .with_tool(Arc::new(WeatherTool::new(weather_client.clone())));

        let planner = Arc::new(Agent::new(
            "Activity Planner",
            PLANNER_INSTRUCTIONS,
            model,
        ));
        let workflow = weather_workflow(
            weather_client,
            planner,
            Duration::from_secs(config.execution.workflow_timeout_secs),
        )?;

        Ok(Self::new()
            .with_agent(WEATHER_AGENT_ID, weather_agent)
            .with_workflow(WEATHER_WORKFLOW_ID, workflow))
    }

    /// Look up an agent
    pub fn agent(&self, id: &str) -> Option<&Arc<Agent>> {
        self.agents.get(id)
    }

    /// All agents, keyed by id
    pub fn agents(&self) -> &BTreeMap<String, Arc<Agent>> {
        &self.agents
    }

    /// Look up a workflow
    pub fn workflow(&self, id: &str) -> Option<&Arc<Workflow>> {
        self.workflows.get(id)
    }

    /// All workflows, keyed by id
    pub fn workflows(&self) -> &BTreeMap<String, Arc<Workflow>> {
        &self.workflows
    }
}
