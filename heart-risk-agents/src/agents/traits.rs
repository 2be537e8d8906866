//! Agent Traits
//!
//! Common traits implemented by agents in this workspace.

use async_trait::async_trait;
use uuid::Uuid;

use crate::contracts::{AgentIdentity, DecisionEvent};

/// Trait for all agents.
///
/// Every agent validates its input, executes deterministically for a given
/// input and model, and produces exactly ONE DecisionEvent per invocation.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Input type for this agent
    type Input: Clone + Send + Sync;

    /// Output type for this agent
    type Output: Clone + Send + Sync;

    /// Error type for this agent
    type Error: std::error::Error + Send + Sync;

    /// Get the agent's identity.
    fn identity(&self) -> &AgentIdentity;

    /// Get the agent's version.
    fn version(&self) -> &str {
        &self.identity().version
    }

    /// Get the agent's ID.
    fn agent_id(&self) -> &str {
        &self.identity().id
    }

    /// Validate input before execution.
    fn validate_input(&self, input: &Self::Input) -> Result<(), Self::Error>;

    /// Execute the agent's core logic.
    async fn execute(&self, input: Self::Input) -> Result<Self::Output, Self::Error>;

    /// Build a DecisionEvent from the execution output.
    fn build_decision_event(
        &self,
        input: &Self::Input,
        output: &Self::Output,
        execution_id: Uuid,
    ) -> Result<DecisionEvent, Self::Error>;

    /// Full invocation cycle: validate, execute, build event.
    async fn invoke(&self, input: Self::Input) -> Result<(Self::Output, DecisionEvent), Self::Error> {
        self.validate_input(&input)?;

        let output = self.execute(input.clone()).await?;

        let execution_id = Uuid::new_v4();
        let event = self.build_decision_event(&input, &output, execution_id)?;

        Ok((output, event))
    }
}
