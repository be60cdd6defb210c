//! The investigation execution graph
//!
//! Flow: Investigate -> (Tools -> Investigate)* -> Decide -> done. Routing
//! after each reasoning turn looks only at the structured tool-call field of
//! the new assistant message, never at its text.

use crate::decide;
use crate::state::InvestigationState;
use std::sync::Arc;
use tracing::{debug, info, warn};
use triage_core::{Error, IncidentDescriptor, Message, Result, ToolDefinition};
use triage_llm::ReasoningPort;
use triage_tools::ToolRegistry;

/// Operating protocol for the investigator, sent as the system message of
/// every run.
const INVESTIGATOR_PROTOCOL: &str = "\
You are a senior SRE agent investigating Kubernetes incidents.

Your protocol:
1. Review the incident details.
2. Plan what you need to check (for example: logs to understand a crash).
3. Call the appropriate diagnostic tool.
4. Read the tool output carefully.
5. Determine the root cause from the output. 'Connection refused' points at \
a dependency; 'OOMKilled' points at the memory limit.
6. Once confident, reply with a concise explanation of the root cause and no \
further tool calls.

Do not stop after calling a tool. Always provide the final analysis based on \
the tool results.";

/// Bounds for one graph execution.
#[derive(Clone, Debug)]
pub struct GraphConfig {
    /// Maximum reasoning turns before the run is forced to a decision.
    pub max_turns: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self { max_turns: 8 }
    }
}

impl GraphConfig {
    /// Defaults with TRIAGE_MAX_TURNS applied when set and parseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let max_turns = std::env::var("TRIAGE_MAX_TURNS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_turns);
        Self { max_turns }
    }
}

/// Where the graph goes after a reasoning turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Tools,
    Decide,
}

/// Pure routing predicate over the assistant turn just produced. A turn
/// carrying both text and tool calls still routes to Tools; only an empty
/// (or absent) tool-call list converges.
pub fn route_after_investigate(reply: &Message) -> Route {
    if reply.has_tool_calls() {
        Route::Tools
    } else {
        Route::Decide
    }
}

/// Execution steps. `Done` is reachable only through `Decide`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Investigate,
    Tools,
    Decide,
    Done,
}

/// The investigation state machine.
///
/// Holds no per-run data: `run` threads a fresh `InvestigationState` through
/// the steps, so one graph serves any number of concurrent incidents.
pub struct InvestigationGraph {
    port: Arc<dyn ReasoningPort>,
    tools: Arc<ToolRegistry>,
    config: GraphConfig,
}

impl InvestigationGraph {
    pub fn new(
        port: Arc<dyn ReasoningPort>,
        tools: Arc<ToolRegistry>,
        config: GraphConfig,
    ) -> Self {
        Self { port, tools, config }
    }

    pub fn tools(&self) -> &Arc<ToolRegistry> {
        &self.tools
    }

    /// Run one incident to a terminal decision.
    pub async fn run(&self, incident: IncidentDescriptor) -> Result<InvestigationState> {
        info!(
            event_type = %incident.event_type,
            severity = %incident.severity,
            resource = %incident.resource,
            "investigation started"
        );

        let mut state = InvestigationState::new(incident);
        let mut step = Step::Investigate;
        let mut turns = 0usize;

        while step != Step::Done {
            step = match step {
                Step::Investigate => {
                    turns += 1;
                    match self.investigate(&mut state).await? {
                        Route::Tools if turns >= self.config.max_turns => {
                            warn!(turns, "turn budget exhausted, forcing a decision");
                            state.set_root_cause(decide::INCONCLUSIVE_ROOT_CAUSE.to_string());
                            Step::Decide
                        }
                        Route::Tools => Step::Tools,
                        Route::Decide => Step::Decide,
                    }
                }
                Step::Tools => {
                    self.run_tools(&mut state).await;
                    Step::Investigate
                }
                Step::Decide => {
                    decide::run(self.port.as_ref(), &mut state).await?;
                    Step::Done
                }
                Step::Done => Step::Done,
            };
        }

        info!(
            decision = state.decision().map(|d| d.as_str()).unwrap_or("none"),
            turns,
            messages = state.messages().len(),
            "investigation complete"
        );
        Ok(state)
    }

    /// One reasoning turn. The first turn materializes the system protocol
    /// and the incident briefing into the history before calling the
    /// backend; later turns replay the accumulated history as-is.
    async fn investigate(&self, state: &mut InvestigationState) -> Result<Route> {
        if state.messages().is_empty() {
            state.append([
                Message::system(INVESTIGATOR_PROTOCOL),
                Message::user(incident_briefing(state.incident())),
            ]);
        }

        let tools = self.tools.describe();
        let reply = self.converse(state.messages(), &tools).await?;

        debug!(
            tool_calls = reply.tool_calls.as_ref().map_or(0, |c| c.len()),
            "investigator turn complete"
        );

        let route = route_after_investigate(&reply);
        state.append([reply]);
        Ok(route)
    }

    async fn converse(&self, history: &[Message], tools: &[ToolDefinition]) -> Result<Message> {
        self.port
            .converse(history, tools)
            .await
            .map_err(|e| Error::reasoning(self.port.name(), e.to_string()))
    }

    /// Resolve every tool call from the latest assistant turn, sequentially
    /// and in request order, and append one result message per call.
    /// Failures come back as result text for the investigator to read.
    async fn run_tools(&self, state: &mut InvestigationState) {
        let calls = state
            .last_message()
            .and_then(|m| m.tool_calls.clone())
            .unwrap_or_default();

        let mut results = Vec::with_capacity(calls.len());
        for call in &calls {
            info!(tool = %call.name, "invoking diagnostic tool");
            let output = self.tools.invoke(&call.name, call.arguments.clone()).await;
            if output.is_error() {
                warn!(tool = %call.name, "tool reported an error");
            }
            results.push(Message::tool_result(call.id.clone(), output.to_content_string()));
        }
        state.append(results);
    }
}

fn incident_briefing(incident: &IncidentDescriptor) -> String {
    format!(
        "NEW INCIDENT DETECTED:\n\
         - Type: {}\n\
         - Severity: {}\n\
         - Resource: {}\n\
         - Message: {}\n\n\
         Please investigate.",
        incident.event_type, incident.severity, incident.resource, incident.message
    )
}
