//! Terminal decision step
//!
//! Extracts the root-cause narrative from the history, asks the backend for
//! a single action label, and parses it into the bounded vocabulary.

use crate::state::InvestigationState;
use tracing::{info, warn};
use triage_core::{Decision, Error, IncidentDescriptor, Message, Result};
use triage_llm::ReasoningPort;

/// Root cause recorded when the turn guard forces a decision.
pub const INCONCLUSIVE_ROOT_CAUSE: &str =
    "Inconclusive: investigation hit the turn limit without a final analysis";

const UNKNOWN_ROOT_CAUSE: &str = "Unknown";

/// Classify the investigation and populate the state's derived fields.
pub(crate) async fn run(port: &dyn ReasoningPort, state: &mut InvestigationState) -> Result<()> {
    let root_cause = match state.root_cause() {
        Some(existing) => existing.to_string(),
        None => extract_root_cause(state.messages()),
    };

    let prompt = decision_prompt(state.incident(), &root_cause);
    let raw = port
        .complete(&prompt)
        .await
        .map_err(|e| Error::reasoning(port.name(), e.to_string()))?;

    let decision = classify(&raw);
    info!(%decision, "incident classified");

    state.set_root_cause(root_cause);
    state.set_decision(decision);
    Ok(())
}

/// The conclusion normally sits in the final assistant message, but the scan
/// walks backward to the first non-empty text in case that turn came back
/// blank.
pub(crate) fn extract_root_cause(messages: &[Message]) -> String {
    messages
        .iter()
        .rev()
        .find(|m| !m.content.is_empty())
        .map(|m| m.content.clone())
        .unwrap_or_else(|| UNKNOWN_ROOT_CAUSE.to_string())
}

fn decision_prompt(incident: &IncidentDescriptor, root_cause: &str) -> String {
    format!(
        "You are an SRE decision system.\n\
         Based on the investigation, choose the best action.\n\n\
         Incident:\n\
         - Type: {}\n\
         - Severity: {}\n\
         - Root Cause: {}\n\n\
         Options:\n\
         - auto_mitigate (only if likely safe and the root cause is clear)\n\
         - require_human_approval (if dangerous or uncertain)\n\n\
         Answer with ONLY the option name.",
        incident.event_type, incident.severity, root_cause
    )
}

/// Normalize the classifier output and parse it into the bounded vocabulary.
/// Anything unrecognized requires human approval.
pub(crate) fn classify(raw: &str) -> Decision {
    let normalized = raw.trim().to_lowercase();
    match Decision::parse(&normalized) {
        Some(decision) => decision,
        None => {
            warn!(label = %normalized, "unrecognized decision label, requiring human approval");
            Decision::RequireHumanApproval
        }
    }
}
