//! Per-incident investigation state

use triage_core::{Decision, IncidentDescriptor, Message};

/// Everything one investigation run accumulates.
///
/// The message history is append-only: steps extend it and read it, nothing
/// removes, reorders, or rewrites an entry. Each run owns its state
/// exclusively; concurrent incidents never share one.
#[derive(Debug)]
pub struct InvestigationState {
    incident: IncidentDescriptor,
    messages: Vec<Message>,
    root_cause: Option<String>,
    decision: Option<Decision>,
}

impl InvestigationState {
    pub fn new(incident: IncidentDescriptor) -> Self {
        Self {
            incident,
            messages: Vec::new(),
            root_cause: None,
            decision: None,
        }
    }

    pub fn incident(&self) -> &IncidentDescriptor {
        &self.incident
    }

    /// Append a batch of messages, preserving their order.
    pub fn append(&mut self, batch: impl IntoIterator<Item = Message>) {
        self.messages.extend(batch);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Set only by the decision step (or the turn guard, ahead of it).
    pub fn root_cause(&self) -> Option<&str> {
        self.root_cause.as_deref()
    }

    pub fn decision(&self) -> Option<Decision> {
        self.decision
    }

    pub(crate) fn set_root_cause(&mut self, root_cause: String) {
        self.root_cause = Some(root_cause);
    }

    pub(crate) fn set_decision(&mut self, decision: Decision) {
        self.decision = Some(decision);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incident() -> IncidentDescriptor {
        IncidentDescriptor {
            event_type: "cpu_spike".into(),
            severity: "medium".into(),
            resource: "pod/worker-7".into(),
            message: "CPU at 98%".into(),
        }
    }

    #[test]
    fn fresh_state_is_empty_and_undecided() {
        let state = InvestigationState::new(incident());
        assert!(state.messages().is_empty());
        assert!(state.last_message().is_none());
        assert!(state.root_cause().is_none());
        assert!(state.decision().is_none());
    }

    #[test]
    fn append_preserves_batch_order() {
        let mut state = InvestigationState::new(incident());
        state.append([Message::system("a"), Message::user("b")]);
        state.append([Message::assistant("c")]);

        let contents: Vec<&str> = state
            .messages()
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        assert_eq!(contents, vec!["a", "b", "c"]);
        assert_eq!(state.last_message().unwrap().content, "c");
    }
}
