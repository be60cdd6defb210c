//! Conversation types driving an investigation

use serde::{Deserialize, Serialize};

/// Message role
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A single turn in an investigation conversation.
///
/// Assistant turns may carry structured tool calls; tool turns carry the id
/// of the call they answer. A message is never mutated once appended to a
/// history.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn assistant_with_tools(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tool_calls: Some(tool_calls),
            tool_call_id: None,
        }
    }

    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    /// Whether this turn requests any tool invocations. Looks only at the
    /// structured tool-call field, never at the text content.
    pub fn has_tool_calls(&self) -> bool {
        self.tool_calls.as_ref().is_some_and(|calls| !calls.is_empty())
    }
}

/// A tool call requested by an assistant turn
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

/// Tool definition declared to the reasoning backend
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// Bounded action vocabulary for a completed investigation.
///
/// Classifier output outside this vocabulary is not representable; callers
/// coerce it to `RequireHumanApproval` before it reaches automation.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    AutoMitigate,
    RequireHumanApproval,
}

impl Decision {
    /// Parse an exact, already-normalized label.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "auto_mitigate" => Some(Decision::AutoMitigate),
            "require_human_approval" => Some(Decision::RequireHumanApproval),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::AutoMitigate => "auto_mitigate",
            Decision::RequireHumanApproval => "require_human_approval",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_tool_calls_requires_a_nonempty_list() {
        assert!(!Message::assistant("all clear").has_tool_calls());
        assert!(!Message::assistant_with_tools("hmm", vec![]).has_tool_calls());

        let call = ToolCall {
            id: "call-1".into(),
            name: "k8s_list_pods".into(),
            arguments: serde_json::json!({}),
        };
        assert!(Message::assistant_with_tools("", vec![call]).has_tool_calls());
    }

    #[test]
    fn tool_result_carries_the_call_id() {
        let msg = Message::tool_result("call-7", "Phase: Running");
        assert_eq!(msg.role, Role::Tool);
        assert_eq!(msg.tool_call_id.as_deref(), Some("call-7"));
        assert_eq!(msg.content, "Phase: Running");
    }

    #[test]
    fn decision_parses_exact_labels_only() {
        assert_eq!(Decision::parse("auto_mitigate"), Some(Decision::AutoMitigate));
        assert_eq!(
            Decision::parse("require_human_approval"),
            Some(Decision::RequireHumanApproval)
        );
        assert_eq!(Decision::parse("Auto_Mitigate"), None);
        assert_eq!(Decision::parse("escalate"), None);
    }

    #[test]
    fn decision_serializes_as_snake_case() {
        let json = serde_json::to_string(&Decision::RequireHumanApproval).unwrap();
        assert_eq!(json, "\"require_human_approval\"");
        assert_eq!(Decision::AutoMitigate.to_string(), "auto_mitigate");
    }
}
