//! Tests for triage-tools: ToolResult, ToolRegistry, and the builtin diagnostic tools

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use triage_tools::*;

fn offline_kube() -> Arc<KubeClient> {
    // Nothing here talks to the network; the port is a dead end on purpose.
    Arc::new(KubeClient::with_base_url("http://127.0.0.1:1", None))
}

// ===========================================================================
// ToolResult
// ===========================================================================

#[test]
fn tool_result_text() {
    let r = ToolResult::text("hello");
    assert!(!r.is_error());
    assert_eq!(r.to_content_string(), "hello");
}

#[test]
fn tool_result_error() {
    let r = ToolResult::error("boom");
    assert!(r.is_error());
    assert_eq!(r.to_content_string(), "Error: boom");
}

// ===========================================================================
// ToolRegistry
// ===========================================================================

struct EchoTool;

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Echoes its arguments back"
    }

    fn input_schema(&self) -> Value {
        json!({"type": "object", "properties": {"text": {"type": "string"}}})
    }

    async fn execute(&self, args: Value) -> ToolResult {
        ToolResult::text(args["text"].as_str().unwrap_or_default().to_string())
    }
}

#[tokio::test]
async fn registry_default_is_empty() {
    let reg = ToolRegistry::new();
    assert!(reg.list().is_empty());
    assert!(reg.describe().is_empty());
}

#[tokio::test]
async fn registry_invoke_missing_tool() {
    let reg = ToolRegistry::new();
    let result = reg.invoke("nonexistent", json!({})).await;
    assert!(result.is_error());
    assert!(result.to_content_string().contains("Tool not found: nonexistent"));
}

#[tokio::test]
async fn registry_invoke_dispatches_by_name() {
    let mut reg = ToolRegistry::new();
    reg.register(EchoTool);

    let result = reg.invoke("echo", json!({"text": "ping"})).await;
    assert!(!result.is_error());
    assert_eq!(result.to_content_string(), "ping");
}

#[tokio::test]
async fn create_default_registry_has_all_tools() {
    let reg = create_default_registry(offline_kube());
    let names = reg.list();
    assert!(names.contains(&"k8s_get_pod_health"));
    assert!(names.contains(&"k8s_fetch_logs"));
    assert!(names.contains(&"k8s_list_pods"));
    assert_eq!(names.len(), 3);
    assert_eq!(reg.describe().len(), 3);
}

#[tokio::test]
async fn registry_get_tool() {
    let reg = create_default_registry(offline_kube());
    assert!(reg.get("k8s_list_pods").is_some());
    assert!(reg.get("nonexistent").is_none());
}

#[tokio::test]
async fn registry_tools_have_schemas() {
    let reg = create_default_registry(offline_kube());
    for def in reg.describe() {
        assert!(!def.name.is_empty());
        assert!(!def.description.is_empty());
        assert!(def.input_schema.is_object());
    }
}

// ===========================================================================
// Diagnostic tools — argument validation (no cluster needed)
// ===========================================================================

#[tokio::test]
async fn pod_health_requires_pod_name() {
    let reg = create_default_registry(offline_kube());
    let result = reg.invoke("k8s_get_pod_health", json!({})).await;
    assert!(result.is_error());
    assert!(result
        .to_content_string()
        .contains("Missing required parameter: pod_name"));
}

#[tokio::test]
async fn fetch_logs_requires_pod_name() {
    let reg = create_default_registry(offline_kube());
    let result = reg.invoke("k8s_fetch_logs", json!({"namespace": "jobs"})).await;
    assert!(result.is_error());
    assert!(result
        .to_content_string()
        .contains("Missing required parameter: pod_name"));
}

#[tokio::test]
async fn unreachable_cluster_is_reported_in_result_text() {
    let reg = create_default_registry(offline_kube());
    let result = reg.invoke("k8s_list_pods", json!({"namespace": "default"})).await;
    assert!(result.is_error());
    assert!(result
        .to_content_string()
        .contains("Failed to list pods in namespace default"));
}

#[tokio::test]
async fn pod_health_schema_marks_pod_name_required() {
    let reg = create_default_registry(offline_kube());
    let tool = reg.get("k8s_get_pod_health").unwrap();
    let schema = tool.input_schema();
    assert_eq!(schema["required"], json!(["pod_name"]));
    assert!(schema["properties"]["namespace"].is_object());
}
