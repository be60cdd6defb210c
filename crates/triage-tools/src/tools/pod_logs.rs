//! Log tool - tail the logs of a pod's first container

use crate::kube::{KubeClient, KubeError};
use crate::registry::{Tool, ToolResult};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

const DEFAULT_TAIL_LINES: u32 = 50;

pub struct PodLogsTool {
    kube: Arc<KubeClient>,
}

impl PodLogsTool {
    pub fn new(kube: Arc<KubeClient>) -> Self {
        Self { kube }
    }
}

#[async_trait::async_trait]
impl Tool for PodLogsTool {
    fn name(&self) -> &str {
        "k8s_fetch_logs"
    }

    fn description(&self) -> &str {
        "Fetches the last N lines of logs from a pod. Automatically detects the pod's first container and fetches its logs."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "pod_name": {
                    "type": "string",
                    "description": "Name of the pod to read logs from"
                },
                "namespace": {
                    "type": "string",
                    "description": "Namespace of the pod (default: default)"
                },
                "lines": {
                    "type": "integer",
                    "description": "Number of log lines to tail (default 50)"
                }
            },
            "required": ["pod_name"]
        })
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let pod_name = match args.get("pod_name").and_then(|v| v.as_str()) {
            Some(p) => p,
            None => return ToolResult::error("Missing required parameter: pod_name"),
        };
        let namespace = args.get("namespace").and_then(|v| v.as_str()).unwrap_or("default");
        let lines = args
            .get("lines")
            .and_then(|v| v.as_u64())
            .unwrap_or(DEFAULT_TAIL_LINES as u64) as u32;

        let pod = match self.kube.get_pod(namespace, pod_name).await {
            Ok(pod) => pod,
            Err(e) => {
                return ToolResult::error(fetch_failure(pod_name, namespace, &e));
            }
        };

        let container = match pod.spec.containers.first() {
            Some(c) => c.name.clone(),
            None => {
                return ToolResult::error(format!(
                    "Pod {} in namespace {} has no containers",
                    pod_name, namespace
                ))
            }
        };

        debug!("fetching {} log lines from {}/{}", lines, pod_name, container);

        match self.kube.pod_logs(namespace, pod_name, &container, lines).await {
            Ok(logs) if logs.is_empty() => ToolResult::text(format!(
                "No logs found for pod {} in namespace {}",
                pod_name, namespace
            )),
            Ok(logs) => ToolResult::text(logs),
            Err(e) => ToolResult::error(fetch_failure(pod_name, namespace, &e)),
        }
    }
}

fn fetch_failure(pod_name: &str, namespace: &str, err: &KubeError) -> String {
    format!(
        "Failed to fetch logs for pod {} in namespace {}: {}",
        pod_name, namespace, err
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_pod_name_is_reported_as_error_text() {
        let kube = Arc::new(KubeClient::with_base_url("http://127.0.0.1:1", None));
        let tool = PodLogsTool::new(kube);

        let result = tool.execute(json!({})).await;
        assert!(result.is_error());
        assert!(result
            .to_content_string()
            .contains("Missing required parameter: pod_name"));
    }

    #[test]
    fn fetch_failure_names_the_pod_and_namespace() {
        let text = fetch_failure("worker-7", "jobs", &KubeError::NotFound);
        assert_eq!(
            text,
            "Failed to fetch logs for pod worker-7 in namespace jobs: not found"
        );
    }
}
