//! Pod listing tool - one summary line per pod in a namespace

use crate::kube::{KubeClient, PodList};
use crate::registry::{Tool, ToolResult};
use serde_json::{json, Value};
use std::sync::Arc;

pub struct ListPodsTool {
    kube: Arc<KubeClient>,
}

impl ListPodsTool {
    pub fn new(kube: Arc<KubeClient>) -> Self {
        Self { kube }
    }
}

#[async_trait::async_trait]
impl Tool for ListPodsTool {
    fn name(&self) -> &str {
        "k8s_list_pods"
    }

    fn description(&self) -> &str {
        "Lists all pods in a namespace with their current status and restart counts. Use this to identify which pod is failing when the exact name is unknown."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "namespace": {
                    "type": "string",
                    "description": "Namespace to list (default: default)"
                }
            }
        })
    }

    async fn execute(&self, args: Value) -> ToolResult {
        let namespace = args.get("namespace").and_then(|v| v.as_str()).unwrap_or("default");

        match self.kube.list_pods(namespace).await {
            Ok(pods) => ToolResult::text(pod_summary(&pods)),
            Err(e) => ToolResult::error(format!(
                "Failed to list pods in namespace {}: {}",
                namespace, e
            )),
        }
    }
}

fn pod_summary(pods: &PodList) -> String {
    let lines: Vec<String> = pods
        .items
        .iter()
        .map(|p| {
            let restarts: u32 = p
                .status
                .container_statuses
                .iter()
                .map(|c| c.restart_count)
                .sum();
            format!(
                "{} | Status: {} | Restarts: {}",
                p.metadata.name, p.status.phase, restarts
            )
        })
        .collect();
    lines.join("\n")
}
