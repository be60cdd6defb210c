//! Pod health tool - status, restarts, and recent events for one pod

use crate::kube::{KubeClient, KubeError, KubeEvent, Pod};
use crate::registry::{Tool, ToolResult};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

pub struct PodHealthTool {
    kube: Arc<KubeClient>,
}

impl PodHealthTool {
    pub fn new(kube: Arc<KubeClient>) -> Self {
        Self { kube }
    }
}

#[async_trait::async_trait]
impl Tool for PodHealthTool {
    fn name(&self) -> &str {
        "k8s_get_pod_health"
    }

    fn description(&self) -> &str {
        "Advanced health check. Retrieves the status, restart count, and recent events for a specific pod. Useful for diagnosing 'Pending', 'CrashLoopBackOff', or 'Error' states."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "pod_name": {
                    "type": "string",
                    "description": "Name of the pod to inspect"
                },
                "namespace": {
                    "type": "string",
                    "description": "Namespace of the pod (default: default)"
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

        let pod = match self.kube.get_pod(namespace, pod_name).await {
            Ok(pod) => pod,
            Err(KubeError::NotFound) => {
                return ToolResult::text(format!(
                    "Pod {} not found in namespace {}",
                    pod_name, namespace
                ))
            }
            Err(e) => return ToolResult::error(format!("API Error: {}", e)),
        };

        // Events are additive context; a lookup failure must not sink the report.
        let events = match self.kube.pod_events(namespace, pod_name).await {
            Ok(list) => list.items,
            Err(e) => {
                debug!("event lookup failed for {}/{}: {}", namespace, pod_name, e);
                Vec::new()
            }
        };

        ToolResult::text(health_report(pod_name, &pod, &events))
    }
}

fn health_report(pod_name: &str, pod: &Pod, events: &[KubeEvent]) -> String {
    let mut containers = Vec::new();
    for c in &pod.status.container_statuses {
        let state = if c.state.running.is_some() {
            "Running".to_string()
        } else if let Some(ref waiting) = c.state.waiting {
            format!(
                "Waiting (Reason: {}) Message: {}",
                waiting.reason.as_deref().unwrap_or("Unknown"),
                waiting.message.as_deref().unwrap_or("")
            )
        } else if let Some(ref terminated) = c.state.terminated {
            format!(
                "Terminated (Reason: {}), ExitCode: {}, Message: {}",
                terminated.reason.as_deref().unwrap_or("Unknown"),
                terminated.exit_code,
                terminated.message.as_deref().unwrap_or("")
            )
        } else {
            "Unknown".to_string()
        };
        containers.push(format!(
            "- Container '{}': {} (Restarts: {})",
            c.name, state, c.restart_count
        ));
    }

    let recent: Vec<String> = events
        .iter()
        .map(|e| format!("[{}] {}: {}", e.event_type, e.reason, e.message))
        .collect();
    let recent_text = if recent.is_empty() {
        "No recent events found.".to_string()
    } else {
        recent[recent.len().saturating_sub(5)..].join("\n")
    };

    format!(
        "--- Pod Health Report: {} ---\n\
         Phase: {}\n\
         IP: {}\n\
         Node: {}\n\
         Containers:\n\
         {}\n\
         Recent Events:\n\
         {}\n\
         -------------------------------------",
        pod_name,
        pod.status.phase,
        pod.status.pod_ip.as_deref().unwrap_or("unknown"),
        pod.status.host_ip.as_deref().unwrap_or("unknown"),
        containers.join("\n"),
        recent_text,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kube::{ContainerState, ContainerStatus, PodStatus, StateTerminated, StateWaiting};

    fn pod_with_status(status: PodStatus) -> Pod {
        Pod {
            status,
            ..Default::default()
        }
    }

    #[test]
    fn report_for_a_running_pod() {
        let pod = pod_with_status(PodStatus {
            phase: "Running".into(),
            pod_ip: Some("10.1.2.3".into()),
            host_ip: Some("192.168.1.10".into()),
            container_statuses: vec![ContainerStatus {
                name: "app".into(),
                restart_count: 0,
                state: ContainerState {
                    running: Some(Default::default()),
                    ..Default::default()
                },
            }],
        });

        let report = health_report("worker-7", &pod, &[]);
        assert!(report.starts_with("--- Pod Health Report: worker-7 ---"));
        assert!(report.contains("Phase: Running"));
        assert!(report.contains("IP: 10.1.2.3"));
        assert!(report.contains("- Container 'app': Running (Restarts: 0)"));
        assert!(report.contains("No recent events found."));
    }

    #[test]
    fn report_for_a_crash_looping_pod() {
        let pod = pod_with_status(PodStatus {
            phase: "Running".into(),
            pod_ip: None,
            host_ip: None,
            container_statuses: vec![ContainerStatus {
                name: "app".into(),
                restart_count: 7,
                state: ContainerState {
                    waiting: Some(StateWaiting {
                        reason: Some("CrashLoopBackOff".into()),
                        message: Some("back-off 40s restarting".into()),
                    }),
                    ..Default::default()
                },
            }],
        });

        let events = vec![KubeEvent {
            event_type: "Warning".into(),
            reason: "BackOff".into(),
            message: "Back-off restarting failed container".into(),
        }];

        let report = health_report("checkout-6d4f9", &pod, &events);
        assert!(report.contains("Waiting (Reason: CrashLoopBackOff)"));
        assert!(report.contains("(Restarts: 7)"));
        assert!(report.contains("[Warning] BackOff: Back-off restarting failed container"));
    }

    #[test]
    fn report_for_an_oom_killed_container() {
        let pod = pod_with_status(PodStatus {
            phase: "Running".into(),
            pod_ip: Some("10.1.2.4".into()),
            host_ip: Some("192.168.1.11".into()),
            container_statuses: vec![ContainerStatus {
                name: "cache".into(),
                restart_count: 12,
                state: ContainerState {
                    terminated: Some(StateTerminated {
                        reason: Some("OOMKilled".into()),
                        exit_code: 137,
                        message: None,
                    }),
                    ..Default::default()
                },
            }],
        });

        let report = health_report("cache-0", &pod, &[]);
        assert!(report.contains("Terminated (Reason: OOMKilled), ExitCode: 137"));
    }

    #[test]
    fn only_the_last_five_events_are_reported() {
        let pod = pod_with_status(PodStatus {
            phase: "Pending".into(),
            ..Default::default()
        });

        let events: Vec<KubeEvent> = (0..8)
            .map(|i| KubeEvent {
                event_type: "Normal".into(),
                reason: format!("Reason{}", i),
                message: "m".into(),
            })
            .collect();

        let report = health_report("slow-pod", &pod, &events);
        assert!(!report.contains("Reason2"));
        assert!(report.contains("Reason3"));
        assert!(report.contains("Reason7"));
    }

    #[tokio::test]
    async fn missing_pod_name_is_reported_as_error_text() {
        let kube = Arc::new(KubeClient::with_base_url("http://127.0.0.1:1", None));
        let tool = PodHealthTool::new(kube);

        let result = tool.execute(json!({"namespace": "default"})).await;
        assert!(result.is_error());
        assert!(result
            .to_content_string()
            .contains("Missing required parameter: pod_name"));
    }
}
