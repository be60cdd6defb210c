//! Incident signal and descriptor types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Incident event posted by the telemetry pipeline.
///
/// The wire shape is shared with the producer side; `metadata` carries
/// free-form key/value context that is not interpreted here.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IncidentSignal {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub severity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub resource: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, String>>,
    pub source: String,
}

/// The immutable description of the problem under investigation.
///
/// Carries only the fields the investigator reasons about; transport
/// concerns such as ids and timestamps stay on the signal.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IncidentDescriptor {
    pub event_type: String,
    pub severity: String,
    pub resource: String,
    pub message: String,
}

impl From<IncidentSignal> for IncidentDescriptor {
    fn from(signal: IncidentSignal) -> Self {
        Self {
            event_type: signal.event_type,
            severity: signal.severity,
            resource: signal.resource,
            message: signal.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_deserializes_from_pipeline_json() {
        let json = r#"{
            "id": "evt-42",
            "type": "pod_crash_loop",
            "severity": "high",
            "namespace": "payments",
            "resource": "pod/checkout-6d4f9",
            "message": "Back-off restarting failed container",
            "timestamp": "2026-08-21T10:30:00Z",
            "metadata": {"cluster": "prod-eu-1"},
            "source": "watcher"
        }"#;

        let signal: IncidentSignal = serde_json::from_str(json).unwrap();
        assert_eq!(signal.event_type, "pod_crash_loop");
        assert_eq!(signal.namespace.as_deref(), Some("payments"));
        assert_eq!(
            signal.metadata.as_ref().unwrap().get("cluster").unwrap(),
            "prod-eu-1"
        );
    }

    #[test]
    fn signal_tolerates_missing_optional_fields() {
        let json = r#"{
            "type": "cpu_spike",
            "severity": "medium",
            "resource": "pod/worker-7",
            "message": "CPU at 98%",
            "timestamp": "2026-08-21T10:30:00.123456789Z",
            "source": "metrics"
        }"#;

        let signal: IncidentSignal = serde_json::from_str(json).unwrap();
        assert!(signal.id.is_empty());
        assert!(signal.namespace.is_none());
        assert!(signal.metadata.is_none());
    }

    #[test]
    fn descriptor_keeps_only_investigation_fields() {
        let signal = IncidentSignal {
            id: "evt-1".into(),
            event_type: "oom_kill".into(),
            severity: "critical".into(),
            namespace: Some("default".into()),
            resource: "pod/cache-0".into(),
            message: "Container killed".into(),
            timestamp: Utc::now(),
            metadata: None,
            source: "watcher".into(),
        };

        let descriptor = IncidentDescriptor::from(signal);
        assert_eq!(descriptor.event_type, "oom_kill");
        assert_eq!(descriptor.severity, "critical");
        assert_eq!(descriptor.resource, "pod/cache-0");
        assert_eq!(descriptor.message, "Container killed");
    }
}
