//! Read-only Kubernetes API client
//!
//! Shared by every diagnostic tool. Credentials come from the in-cluster
//! service account mount when present, otherwise from KUBE_API_URL and
//! KUBE_TOKEN (point KUBE_API_URL at `kubectl proxy` for local runs).
//! Construction fails fast; a service that cannot reach the cluster should
//! not come up at all.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;
use triage_core::Error;

const SERVICE_ACCOUNT_DIR: &str = "/var/run/secrets/kubernetes.io/serviceaccount";

/// Kubernetes API error types
#[derive(Debug, thiserror::Error)]
pub enum KubeError {
    #[error("not found")]
    NotFound,

    #[error("api error: {0}")]
    Api(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

pub struct KubeClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl KubeClient {
    /// Build from the environment: KUBE_API_URL/KUBE_TOKEN if set,
    /// otherwise the in-cluster service account.
    pub fn from_env() -> triage_core::Result<Self> {
        if let Ok(url) = std::env::var("KUBE_API_URL") {
            let token = std::env::var("KUBE_TOKEN").ok();
            return Ok(Self::with_base_url(url, token));
        }
        Self::in_cluster()
    }

    /// Service-account token and CA from the standard in-cluster mount.
    pub fn in_cluster() -> triage_core::Result<Self> {
        let host = std::env::var("KUBERNETES_SERVICE_HOST").map_err(|_| {
            Error::config("KUBERNETES_SERVICE_HOST not set and no KUBE_API_URL override")
        })?;
        let port =
            std::env::var("KUBERNETES_SERVICE_PORT").unwrap_or_else(|_| "443".to_string());

        let token = std::fs::read_to_string(format!("{}/token", SERVICE_ACCOUNT_DIR))
            .map_err(|e| Error::config(format!("service account token unreadable: {}", e)))?;
        let ca = std::fs::read(format!("{}/ca.crt", SERVICE_ACCOUNT_DIR))
            .map_err(|e| Error::config(format!("service account CA unreadable: {}", e)))?;
        let cert = reqwest::Certificate::from_pem(&ca)
            .map_err(|e| Error::config(format!("service account CA invalid: {}", e)))?;

        let client = Client::builder()
            .add_root_certificate(cert)
            .build()
            .map_err(|e| Error::config(format!("http client init failed: {}", e)))?;

        Ok(Self {
            client,
            base_url: format!("https://{}:{}", host, port),
            token: Some(token.trim().to_string()),
        })
    }

    pub fn with_base_url(url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    async fn get(&self, path: &str) -> Result<reqwest::Response, KubeError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("kube GET {}", path);

        let mut request = self.client.get(&url);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(KubeError::NotFound),
            status if !status.is_success() => {
                let reason = response.text().await.unwrap_or_default();
                Err(KubeError::Api(format!("{}: {}", status, reason)))
            }
            _ => Ok(response),
        }
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, KubeError> {
        let response = self.get(path).await?;
        Ok(response.json().await?)
    }

    pub async fn get_pod(&self, namespace: &str, name: &str) -> Result<Pod, KubeError> {
        self.get_json(&format!("/api/v1/namespaces/{}/pods/{}", namespace, name))
            .await
    }

    pub async fn list_pods(&self, namespace: &str) -> Result<PodList, KubeError> {
        self.get_json(&format!("/api/v1/namespaces/{}/pods", namespace))
            .await
    }

    pub async fn pod_logs(
        &self,
        namespace: &str,
        name: &str,
        container: &str,
        lines: u32,
    ) -> Result<String, KubeError> {
        let path = format!(
            "/api/v1/namespaces/{}/pods/{}/log?container={}&tailLines={}",
            namespace, name, container, lines
        );
        let response = self.get(&path).await?;
        Ok(response.text().await?)
    }

    /// Events whose involved object is the named pod.
    pub async fn pod_events(&self, namespace: &str, pod_name: &str) -> Result<EventList, KubeError> {
        let path = format!(
            "/api/v1/namespaces/{}/events?fieldSelector=involvedObject.name%3D{}",
            namespace, pod_name
        );
        self.get_json(&path).await
    }
}

// Typed views over the API objects, limited to the fields the reports use.
// Everything defaults so partial objects from older API servers still parse.

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Pod {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: PodSpec,
    #[serde(default)]
    pub status: PodStatus,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PodList {
    #[serde(default)]
    pub items: Vec<Pod>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct PodSpec {
    #[serde(default)]
    pub containers: Vec<ContainerSpec>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ContainerSpec {
    #[serde(default)]
    pub name: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodStatus {
    #[serde(default)]
    pub phase: String,
    #[serde(default, rename = "podIP")]
    pub pod_ip: Option<String>,
    #[serde(default, rename = "hostIP")]
    pub host_ip: Option<String>,
    #[serde(default)]
    pub container_statuses: Vec<ContainerStatus>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerStatus {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub restart_count: u32,
    #[serde(default)]
    pub state: ContainerState,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ContainerState {
    #[serde(default)]
    pub running: Option<StateRunning>,
    #[serde(default)]
    pub waiting: Option<StateWaiting>,
    #[serde(default)]
    pub terminated: Option<StateTerminated>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct StateRunning {}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct StateWaiting {
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateTerminated {
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub exit_code: i32,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct EventList {
    #[serde(default)]
    pub items: Vec<KubeEvent>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct KubeEvent {
    #[serde(rename = "type", default)]
    pub event_type: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub message: String,
}
