//! Builtin diagnostic tools

pub mod list_pods;
pub mod pod_health;
pub mod pod_logs;

pub use list_pods::ListPodsTool;
pub use pod_health::PodHealthTool;
pub use pod_logs::PodLogsTool;
