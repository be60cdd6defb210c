//! Triage Tools - read-only Kubernetes diagnostics
//!
//! Each tool is a self-contained file in src/tools/.
//! To add a tool: create the file, implement Tool trait, register below.
//! To remove a tool: delete the file, remove from mod.rs and registry below.

pub mod kube;
pub mod registry;
pub mod tools;

pub use kube::{KubeClient, KubeError};
pub use registry::{Tool, ToolRegistry, ToolResult};

use std::sync::Arc;

/// Create the default tool registry with all builtin diagnostic tools.
///
/// The Kubernetes client is built once by the caller and shared; tools never
/// initialize cluster access themselves.
pub fn create_default_registry(kube: Arc<KubeClient>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register(tools::PodHealthTool::new(kube.clone()));
    registry.register(tools::PodLogsTool::new(kube.clone()));
    registry.register(tools::ListPodsTool::new(kube));

    registry
}
