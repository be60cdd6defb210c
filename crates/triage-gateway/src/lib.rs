//! Triage Gateway - HTTP ingress for incident signals

pub mod server;

pub use server::{build_graph, start_gateway};
