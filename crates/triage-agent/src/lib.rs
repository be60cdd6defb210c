//! Triage Agent - the investigation graph
//!
//! An incident flows through a small state machine: reasoning turns
//! alternate with tool resolution until the investigator stops asking for
//! tools, then a single decision step classifies the outcome.

pub mod decide;
pub mod graph;
pub mod state;

pub use graph::{route_after_investigate, GraphConfig, InvestigationGraph, Route};
pub use state::InvestigationState;
