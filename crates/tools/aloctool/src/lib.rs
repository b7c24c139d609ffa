//! Batch tooling over ALOC collision files
//!
//! - [`inspect`]: decode files and summarize their contents
//! - [`scenario`]: pair a scenario's entity instances with their collision assets
//! - [`config`]: environment configuration shared by both commands

pub mod config;
pub mod inspect;
pub mod scenario;

pub use config::ToolConfig;
pub use inspect::{inspect_file, inspect_files, FileSummary, InspectOutcome};
pub use scenario::{
    load_scenario, place, InstanceTransform, Placement, Scenario, ScenarioError, ScenarioReport,
};
