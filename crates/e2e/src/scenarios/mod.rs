//! Scenario catalogue
//!
//! Each entry pairs a short id (used on the command line) with the function
//! building the scenario.

pub mod devfile;
pub mod dotnet_core;

pub use devfile::DevfileJourney;
pub use dotnet_core::dotnet_core;

use crate::error::{E2eError, E2eResult};
use crate::scenario::Scenario;

pub const CATALOGUE: &[(&str, fn() -> Scenario)] = &[("dotnet-core", dotnet_core)];

/// Every known scenario, in catalogue order
pub fn all() -> Vec<Scenario> {
    CATALOGUE.iter().map(|(_, build)| build()).collect()
}

/// Look a scenario up by catalogue id or by its full name
pub fn by_name(name: &str) -> E2eResult<Scenario> {
    CATALOGUE
        .iter()
        .map(|(id, build)| (*id, build()))
        .find(|(id, scenario)| *id == name || scenario.name() == name)
        .map(|(_, scenario)| scenario)
        .ok_or_else(|| {
            let known: Vec<&str> = CATALOGUE.iter().map(|(id, _)| *id).collect();
            E2eError::ScenarioNotFound(format!("'{}' (known: {})", name, known.join(", ")))
        })
}
