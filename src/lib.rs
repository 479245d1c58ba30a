pub mod core;
pub mod errors;
pub mod input;
pub mod output;

mod compare_floats;

#[macro_use]
extern crate is_close;

pub use crate::core::analysis::{analyze, AnalysisResult};
pub use crate::core::compliance::ComplianceResult;
pub use crate::errors::AnalysisError;
pub use crate::input::{
    ClimateMonth, ClimateSeries, Construction, ConstructionLayer, ElementType, FloorType,
    GroundFloorParams, MaterialRegistry, MonthLabel, Project,
};

use crate::input::ingest_project;
use std::io::Read;

/// Parse a project JSON against a material registry and run the full
/// analysis. This is the boundary used by the CLI and any other wrapper; the
/// engine itself (`analyze`) stays pure and free of I/O.
pub fn run_analysis(
    project_json: impl Read,
    registry: &MaterialRegistry,
) -> Result<AnalysisResult, anyhow::Error> {
    let project = ingest_project(project_json, registry)?;
    Ok(analyze(
        &project.construction,
        &project.climate,
        project.ground.as_ref(),
    )?)
}
