use crate::core::compliance::{evaluate_compliance, ComplianceResult};
use crate::core::ground::ground_adjusted_u_value;
use crate::core::moisture::{simulate_monthly_moisture, MonthlyMoisture};
use crate::core::surface::{assess_surface_condensation, SurfaceCondensationMonth};
use crate::core::temperature::{temperature_gradient, GradientPoint};
use crate::core::u_value::u_value_for;
use crate::core::vapour::{vapour_pressure_gradient, VapourPoint};
use crate::errors::AnalysisError;
use crate::input::{ClimateSeries, Construction, GroundFloorParams};
use serde::Serialize;

/// The engine's single entry point and its result type. One call runs the
/// whole stack in dependency order: U-values (with bridging resolved), ground
/// coupling where requested, the design-month temperature and vapour
/// profiles, the twelve-month moisture loop, the surface condensation
/// assessment and the aggregate verdict. Every call builds a fresh result;
/// there is no internal cache.

#[derive(Clone, Debug, Serialize)]
pub struct AnalysisResult {
    /// thermal transmittance with bridging (and ground coupling, for ground
    /// floors) resolved, in W/(m2.K)
    pub u_value: f64,
    /// series-sum transmittance ignoring bridging, in W/(m2.K), for reporting
    pub u_value_without_bridging: f64,
    /// interface temperatures for the coldest external month
    pub temperature_gradient: Vec<GradientPoint>,
    /// interface vapour pressures for the coldest external month
    pub vapour_pressure_gradient: Vec<VapourPoint>,
    pub monthly_moisture: Vec<MonthlyMoisture>,
    pub surface_condensation: Vec<SurfaceCondensationMonth>,
    pub overall_result: ComplianceResult,
    pub failure_reason: Option<String>,
}

/// Run a full hygrothermal analysis of a construction against a monthly
/// climate series
///
/// Arguments:
/// * `construction` - layered construction, internal surface first
/// * `climate` - twelve months of design climate
/// * `ground` - ground coupling parameters, for ground-coupled floors only
pub fn analyze(
    construction: &Construction,
    climate: &ClimateSeries,
    ground: Option<&GroundFloorParams>,
) -> Result<AnalysisResult, AnalysisError> {
    construction.check()?;
    climate.check()?;
    if let Some(params) = ground {
        params.check()?;
    }

    let solution = u_value_for(construction)?;
    let u_effective = match ground {
        Some(params) => ground_adjusted_u_value(construction, &solution, params)?,
        None => solution.u_value,
    };
    tracing::debug!(
        u_value = u_effective,
        u_value_without_bridging = solution.u_value_without_bridging,
        "combined method solved"
    );

    let design_month = climate.coldest_external_month();
    let design_temperatures = temperature_gradient(
        construction,
        u_effective,
        design_month.internal_temperature,
        design_month.external_temperature,
    );
    let design_vapour =
        vapour_pressure_gradient(construction, &design_temperatures, design_month)?;

    let monthly_moisture = simulate_monthly_moisture(construction, u_effective, climate)?;
    let surface_condensation =
        assess_surface_condensation(u_effective, construction.r_si, climate);
    let verdict = evaluate_compliance(&monthly_moisture, &surface_condensation);
    tracing::debug!(
        result = %verdict.overall_result,
        mould_risk_months = verdict.mould_risk_months,
        "compliance evaluated"
    );

    Ok(AnalysisResult {
        u_value: u_effective,
        u_value_without_bridging: solution.u_value_without_bridging,
        temperature_gradient: design_temperatures,
        vapour_pressure_gradient: design_vapour.points,
        monthly_moisture,
        surface_condensation,
        overall_result: verdict.overall_result,
        failure_reason: verdict.failure_reason,
    })
}
