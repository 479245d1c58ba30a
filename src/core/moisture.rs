use crate::compare_floats::{max_of_2, min_of_2};
use crate::core::temperature::temperature_gradient;
use crate::core::vapour::vapour_pressure_gradient;
use crate::errors::AnalysisError;
use crate::input::{ClimateSeries, Construction, MonthLabel};
use serde::Serialize;

/// Twelve-month interstitial moisture accumulation loop (BS EN ISO 13788
/// Glaser method). Each month condenses moisture at interfaces where partial
/// pressure exceeds saturation and evaporates previously retained moisture
/// when the external climate allows; the cumulative total carries forward
/// month to month and is never negative.

// Conversion from summed excess vapour pressure at condensing interfaces to a
// monthly condensation amount. This is a modelling simplification rather than
// a value from the cited standard; recalibrate here if needed.
const CONDENSATION_GRAMS_PER_PASCAL: f64 = 0.05; // in g/(m2.Pa.month)

// Evaporation potential per degree of external temperature above the base.
// Modelling simplification, as above.
const EVAPORATION_GRAMS_PER_DEGREE: f64 = 2.0; // in g/(m2.K.month)
const EVAPORATION_BASE_TEMPERATURE: f64 = 0.0; // in degrees C

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MonthlyMoisture {
    pub month: MonthLabel,
    /// moisture condensed this month, in g/m2
    pub condensation: f64,
    /// moisture evaporated this month, in g/m2
    pub evaporation: f64,
    /// condensation less evaporation, in g/m2
    pub net: f64,
    /// running retained moisture at the end of the month, in g/m2
    pub cumulative: f64,
}

/// Run the monthly loop over a climate series
///
/// Arguments:
/// * `u_effective` - transmittance used for the temperature profiles, in
///   W/(m2.K)
pub fn simulate_monthly_moisture(
    construction: &Construction,
    u_effective: f64,
    climate: &ClimateSeries,
) -> Result<Vec<MonthlyMoisture>, AnalysisError> {
    let mut cumulative = 0.;
    let mut results = Vec::with_capacity(climate.months().len());
    for month in climate.months() {
        let temperatures = temperature_gradient(
            construction,
            u_effective,
            month.internal_temperature,
            month.external_temperature,
        );
        let glaser = vapour_pressure_gradient(construction, &temperatures, month)?;
        let condensation = glaser.total_excess_pressure() * CONDENSATION_GRAMS_PER_PASCAL;

        let evaporation_potential = EVAPORATION_GRAMS_PER_DEGREE
            * max_of_2(
                0.,
                month.external_temperature - EVAPORATION_BASE_TEMPERATURE,
            );
        let evaporation = min_of_2(cumulative, evaporation_potential);

        cumulative = max_of_2(0., cumulative + condensation - evaporation);
        results.push(MonthlyMoisture {
            month: month.month,
            condensation,
            evaporation,
            net: condensation - evaporation,
            cumulative,
        });
    }
    Ok(results)
}
