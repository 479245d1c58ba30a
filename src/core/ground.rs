use crate::compare_floats::max_of_2;
use crate::core::u_value::UValueSolution;
use crate::errors::AnalysisError;
use crate::input::{Construction, FloorType, GroundFloorParams};
use std::f64::consts::PI;

/// Ground coupling of floor U-values to BS EN ISO 13370:2017.

// Thermal conductivity of ground from BS EN ISO 13370:2017 Table 7
// Use the value for clay or silt (same as BR 443 and SAP 10)
const SOIL_CONDUCTIVITY_CLAY_SILT: f64 = 1.5; // in W/(m.K)

// Assumed thickness of the perimeter walls where no override is supplied
const DEFAULT_WALL_THICKNESS: f64 = 0.3; // in m

// Underfloor ventilation assumptions for suspended floors, in the shape of
// BS EN ISO 13370:2017 section 8.4. These are conventional defaults, not
// values from the standard itself.
const VENT_OPENINGS_PER_PERIMETER: f64 = 0.0015; // in m2/m
const UNDERFLOOR_VOID_HEIGHT: f64 = 0.3; // in m
const UNDERFLOOR_WALL_U_VALUE: f64 = 1.7; // in W/(m2.K)
const MEAN_WIND_SPEED: f64 = 4.0; // in m/s
const WIND_SHIELDING_FACTOR: f64 = 0.05; // sheltered/average exposure

// Floor for the adjusted transmittance: degenerate inputs must not drive the
// ground term to zero or below
const MIN_GROUND_U_VALUE: f64 = 0.01; // in W/(m2.K)

/// Return the ground-adjusted thermal transmittance of a floor construction,
/// in W/(m2.K)
///
/// Arguments:
/// * `construction` - the floor construction
/// * `base` - the construction-level solution from the combined method, which
///   already resolves any bridging
/// * `params` - exposed perimeter, area and floor type
pub fn ground_adjusted_u_value(
    construction: &Construction,
    base: &UValueSolution,
    params: &GroundFloorParams,
) -> Result<f64, AnalysisError> {
    params.check()?;

    if matches!(params.floor_type, FloorType::Intermediate) {
        // ground coupling does not apply between storeys
        return Ok(base.u_value);
    }

    // characteristic dimension, BS EN ISO 13370:2017 Eqn 2
    let characteristic_dimension = 2. * params.area / params.perimeter;

    let soil_conductivity = params
        .soil_conductivity
        .unwrap_or(SOIL_CONDUCTIVITY_CLAY_SILT);
    let wall_thickness = params.wall_thickness.unwrap_or(DEFAULT_WALL_THICKNESS);

    // floor construction resistance excluding surface films, bridging-aware
    let floor_resistance = base.total_resistance - construction.r_si - construction.r_se;

    // total equivalent thickness, BS EN ISO 13370:2017 Eqn 3
    let equivalent_thickness = wall_thickness
        + soil_conductivity * (construction.r_si + floor_resistance + construction.r_se);

    let adjusted = match params.floor_type {
        FloorType::Ground | FloorType::Solid => solid_floor_u_value(
            soil_conductivity,
            characteristic_dimension,
            equivalent_thickness,
        ),
        FloorType::Suspended => {
            // ground resistance seen by the underfloor void
            let ground_resistance = characteristic_dimension / (2. * soil_conductivity);
            let coupled = 1. / (1. / base.u_value + ground_resistance);
            coupled + underfloor_ventilation_term(characteristic_dimension)
        }
        FloorType::Intermediate => unreachable!("handled above"),
    };

    Ok(max_of_2(adjusted, MIN_GROUND_U_VALUE))
}

/// Slab-on-ground transmittance, BS EN ISO 13370:2017 Eqns E.1/E.2. The two
/// branches agree at dt = B' to within the tolerance of the 0.457 constant.
fn solid_floor_u_value(
    soil_conductivity: f64,
    characteristic_dimension: f64,
    equivalent_thickness: f64,
) -> f64 {
    if equivalent_thickness < characteristic_dimension {
        // well insulated
        2. * soil_conductivity / (PI * characteristic_dimension + equivalent_thickness)
            * (PI * characteristic_dimension / equivalent_thickness + 1.).ln()
    } else {
        // poorly insulated
        soil_conductivity / (0.457 * characteristic_dimension + equivalent_thickness)
    }
}

/// Additional transmittance from heat carried out of the underfloor void by
/// ventilation through perimeter openings, additive to the coupled value.
fn underfloor_ventilation_term(characteristic_dimension: f64) -> f64 {
    2. * UNDERFLOOR_VOID_HEIGHT * UNDERFLOOR_WALL_U_VALUE / characteristic_dimension
        + 1450. * VENT_OPENINGS_PER_PERIMETER * MEAN_WIND_SPEED * WIND_SHIELDING_FACTOR
            / characteristic_dimension
}
