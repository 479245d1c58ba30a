use crate::core::resistance::{
    bridge_path_resistance, layer_equivalent_resistance, layer_thermal_resistance,
};
use crate::errors::AnalysisError;
use crate::input::Construction;

/// Construction-level thermal transmittance to BS EN ISO 6946:2017. Unbridged
/// assemblies are a plain series sum; bridged assemblies use the combined
/// method of section 6.7.2, bounding the total resistance between an upper
/// limit (whole-assembly parallel paths) and a lower limit (per-layer parallel
/// combination) and taking their arithmetic mean.

#[derive(Clone, Copy, Debug)]
pub struct UValueSolution {
    /// thermal transmittance with bridging resolved, in W/(m2.K)
    pub u_value: f64,
    /// simple series-sum transmittance ignoring all bridging, in W/(m2.K)
    /// (reporting only)
    pub u_value_without_bridging: f64,
    /// total thermal resistance 1/u_value, in m2.K/W
    pub total_resistance: f64,
    /// upper resistance limit, when the assembly is bridged, in m2.K/W
    pub upper_limit: Option<f64>,
    /// lower resistance limit, when the assembly is bridged, in m2.K/W
    pub lower_limit: Option<f64>,
}

pub fn u_value_for(construction: &Construction) -> Result<UValueSolution, AnalysisError> {
    let series_resistance = construction.r_si
        + construction.r_se
        + construction
            .layers
            .iter()
            .map(layer_thermal_resistance)
            .sum::<f64>();
    if series_resistance <= 0. {
        return Err(AnalysisError::NumericDegeneracy(format!(
            "total thermal resistance {series_resistance} m2.K/W is not positive"
        )));
    }
    let u_value_without_bridging = 1. / series_resistance;

    let Some(f_bridge) = assembly_bridging_fraction(construction) else {
        return Ok(UValueSolution {
            u_value: u_value_without_bridging,
            u_value_without_bridging,
            total_resistance: series_resistance,
            upper_limit: None,
            lower_limit: None,
        });
    };
    let f_main = 1. - f_bridge;

    // Upper limit: the whole assembly as two parallel paths, the bridge path
    // following the bridging material through every bridged layer
    let bridge_path_total = construction.r_si
        + construction.r_se
        + construction
            .layers
            .iter()
            .map(bridge_path_resistance)
            .sum::<f64>();
    let upper_limit = 1. / (f_main / series_resistance + f_bridge / bridge_path_total);

    // Lower limit: parallel combination within each layer, then series
    let lower_limit = construction.r_si
        + construction.r_se
        + construction
            .layers
            .iter()
            .map(layer_equivalent_resistance)
            .sum::<f64>();

    let total_resistance = (upper_limit + lower_limit) / 2.;
    if total_resistance <= 0. {
        return Err(AnalysisError::NumericDegeneracy(format!(
            "combined thermal resistance {total_resistance} m2.K/W is not positive"
        )));
    }

    Ok(UValueSolution {
        u_value: 1. / total_resistance,
        u_value_without_bridging,
        total_resistance,
        upper_limit: Some(upper_limit),
        lower_limit: Some(lower_limit),
    })
}

/// Return the bridged area fraction used for the whole-assembly upper-limit
/// split, taken from the first bridged layer. Constructions mixing differing
/// bridging fractions across layers are only approximated by this split, so a
/// mismatch is logged rather than silently generalized.
fn assembly_bridging_fraction(construction: &Construction) -> Option<f64> {
    let mut bridged = construction
        .layers
        .iter()
        .filter_map(|layer| layer.bridging.as_ref());
    let first = bridged.next()?;
    for other in bridged {
        if other.proportion_percent != first.proportion_percent {
            tracing::warn!(
                "bridged layers declare differing proportions ({}% and {}%); using the first for the upper-limit split",
                first.proportion_percent,
                other.proportion_percent
            );
        }
    }
    Some(first.fraction())
}
