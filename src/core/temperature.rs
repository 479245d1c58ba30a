use crate::core::resistance::layer_equivalent_resistance;
use crate::input::Construction;
use serde::Serialize;

/// Steady-state 1D conduction profile through the layer stack. Positions are
/// measured in mm from the internal surface; the profile reports every
/// interface including both surfaces.

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GradientPoint {
    /// distance from the internal surface, in mm
    pub position_mm: f64,
    /// in degrees C
    pub temperature: f64,
}

/// Return the interface temperatures for the given air temperature pair
///
/// Arguments:
/// * `u_effective` - thermal transmittance including any bridging and ground
///   adjustment, in W/(m2.K)
/// * `internal_temperature`/`external_temperature` - air temperatures, in
///   degrees C
pub fn temperature_gradient(
    construction: &Construction,
    u_effective: f64,
    internal_temperature: f64,
    external_temperature: f64,
) -> Vec<GradientPoint> {
    let heat_flux = (internal_temperature - external_temperature) * u_effective; // in W/m2

    let mut points = Vec::with_capacity(construction.layers.len() + 1);
    let mut position_mm = 0.;
    let mut cumulative_resistance = construction.r_si;
    points.push(GradientPoint {
        position_mm,
        temperature: internal_temperature - heat_flux * cumulative_resistance,
    });
    for layer in &construction.layers {
        position_mm += layer.thickness_mm;
        cumulative_resistance += layer_equivalent_resistance(layer);
        points.push(GradientPoint {
            position_mm,
            temperature: internal_temperature - heat_flux * cumulative_resistance,
        });
    }
    points
}
