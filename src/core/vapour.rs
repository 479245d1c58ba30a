use crate::core::resistance::layer_vapour_resistance;
use crate::core::temperature::GradientPoint;
use crate::core::units::{MAGNUS_COEFF_A, MAGNUS_COEFF_B, MAGNUS_REFERENCE_PRESSURE};
use crate::errors::AnalysisError;
use crate::input::{ClimateMonth, Construction};
use itertools::Itertools;
use serde::Serialize;

/// Vapour diffusion through the layer stack by the Glaser method of
/// BS EN ISO 13788, on the same interface positions as the temperature
/// profile.

/// Return the saturation vapour pressure over water at the given temperature,
/// in Pa (Magnus formula, temperature in degrees C)
pub fn saturation_vapour_pressure(temperature: f64) -> f64 {
    MAGNUS_REFERENCE_PRESSURE
        * (MAGNUS_COEFF_A * temperature / (MAGNUS_COEFF_B + temperature)).exp()
}

/// Return the partial vapour pressure of air at the given temperature and
/// relative humidity, in Pa
pub fn partial_vapour_pressure(temperature: f64, relative_humidity: f64) -> f64 {
    saturation_vapour_pressure(temperature) * relative_humidity / 100.
}

/// Return the dew-point temperature of air at the given temperature and
/// relative humidity, in degrees C (Magnus inverse)
pub fn dew_point(temperature: f64, relative_humidity: f64) -> f64 {
    let gamma = (relative_humidity / 100.).ln()
        + MAGNUS_COEFF_A * temperature / (MAGNUS_COEFF_B + temperature);
    MAGNUS_COEFF_B * gamma / (MAGNUS_COEFF_A - gamma)
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct VapourPoint {
    /// distance from the internal surface, in mm
    pub position_mm: f64,
    /// in Pa
    pub partial_pressure: f64,
    /// in Pa
    pub saturation_pressure: f64,
}

#[derive(Clone, Debug)]
pub struct GlaserSolution {
    pub points: Vec<VapourPoint>,
    /// indices into `points` where partial pressure exceeds saturation.
    /// The two outermost surface points are never included: condensation is
    /// only meaningful at internal material interfaces, not at the air/surface
    /// boundary.
    pub condensing_interfaces: Vec<usize>,
}

impl GlaserSolution {
    /// Sum of (partial - saturation) over the condensing interfaces, in Pa
    pub fn total_excess_pressure(&self) -> f64 {
        self.condensing_interfaces
            .iter()
            .map(|&idx| self.points[idx].partial_pressure - self.points[idx].saturation_pressure)
            .sum()
    }
}

/// Return the vapour pressure profile for a month, co-located with the given
/// interface temperatures
pub fn vapour_pressure_gradient(
    construction: &Construction,
    temperatures: &[GradientPoint],
    month: &ClimateMonth,
) -> Result<GlaserSolution, AnalysisError> {
    let total_vapour_resistance = construction
        .layers
        .iter()
        .map(layer_vapour_resistance)
        .sum::<f64>();
    if total_vapour_resistance <= 0. {
        return Err(AnalysisError::NumericDegeneracy(format!(
            "total vapour resistance {total_vapour_resistance} N.s/kg is not positive; \
             every layer in the construction is vapour-open"
        )));
    }

    let internal_pressure =
        partial_vapour_pressure(month.internal_temperature, month.internal_rh);
    let external_pressure =
        partial_vapour_pressure(month.external_temperature, month.external_rh);
    // vapour flux, in kg/(m2.s)
    let vapour_flux = (internal_pressure - external_pressure) / total_vapour_resistance;

    // surface air films carry no vapour resistance, so the walk starts at the
    // internal air pressure
    let mut cumulative_resistance = 0.;
    let mut points = Vec::with_capacity(temperatures.len());
    for (idx, interface) in temperatures.iter().enumerate() {
        if idx > 0 {
            cumulative_resistance += layer_vapour_resistance(&construction.layers[idx - 1]);
        }
        points.push(VapourPoint {
            position_mm: interface.position_mm,
            partial_pressure: internal_pressure - vapour_flux * cumulative_resistance,
            saturation_pressure: saturation_vapour_pressure(interface.temperature),
        });
    }

    let condensing_interfaces = points
        .iter()
        .enumerate()
        .dropping(1)
        .dropping_back(1)
        .filter(|(_, point)| point.partial_pressure > point.saturation_pressure)
        .map(|(idx, _)| idx)
        .collect();

    Ok(GlaserSolution {
        points,
        condensing_interfaces,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::material::{Material, MaterialCategory, ThermalBehaviour};
    use crate::core::temperature::temperature_gradient;
    use crate::core::u_value::u_value_for;
    use crate::input::{ConstructionLayer, ElementType, MonthLabel};
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn layer(id: &str, conductivity: f64, vapour_resistivity: f64, thickness_mm: f64) -> ConstructionLayer {
        ConstructionLayer {
            material: Material {
                id: id.into(),
                category: MaterialCategory::Custom,
                thermal: ThermalBehaviour::Homogeneous { conductivity },
                vapour_resistivity,
                density: 500.,
                specific_heat_capacity: 1000.,
                custom: false,
            },
            thickness_mm,
            bridging: None,
        }
    }

    fn december() -> ClimateMonth {
        ClimateMonth {
            month: MonthLabel::Dec,
            external_temperature: 5.,
            external_rh: 87.,
            internal_temperature: 20.,
            internal_rh: 60.,
        }
    }

    #[rstest]
    pub fn should_calc_magnus_saturation_pressure() {
        assert_relative_eq!(saturation_vapour_pressure(0.), 610.78, max_relative = 1e-12);
        assert_relative_eq!(saturation_vapour_pressure(20.), 2333.4, max_relative = 1e-3);
    }

    #[rstest]
    pub fn should_increase_saturation_pressure_strictly_with_temperature() {
        let mut previous = saturation_vapour_pressure(-20.);
        let mut temperature = -19.5;
        while temperature <= 40. {
            let current = saturation_vapour_pressure(temperature);
            assert!(
                current > previous,
                "saturation pressure not strictly increasing at {temperature} degrees C"
            );
            previous = current;
            temperature += 0.5;
        }
    }

    #[rstest]
    pub fn should_calc_dew_point_consistent_with_saturation() {
        // air at 20 degrees C / 60% RH dews at about 12 degrees C
        let dew = dew_point(20., 60.);
        assert_relative_eq!(dew, 12.0, max_relative = 1e-2);
        // at the dew point, saturation equals the air's partial pressure
        assert_relative_eq!(
            saturation_vapour_pressure(dew),
            partial_vapour_pressure(20., 60.),
            max_relative = 1e-9
        );
    }

    #[rstest]
    pub fn should_walk_linear_partial_pressure_between_surface_values() {
        let construction = Construction::new(
            ElementType::Wall,
            vec![
                layer("plasterboard", 0.21, 45., 12.5),
                layer("mineral-wool", 0.035, 5., 150.),
                layer("brick", 0.77, 50., 102.5),
            ],
            0.13,
            0.04,
        )
        .unwrap();
        let u_value = u_value_for(&construction).unwrap().u_value;
        let month = december();
        let temperatures =
            temperature_gradient(&construction, u_value, month.internal_temperature, month.external_temperature);
        let solution = vapour_pressure_gradient(&construction, &temperatures, &month).unwrap();

        assert_eq!(solution.points.len(), 4);
        assert_relative_eq!(
            solution.points[0].partial_pressure,
            partial_vapour_pressure(20., 60.),
            max_relative = 1e-12
        );
        assert_relative_eq!(
            solution.points[3].partial_pressure,
            partial_vapour_pressure(5., 87.),
            max_relative = 1e-9
        );
        // partial pressure decreases monotonically towards the colder side
        for pair in solution.points.windows(2) {
            assert!(pair[0].partial_pressure >= pair[1].partial_pressure);
        }
    }

    #[rstest]
    pub fn should_detect_condensation_behind_vapour_tight_external_layer() {
        // vapour-open insulation behind a vapour-tight external skin drives
        // the interface behind the skin above saturation in winter
        let construction = Construction::new(
            ElementType::Wall,
            vec![
                layer("plasterboard", 0.21, 45., 12.5),
                layer("mineral-wool", 0.035, 5., 150.),
                layer("metal-skin", 50., 40000., 3.),
            ],
            0.13,
            0.04,
        )
        .unwrap();
        let u_value = u_value_for(&construction).unwrap().u_value;
        let month = ClimateMonth {
            external_temperature: 0.,
            external_rh: 90.,
            ..december()
        };
        let temperatures = temperature_gradient(
            &construction,
            u_value,
            month.internal_temperature,
            month.external_temperature,
        );
        let solution = vapour_pressure_gradient(&construction, &temperatures, &month).unwrap();
        assert_eq!(
            solution.condensing_interfaces,
            vec![2],
            "condensation expected behind the external skin"
        );
        assert!(solution.total_excess_pressure() > 0.);
    }

    #[rstest]
    pub fn should_never_flag_surface_points_as_condensing() {
        let construction = Construction::new(
            ElementType::Wall,
            vec![layer("brick", 0.77, 50., 215.)],
            0.13,
            0.04,
        )
        .unwrap();
        let u_value = u_value_for(&construction).unwrap().u_value;
        let month = ClimateMonth {
            external_temperature: -5.,
            external_rh: 100.,
            ..december()
        };
        let temperatures = temperature_gradient(
            &construction,
            u_value,
            month.internal_temperature,
            month.external_temperature,
        );
        let solution = vapour_pressure_gradient(&construction, &temperatures, &month).unwrap();
        // a single layer has no internal material interfaces at all
        assert!(solution.condensing_interfaces.is_empty());
    }

    #[rstest]
    pub fn should_reject_zero_total_vapour_resistance() {
        let construction = Construction::new(
            ElementType::Wall,
            vec![layer("open", 0.04, 0., 100.)],
            0.13,
            0.04,
        )
        .unwrap();
        let u_value = u_value_for(&construction).unwrap().u_value;
        let month = december();
        let temperatures = temperature_gradient(
            &construction,
            u_value,
            month.internal_temperature,
            month.external_temperature,
        );
        assert!(matches!(
            vapour_pressure_gradient(&construction, &temperatures, &month),
            Err(AnalysisError::NumericDegeneracy(_))
        ));
    }
}
