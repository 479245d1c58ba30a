use crate::input::ConstructionLayer;

/// Per-layer thermal and vapour resistances. Bridging never alters the
/// thermal resistance of a single layer here: BS EN ISO 6946 resolves
/// bridging at assembly level only (see u_value.rs), so the thermal value
/// returned for a bridged layer is always that of its primary material.

/// Return the thermal resistance of a layer's primary material, in m2.K/W
pub fn layer_thermal_resistance(layer: &ConstructionLayer) -> f64 {
    layer.material.resistance_for_thickness(layer.thickness_mm)
}

/// Return the thermal resistance of the layer along the bridge path, in
/// m2.K/W: the bridging material's resistance where the layer is bridged,
/// the primary material's otherwise
pub fn bridge_path_resistance(layer: &ConstructionLayer) -> f64 {
    match &layer.bridging {
        Some(bridging) => bridging.material.resistance_for_thickness(layer.thickness_mm),
        None => layer_thermal_resistance(layer),
    }
}

/// Return the equivalent resistance of the layer with its parallel paths
/// combined area-weighted, in m2.K/W
/// (BS EN ISO 6946:2017 section 6.7.2, lower limit)
pub fn layer_equivalent_resistance(layer: &ConstructionLayer) -> f64 {
    match &layer.bridging {
        Some(bridging) => {
            let f_bridge = bridging.fraction();
            let f_main = 1. - f_bridge;
            1. / (f_bridge / bridge_path_resistance(layer)
                + f_main / layer_thermal_resistance(layer))
        }
        None => layer_thermal_resistance(layer),
    }
}

/// Return the vapour resistance of a layer, in N.s/kg, area-weighted with the
/// bridging material's vapour resistance when bridging is present
pub fn layer_vapour_resistance(layer: &ConstructionLayer) -> f64 {
    let main_resistance = layer
        .material
        .vapour_resistance_for_thickness(layer.thickness_mm);
    match &layer.bridging {
        Some(bridging) => {
            let f_bridge = bridging.fraction();
            let bridge_resistance = bridging
                .material
                .vapour_resistance_for_thickness(layer.thickness_mm);
            (1. - f_bridge) * main_resistance + f_bridge * bridge_resistance
        }
        None => main_resistance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::material::{BridgingElement, Material, MaterialCategory, ThermalBehaviour};
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn material(id: &str, conductivity: f64, vapour_resistivity: f64) -> Material {
        Material {
            id: id.into(),
            category: MaterialCategory::Custom,
            thermal: ThermalBehaviour::Homogeneous { conductivity },
            vapour_resistivity,
            density: 500.,
            specific_heat_capacity: 1000.,
            custom: false,
        }
    }

    #[fixture]
    pub fn bridged_insulation() -> ConstructionLayer {
        ConstructionLayer {
            material: material("mineral-wool", 0.035, 5.),
            thickness_mm: 100.,
            bridging: Some(BridgingElement {
                material: material("timber-stud", 0.13, 50.),
                proportion_percent: 15.,
            }),
        }
    }

    #[rstest]
    pub fn should_ignore_bridging_for_single_layer_thermal_resistance(
        bridged_insulation: ConstructionLayer,
    ) {
        assert_relative_eq!(
            layer_thermal_resistance(&bridged_insulation),
            0.1 / 0.035,
            max_relative = 1e-12
        );
    }

    #[rstest]
    pub fn should_use_bridging_material_along_bridge_path(bridged_insulation: ConstructionLayer) {
        assert_relative_eq!(
            bridge_path_resistance(&bridged_insulation),
            0.1 / 0.13,
            max_relative = 1e-12
        );
    }

    #[rstest]
    pub fn should_combine_parallel_paths_for_equivalent_resistance(
        bridged_insulation: ConstructionLayer,
    ) {
        let r_main = 0.1 / 0.035;
        let r_bridge = 0.1 / 0.13;
        let expected = 1. / (0.15 / r_bridge + 0.85 / r_main);
        assert_relative_eq!(
            layer_equivalent_resistance(&bridged_insulation),
            expected,
            max_relative = 1e-12
        );
        assert!(layer_equivalent_resistance(&bridged_insulation) < r_main);
    }

    #[rstest]
    pub fn should_return_plain_resistance_for_unbridged_layer() {
        let layer = ConstructionLayer {
            material: material("brick", 0.77, 50.),
            thickness_mm: 102.5,
            bridging: None,
        };
        assert_eq!(
            layer_equivalent_resistance(&layer),
            layer_thermal_resistance(&layer)
        );
    }

    #[rstest]
    pub fn should_area_weight_vapour_resistance(bridged_insulation: ConstructionLayer) {
        // mu 5 at 85% and mu 50 at 15% over 0.1 m
        let expected = (0.85 * 5. + 0.15 * 50.) * 0.1 * 1e9;
        assert_relative_eq!(
            layer_vapour_resistance(&bridged_insulation),
            expected,
            max_relative = 1e-12
        );
    }
}
