use crate::core::units::{thickness_mm_to_m, VAPOUR_RESISTIVITY_TO_SI};
use serde::{Deserialize, Serialize};
use serde_valid::Validate;
use strum_macros::Display;

/// This module contains the value types describing construction materials and
/// the parallel heat-flow (bridging) paths through them.

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MaterialCategory {
    Insulation,
    Masonry,
    Timber,
    Metal,
    Membrane,
    Plasterboard,
    Render,
    Cladding,
    Concrete,
    AirGap,
    Flooring,
    Glazing,
    Custom,
}

/// How a material resists conductive heat flow. Materials like air gaps and
/// thin membranes declare a fixed thermal resistance directly because a
/// conductivity is not meaningful for them; everything else declares a
/// conductivity and derives resistance from thickness.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ThermalBehaviour {
    Homogeneous {
        /// thermal conductivity (lambda), in W/(m.K)
        #[validate(exclusive_minimum = 0.)]
        conductivity: f64,
    },
    FixedResistance {
        /// declared thermal resistance, in m2.K/W
        #[validate(exclusive_minimum = 0.)]
        resistance: f64,
    },
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct Material {
    pub id: String,
    pub category: MaterialCategory,
    #[validate]
    pub thermal: ThermalBehaviour,
    /// vapour resistivity (mu), in MN.s/(g.m)
    #[validate(minimum = 0.)]
    pub vapour_resistivity: f64,
    /// in kg/m3
    #[validate(exclusive_minimum = 0.)]
    pub density: f64,
    /// in J/(kg.K)
    #[validate(exclusive_minimum = 0.)]
    pub specific_heat_capacity: f64,
    #[serde(default)]
    pub custom: bool,
}

impl Material {
    /// Return the thermal resistance of a slab of this material, in m2.K/W
    ///
    /// Arguments:
    /// * `thickness_mm` - thickness of the slab, in mm
    pub fn resistance_for_thickness(&self, thickness_mm: f64) -> f64 {
        match self.thermal {
            ThermalBehaviour::Homogeneous { conductivity } => {
                thickness_mm_to_m(thickness_mm) / conductivity
            }
            ThermalBehaviour::FixedResistance { resistance } => resistance,
        }
    }

    /// Return the vapour resistance of a slab of this material, in N.s/kg
    pub fn vapour_resistance_for_thickness(&self, thickness_mm: f64) -> f64 {
        self.vapour_resistivity * thickness_mm_to_m(thickness_mm) * VAPOUR_RESISTIVITY_TO_SI
    }
}

/// A secondary material penetrating a layer as a parallel heat-flow path,
/// e.g. timber studs through an insulation layer.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct BridgingElement {
    #[validate]
    pub material: Material,
    /// area fraction taken up by the bridging material, as a percentage
    #[validate(exclusive_minimum = 0.)]
    #[validate(maximum = 100.)]
    pub proportion_percent: f64,
}

impl BridgingElement {
    /// Return the bridged area fraction in the range (0, 1]
    pub fn fraction(&self) -> f64 {
        self.proportion_percent / 100.
    }
}
