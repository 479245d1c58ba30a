pub const MILLIMETRES_IN_METRE: u32 = 1_000;

/// Conversion from vapour resistivity in MN.s/(g.m) multiplied by a thickness
/// in metres to a vapour resistance in SI units (N.s/kg, equivalently
/// Pa.m2.s/kg): 1 MN.s/g = 1e6 N.s / 1e-3 kg = 1e9 N.s/kg
pub const VAPOUR_RESISTIVITY_TO_SI: f64 = 1e9;

// Magnus formula coefficients for saturation vapour pressure over water,
// as used in BS EN ISO 13788 for the Glaser method
pub const MAGNUS_REFERENCE_PRESSURE: f64 = 610.78; // in Pa, saturation pressure at 0 degrees C
pub const MAGNUS_COEFF_A: f64 = 17.27;
pub const MAGNUS_COEFF_B: f64 = 237.7; // in degrees C

// Conventional surface resistances from BS EN ISO 6946:2017 Table 7, in m2.K/W
pub const R_SI_HORIZONTAL: f64 = 0.13; // heat flow horizontal (walls)
pub const R_SI_UPWARDS: f64 = 0.10; // heat flow upwards (roofs)
pub const R_SI_DOWNWARDS: f64 = 0.17; // heat flow downwards (floors)
pub const R_SE: f64 = 0.04;

pub(crate) fn thickness_mm_to_m(thickness_mm: f64) -> f64 {
    thickness_mm / MILLIMETRES_IN_METRE as f64
}
