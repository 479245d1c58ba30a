use crate::core::material::{BridgingElement, Material, ThermalBehaviour};
use crate::core::units::{R_SE, R_SI_DOWNWARDS, R_SI_HORIZONTAL, R_SI_UPWARDS};
use crate::errors::AnalysisError;
use anyhow::{anyhow, Context};
use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use serde_valid::Validate;
use std::io::Read;
use strum_macros::Display;

/// Input value types for the hygrothermal engine, and the JSON serialization
/// boundary used by the surrounding persistence layer. The engine itself is
/// pure and performs no I/O; everything in this module is resolved up front
/// into plain immutable values before `analyze` is called.

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ElementType {
    Wall,
    Floor,
    Roof,
    Junction,
}

impl ElementType {
    /// Return the conventional (internal, external) surface resistances for
    /// this element type from BS EN ISO 6946:2017 Table 7, in m2.K/W
    pub fn conventional_surface_resistances(&self) -> (f64, f64) {
        match self {
            ElementType::Wall | ElementType::Junction => (R_SI_HORIZONTAL, R_SE),
            ElementType::Floor => (R_SI_DOWNWARDS, R_SE),
            ElementType::Roof => (R_SI_UPWARDS, R_SE),
        }
    }
}

/// One layer of a construction: a material at a thickness, optionally
/// penetrated by a bridging material. Layers are ordered internal-surface-first
/// to external-surface-last; that ordering is the single source of truth for
/// "internal"/"external" throughout the solvers.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ConstructionLayer {
    #[validate]
    pub material: Material,
    /// in mm
    #[validate(exclusive_minimum = 0.)]
    pub thickness_mm: f64,
    #[serde(default)]
    #[validate]
    pub bridging: Option<BridgingElement>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct Construction {
    pub element_type: ElementType,
    #[validate]
    #[validate(min_items = 1)]
    pub layers: Vec<ConstructionLayer>,
    /// internal surface resistance, in m2.K/W
    #[validate(minimum = 0.)]
    pub r_si: f64,
    /// external surface resistance, in m2.K/W
    #[validate(minimum = 0.)]
    pub r_se: f64,
}

impl Construction {
    pub fn new(
        element_type: ElementType,
        layers: Vec<ConstructionLayer>,
        r_si: f64,
        r_se: f64,
    ) -> Result<Self, AnalysisError> {
        let construction = Self {
            element_type,
            layers,
            r_si,
            r_se,
        };
        construction.check()?;
        Ok(construction)
    }

    /// Fail-fast invariant checks, re-run at the `analyze` entry point so
    /// programmatically-built values get the same treatment as deserialized
    /// ones.
    pub(crate) fn check(&self) -> Result<(), AnalysisError> {
        if self.layers.is_empty() {
            return Err(AnalysisError::InvalidConstruction(
                "at least one layer is required".into(),
            ));
        }
        if self.r_si < 0. || self.r_se < 0. {
            return Err(AnalysisError::InvalidConstruction(format!(
                "surface resistances must not be negative (r_si = {}, r_se = {})",
                self.r_si, self.r_se
            )));
        }
        for (idx, layer) in self.layers.iter().enumerate() {
            if layer.thickness_mm <= 0. {
                return Err(AnalysisError::InvalidConstruction(format!(
                    "layer {idx} has non-positive thickness {} mm",
                    layer.thickness_mm
                )));
            }
            check_material(&layer.material, idx)?;
            if let Some(bridging) = &layer.bridging {
                check_material(&bridging.material, idx)?;
                if bridging.proportion_percent <= 0. || bridging.proportion_percent > 100. {
                    return Err(AnalysisError::InvalidConstruction(format!(
                        "layer {idx} declares a bridging proportion of {}% (expected 0 < p <= 100)",
                        bridging.proportion_percent
                    )));
                }
            }
        }
        Ok(())
    }
}

fn check_material(material: &Material, layer_idx: usize) -> Result<(), AnalysisError> {
    match material.thermal {
        ThermalBehaviour::Homogeneous { conductivity } if conductivity <= 0. => {
            return Err(AnalysisError::InvalidConstruction(format!(
                "material '{}' in layer {layer_idx} has non-positive conductivity {} with no declared resistance",
                material.id, conductivity
            )));
        }
        ThermalBehaviour::FixedResistance { resistance } if resistance <= 0. => {
            return Err(AnalysisError::InvalidConstruction(format!(
                "material '{}' in layer {layer_idx} declares a non-positive resistance {}",
                material.id, resistance
            )));
        }
        _ => {}
    }
    if material.vapour_resistivity < 0. {
        return Err(AnalysisError::InvalidConstruction(format!(
            "material '{}' in layer {layer_idx} has negative vapour resistivity {}",
            material.id, material.vapour_resistivity
        )));
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MonthLabel {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

/// Monthly design climate: external conditions from the regional reference
/// table, internal conditions from the assumed occupancy class.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ClimateMonth {
    pub month: MonthLabel,
    /// in degrees C; sanity of the range is enforced by the series check
    pub external_temperature: f64,
    /// relative humidity, in %
    #[validate(minimum = 0.)]
    #[validate(maximum = 100.)]
    pub external_rh: f64,
    /// in degrees C
    pub internal_temperature: f64,
    /// relative humidity, in %
    #[validate(minimum = 0.)]
    #[validate(maximum = 100.)]
    pub internal_rh: f64,
}

/// Exactly twelve entries, one per calendar month. The monthly moisture loop
/// is cyclic over these.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ClimateSeries(Vec<ClimateMonth>);

impl ClimateSeries {
    pub fn new(months: Vec<ClimateMonth>) -> Result<Self, AnalysisError> {
        let series = Self(months);
        series.check()?;
        Ok(series)
    }

    pub fn months(&self) -> &[ClimateMonth] {
        &self.0
    }

    /// Return the month with the lowest external temperature, used as the
    /// design month for the headline temperature/vapour profiles. Ties break
    /// towards the earlier entry, so the choice is deterministic and
    /// unaffected by rotating the series.
    pub(crate) fn coldest_external_month(&self) -> &ClimateMonth {
        self.0
            .iter()
            .min_by_key(|month| OrderedFloat(month.external_temperature))
            .expect("climate series is validated to contain twelve months")
    }

    pub(crate) fn check(&self) -> Result<(), AnalysisError> {
        if self.0.len() != 12 {
            return Err(AnalysisError::InvalidClimateSeries(format!(
                "expected 12 months, got {}",
                self.0.len()
            )));
        }
        for month in &self.0 {
            if self.0.iter().filter(|other| other.month == month.month).count() > 1 {
                return Err(AnalysisError::InvalidClimateSeries(format!(
                    "month {} appears more than once",
                    month.month
                )));
            }
            for (label, rh) in [("external", month.external_rh), ("internal", month.internal_rh)] {
                if !(0. ..=100.).contains(&rh) {
                    return Err(AnalysisError::InvalidClimateSeries(format!(
                        "{} relative humidity {}% for {} is outside [0, 100]",
                        label, rh, month.month
                    )));
                }
            }
            for (label, temp) in [
                ("external", month.external_temperature),
                ("internal", month.internal_temperature),
            ] {
                if !(-50. ..=60.).contains(&temp) {
                    return Err(AnalysisError::InvalidClimateSeries(format!(
                        "{} temperature {} degrees C for {} is outside the physically sane range [-50, 60]",
                        label, temp, month.month
                    )));
                }
            }
        }
        Ok(())
    }
}

impl TryFrom<Vec<ClimateMonth>> for ClimateSeries {
    type Error = AnalysisError;

    fn try_from(months: Vec<ClimateMonth>) -> Result<Self, Self::Error> {
        Self::new(months)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FloorType {
    Ground,
    Solid,
    Suspended,
    Intermediate,
}

/// Parameters for ground coupling of floor constructions to
/// BS EN ISO 13370:2017.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct GroundFloorParams {
    /// exposed perimeter, in m
    #[validate(exclusive_minimum = 0.)]
    pub perimeter: f64,
    /// floor area, in m2
    #[validate(exclusive_minimum = 0.)]
    pub area: f64,
    pub floor_type: FloorType,
    /// perimeter wall thickness override, in m
    #[serde(default)]
    pub wall_thickness: Option<f64>,
    /// soil thermal conductivity override, in W/(m.K)
    #[serde(default)]
    pub soil_conductivity: Option<f64>,
}

impl GroundFloorParams {
    pub(crate) fn check(&self) -> Result<(), AnalysisError> {
        if self.perimeter <= 0. {
            return Err(AnalysisError::InvalidGroundParams(format!(
                "exposed perimeter must be positive, got {} m",
                self.perimeter
            )));
        }
        if self.area <= 0. {
            return Err(AnalysisError::InvalidGroundParams(format!(
                "floor area must be positive, got {} m2",
                self.area
            )));
        }
        if let Some(wall_thickness) = self.wall_thickness {
            if wall_thickness <= 0. {
                return Err(AnalysisError::InvalidGroundParams(format!(
                    "wall thickness override must be positive, got {} m",
                    wall_thickness
                )));
            }
        }
        if let Some(soil_conductivity) = self.soil_conductivity {
            if soil_conductivity <= 0. {
                return Err(AnalysisError::InvalidGroundParams(format!(
                    "soil conductivity override must be positive, got {} W/(m.K)",
                    soil_conductivity
                )));
            }
        }
        Ok(())
    }
}

/// Reference table of materials known to the surrounding persistence layer.
/// Passed by reference into the serialization boundary; the engine holds no
/// global registry.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct MaterialRegistry(IndexMap<String, Material>);

impl MaterialRegistry {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn from_json(json: impl Read) -> anyhow::Result<Self> {
        let materials: Vec<Material> =
            serde_json::from_reader(json).context("could not parse materials JSON")?;
        for material in &materials {
            material.validate()?;
        }
        Ok(Self(
            materials
                .into_iter()
                .map(|material| (material.id.clone(), material))
                .collect(),
        ))
    }

    pub fn insert(&mut self, material: Material) {
        self.0.insert(material.id.clone(), material);
    }

    pub fn get(&self, id: &str) -> Option<&Material> {
        self.0.get(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A layer as persisted: either a registry material id or an embedded
/// custom-material payload.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum MaterialRef {
    Id(String),
    Custom(Material),
}

impl MaterialRef {
    fn resolve(&self, registry: &MaterialRegistry) -> anyhow::Result<Material> {
        match self {
            MaterialRef::Id(id) => registry
                .get(id)
                .cloned()
                .ok_or_else(|| anyhow!("material '{id}' is not in the supplied registry")),
            MaterialRef::Custom(material) => {
                material.validate()?;
                Ok(material.clone())
            }
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LayerInput {
    pub material: MaterialRef,
    pub thickness_mm: f64,
    #[serde(default)]
    pub bridging: Option<BridgingInput>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BridgingInput {
    pub material: MaterialRef,
    pub proportion_percent: f64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConstructionInput {
    pub element_type: ElementType,
    pub layers: Vec<LayerInput>,
    /// defaults to the conventional BS EN ISO 6946 value for the element type
    #[serde(default)]
    pub r_si: Option<f64>,
    #[serde(default)]
    pub r_se: Option<f64>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectInput {
    pub construction: ConstructionInput,
    pub climate: Vec<ClimateMonth>,
    #[serde(default)]
    pub ground: Option<GroundFloorParams>,
}

/// A fully-resolved project ready for analysis.
#[derive(Clone, Debug)]
pub struct Project {
    pub construction: Construction,
    pub climate: ClimateSeries,
    pub ground: Option<GroundFloorParams>,
}

/// Parse and resolve a project JSON against a material registry. Material ids
/// are looked up in the registry; embedded custom-material payloads are taken
/// as-is after validation.
pub fn ingest_project(json: impl Read, registry: &MaterialRegistry) -> anyhow::Result<Project> {
    let input: ProjectInput =
        serde_json::from_reader(json).context("could not parse project JSON")?;
    let (conventional_r_si, conventional_r_se) = input
        .construction
        .element_type
        .conventional_surface_resistances();
    let layers = input
        .construction
        .layers
        .iter()
        .map(|layer| {
            Ok(ConstructionLayer {
                material: layer.material.resolve(registry)?,
                thickness_mm: layer.thickness_mm,
                bridging: layer
                    .bridging
                    .as_ref()
                    .map(|bridging| {
                        Ok::<_, anyhow::Error>(BridgingElement {
                            material: bridging.material.resolve(registry)?,
                            proportion_percent: bridging.proportion_percent,
                        })
                    })
                    .transpose()?,
            })
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    let construction = Construction::new(
        input.construction.element_type,
        layers,
        input.construction.r_si.unwrap_or(conventional_r_si),
        input.construction.r_se.unwrap_or(conventional_r_se),
    )?;
    construction.validate()?;
    for month in &input.climate {
        month.validate()?;
    }
    let climate = ClimateSeries::new(input.climate)?;
    if let Some(ground) = &input.ground {
        ground.validate()?;
        ground.check()?;
    }
    Ok(Project {
        construction,
        climate,
        ground: input.ground,
    })
}
