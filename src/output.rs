use crate::core::analysis::AnalysisResult;
use csv::WriterBuilder;
use itertools::Itertools;
use std::io::Write;

/// Reporting conventions and the monthly CSV writer used by the CLI. The
/// engine's result carries full precision; downstream renderers reformat for
/// display, so only the conventions documented here are guaranteed:
/// U-values to 3 decimals, temperatures to 1, pressures to the nearest Pa,
/// moisture amounts to 2.

pub fn round_u_value(value: f64) -> f64 {
    round_by_precision(value, 1e3)
}

pub fn round_temperature(value: f64) -> f64 {
    round_by_precision(value, 1e1)
}

pub fn round_pressure(value: f64) -> f64 {
    value.round()
}

pub fn round_moisture(value: f64) -> f64 {
    round_by_precision(value, 1e2)
}

fn round_by_precision(src: f64, precision: f64) -> f64 {
    (precision * src).round() / precision
}

/// Write the month-by-month results as CSV: a headings row, a units row, then
/// one row per month combining the moisture and surface condensation figures.
pub fn write_monthly_report(
    writer: impl Write,
    result: &AnalysisResult,
) -> Result<(), anyhow::Error> {
    let mut writer = WriterBuilder::new().from_writer(writer);

    writer.write_record([
        "Month",
        "Condensation",
        "Evaporation",
        "Net",
        "Cumulative",
        "fRsi min",
        "Tsi min",
        "Tsi",
        "Mould risk",
    ])?;
    writer.write_record([
        "[label]", "[g/m2]", "[g/m2]", "[g/m2]", "[g/m2]", "[ratio]", "[deg C]", "[deg C]",
        "[bool]",
    ])?;

    for (moisture, surface) in result
        .monthly_moisture
        .iter()
        .zip_eq(&result.surface_condensation)
    {
        writer.write_record([
            moisture.month.to_string(),
            round_moisture(moisture.condensation).to_string(),
            round_moisture(moisture.evaporation).to_string(),
            round_moisture(moisture.net).to_string(),
            round_moisture(moisture.cumulative).to_string(),
            format!("{:.3}", surface.minimum_temperature_factor),
            round_temperature(surface.minimum_surface_temperature).to_string(),
            round_temperature(surface.surface_temperature).to_string(),
            surface.mould_risk.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
