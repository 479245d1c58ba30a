use crate::core::vapour::dew_point;
use crate::input::{ClimateSeries, MonthLabel};
use serde::Serialize;

/// Surface condensation and mould risk assessment to BS EN ISO 13788 Annex C:
/// the minimum acceptable temperature factor fRsi,min and the internal surface
/// temperature achieved each month. Independent of the interstitial (Glaser)
/// check; failures here are advisory and do not flip the primary verdict.

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SurfaceCondensationMonth {
    pub month: MonthLabel,
    /// fRsi,min - minimum acceptable temperature factor for the month
    pub minimum_temperature_factor: f64,
    /// minimum acceptable internal surface temperature, in degrees C
    pub minimum_surface_temperature: f64,
    /// internal surface temperature achieved, in degrees C
    pub surface_temperature: f64,
    pub mould_risk: bool,
}

/// Assess every month of the series
///
/// Arguments:
/// * `u_effective` - transmittance including any bridging and ground
///   adjustment, in W/(m2.K)
/// * `r_si` - internal surface resistance, in m2.K/W
pub fn assess_surface_condensation(
    u_effective: f64,
    r_si: f64,
    climate: &ClimateSeries,
) -> Vec<SurfaceCondensationMonth> {
    climate
        .months()
        .iter()
        .map(|month| {
            let temperature_difference =
                month.internal_temperature - month.external_temperature;
            let surface_temperature = month.internal_temperature
                - u_effective * temperature_difference * r_si;

            // dry internal air (RH 0) has no dew point to fall below
            if temperature_difference <= 0. || month.internal_rh <= 0. {
                // no inward heat flow, so the internal surface cannot fall
                // below the internal air dew point through fabric loss
                return SurfaceCondensationMonth {
                    month: month.month,
                    minimum_temperature_factor: 0.,
                    minimum_surface_temperature: month.external_temperature,
                    surface_temperature,
                    mould_risk: false,
                };
            }

            let internal_dew_point = dew_point(month.internal_temperature, month.internal_rh);
            let minimum_temperature_factor =
                (internal_dew_point - month.external_temperature) / temperature_difference;
            let minimum_surface_temperature = month.external_temperature
                + minimum_temperature_factor * temperature_difference;

            SurfaceCondensationMonth {
                month: month.month,
                minimum_temperature_factor,
                minimum_surface_temperature,
                surface_temperature,
                mould_risk: surface_temperature < minimum_surface_temperature,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ClimateMonth;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn series_with(external_temperature: f64, internal_rh: f64) -> ClimateSeries {
        use MonthLabel::*;
        let labels = [Jan, Feb, Mar, Apr, May, Jun, Jul, Aug, Sep, Oct, Nov, Dec];
        ClimateSeries::new(
            labels
                .iter()
                .map(|month| ClimateMonth {
                    month: *month,
                    external_temperature,
                    external_rh: 85.,
                    internal_temperature: 20.,
                    internal_rh,
                })
                .collect(),
        )
        .unwrap()
    }

    #[rstest]
    pub fn should_calc_surface_temperature_from_u_value() {
        // U = 0.374532, Tin 20, Text 5: Tsi = 20 - 0.374532 * 15 * 0.13
        let months = assess_surface_condensation(0.374532, 0.13, &series_with(5., 60.));
        assert_relative_eq!(months[0].surface_temperature, 19.2697, max_relative = 1e-4);
    }

    #[rstest]
    pub fn should_reconstruct_minimum_surface_temperature_as_dew_point() {
        // minTsi = Text + fRsi,min * (Tin - Text) collapses back to the dew
        // point of the internal air
        let months = assess_surface_condensation(0.374532, 0.13, &series_with(5., 60.));
        assert_relative_eq!(
            months[0].minimum_surface_temperature,
            dew_point(20., 60.),
            max_relative = 1e-9
        );
    }

    #[rstest]
    pub fn should_not_flag_well_insulated_surface() {
        // Tsi 19.27 degrees C sits well above the 12 degree dew point
        let months = assess_surface_condensation(0.374532, 0.13, &series_with(5., 60.));
        assert!(months.iter().all(|month| !month.mould_risk));
    }

    #[rstest]
    pub fn should_flag_poorly_insulated_surface_in_humid_room() {
        // U = 3.0 with Text -5 drops Tsi to 20 - 3 * 25 * 0.13 = 10.25, below
        // the 18.3 degree dew point of air at 20 degrees C / 90% RH
        let months = assess_surface_condensation(3.0, 0.13, &series_with(-5., 90.));
        assert!(months.iter().all(|month| month.mould_risk));
        let january = months[0];
        assert!(january.surface_temperature < january.minimum_surface_temperature);
        assert!(january.minimum_temperature_factor > 0.9);
    }

    #[rstest]
    pub fn should_carry_no_risk_when_external_air_is_warmer() {
        let months = assess_surface_condensation(0.374532, 0.13, &series_with(25., 60.));
        for month in months {
            assert!(!month.mould_risk);
            assert_eq!(month.minimum_temperature_factor, 0.);
        }
    }
}
