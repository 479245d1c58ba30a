use crate::core::moisture::MonthlyMoisture;
use crate::core::surface::SurfaceCondensationMonth;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Aggregate compliance verdict. The primary pass/fail criterion is that
/// interstitial moisture fully dries out over the annual cycle (BS EN ISO
/// 13788). Surface condensation months and U-value limits are reported for
/// the compliance schedule but are advisory: they do not flip the primary
/// verdict.

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ComplianceResult {
    Pass,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComplianceVerdict {
    pub overall_result: ComplianceResult,
    pub failure_reason: Option<String>,
    /// count of months flagged with surface mould risk (advisory)
    pub mould_risk_months: usize,
}

/// Evaluate the year's results into a verdict
pub fn evaluate_compliance(
    monthly: &[MonthlyMoisture],
    surface: &[SurfaceCondensationMonth],
) -> ComplianceVerdict {
    let year_end_retained = monthly.last().map(|month| month.cumulative).unwrap_or(0.);
    let peak_accumulation = monthly
        .iter()
        .map(|month| month.cumulative)
        .fold(0., f64::max);
    let mould_risk_months = surface.iter().filter(|month| month.mould_risk).count();

    // moisture must fully dry out over the annual cycle; anything beyond
    // rounding noise at 2 decimal places is a failure
    if year_end_retained <= 0. || is_close!(year_end_retained, 0., abs_tol = 5e-3) {
        return ComplianceVerdict {
            overall_result: ComplianceResult::Pass,
            failure_reason: None,
            mould_risk_months,
        };
    }

    ComplianceVerdict {
        overall_result: ComplianceResult::Fail,
        failure_reason: Some(format!(
            "Interstitial condensation does not fully evaporate over the annual cycle: \
             {year_end_retained:.2} g/m2 retained at year end (peak accumulation \
             {peak_accumulation:.2} g/m2)"
        )),
        mould_risk_months,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MonthLabel;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn monthly(cumulatives: &[f64]) -> Vec<MonthlyMoisture> {
        use MonthLabel::*;
        let labels = [Jan, Feb, Mar, Apr, May, Jun, Jul, Aug, Sep, Oct, Nov, Dec];
        labels
            .iter()
            .zip(cumulatives)
            .map(|(month, &cumulative)| MonthlyMoisture {
                month: *month,
                condensation: 0.,
                evaporation: 0.,
                net: 0.,
                cumulative,
            })
            .collect()
    }

    #[rstest]
    pub fn should_pass_when_moisture_dries_out() {
        let verdict = evaluate_compliance(
            &monthly(&[10., 20., 25., 18., 9., 0., 0., 0., 0., 0., 0., 0.]),
            &[],
        );
        assert_eq!(verdict.overall_result, ComplianceResult::Pass);
        assert!(verdict.failure_reason.is_none());
    }

    #[rstest]
    pub fn should_fail_with_narrative_when_moisture_is_retained() {
        let verdict = evaluate_compliance(
            &monthly(&[10., 20., 32.5, 18., 9., 4., 2., 2., 3., 5., 8., 12.25]),
            &[],
        );
        assert_eq!(verdict.overall_result, ComplianceResult::Fail);
        let reason = verdict.failure_reason.unwrap();
        assert!(reason.contains("12.25 g/m2 retained at year end"));
        assert!(reason.contains("peak accumulation 32.50 g/m2"));
    }

    #[rstest]
    pub fn should_keep_surface_condensation_advisory() {
        let risky_month = crate::core::surface::SurfaceCondensationMonth {
            month: MonthLabel::Jan,
            minimum_temperature_factor: 0.9,
            minimum_surface_temperature: 15.,
            surface_temperature: 12.,
            mould_risk: true,
        };
        let verdict = evaluate_compliance(
            &monthly(&[0.; 12]),
            &[risky_month],
        );
        // mould risk is reported but does not flip the verdict
        assert_eq!(verdict.overall_result, ComplianceResult::Pass);
        assert_eq!(verdict.mould_risk_months, 1);
    }

    #[rstest]
    pub fn should_tolerate_rounding_noise_at_year_end() {
        let verdict = evaluate_compliance(&monthly(&[0., 0., 0., 0., 0., 0., 0., 0., 0., 0., 0., 1e-9]), &[]);
        assert_eq!(verdict.overall_result, ComplianceResult::Pass);
    }
}
