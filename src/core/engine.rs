use super::types::{BenefitBreakdown, InputSet, RoiSummary, Totals};

pub fn compute_benefits(inputs: &InputSet) -> BenefitBreakdown {
    let mult = inputs.scenario.multiplier();

    let violence = inputs.unit_cost_violence_injury * mult * inputs.count_violence_injury
        + inputs.unit_cost_violence_no_injury * mult * inputs.count_violence_no_injury;
    let falls = inputs.unit_cost_fall * mult * inputs.count_falls;
    let labour = inputs.guard_hourly_rate * inputs.hours_saved_per_month;
    let insurance = inputs.annual_insurance_delta / 12.0;
    let uptime = inputs.closure_hours_avoided * inputs.revenue_per_hour;

    BenefitBreakdown {
        violence,
        falls,
        labour,
        insurance,
        uptime,
    }
}

/// ROI is pinned to 0 unless the fee is strictly positive (NaN included).
pub fn compute_totals(benefits: &BenefitBreakdown, monthly_fee: f64) -> Totals {
    let total_benefit = benefits.total();
    let net = total_benefit - monthly_fee;
    let roi_percent = if monthly_fee > 0.0 {
        net / monthly_fee * 100.0
    } else {
        0.0
    };

    Totals {
        total_benefit,
        net,
        roi_percent,
    }
}

pub fn reset_to_defaults() -> InputSet {
    InputSet::default()
}

pub fn summarize(inputs: &InputSet) -> RoiSummary {
    let benefits = compute_benefits(inputs);
    let totals = compute_totals(&benefits, inputs.monthly_fee);

    tracing::debug!(
        scenario = %inputs.scenario,
        total_benefit = totals.total_benefit,
        net = totals.net,
        roi_percent = totals.roi_percent,
        "computed roi summary"
    );

    RoiSummary {
        scenario: inputs.scenario,
        multiplier: inputs.scenario.multiplier(),
        monthly_fee: inputs.monthly_fee,
        benefits,
        totals,
    }
}
