use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::Serialize;

use crate::error::RoiError;

/// Operating tier that scales the per-incident unit costs.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize)]
pub enum Scenario {
    Starter,
    #[default]
    Professional,
    Enterprise,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [
        Scenario::Starter,
        Scenario::Professional,
        Scenario::Enterprise,
    ];

    pub fn multiplier(self) -> f64 {
        match self {
            Scenario::Starter => 0.5,
            Scenario::Professional => 1.0,
            Scenario::Enterprise => 1.25,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Scenario::Starter => "Starter",
            Scenario::Professional => "Professional",
            Scenario::Enterprise => "Enterprise",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = RoiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "starter" => Ok(Scenario::Starter),
            "professional" | "pro" => Ok(Scenario::Professional),
            "enterprise" => Ok(Scenario::Enterprise),
            _ => Err(RoiError::UnknownScenario(s.to_string())),
        }
    }
}

/// Caller-owned snapshot of every calculator input.
///
/// Unit costs are per incident, counts are for the current month, and
/// `annual_insurance_delta` is the only yearly figure. Nothing is range-checked.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputSet {
    pub unit_cost_violence_injury: f64,
    pub unit_cost_violence_no_injury: f64,
    pub unit_cost_fall: f64,
    pub count_violence_injury: f64,
    pub count_violence_no_injury: f64,
    pub count_falls: f64,
    pub guard_hourly_rate: f64,
    pub hours_saved_per_month: f64,
    pub annual_insurance_delta: f64,
    pub closure_hours_avoided: f64,
    pub revenue_per_hour: f64,
    pub monthly_fee: f64,
    pub scenario: Scenario,
}

impl Default for InputSet {
    fn default() -> Self {
        Self {
            unit_cost_violence_injury: 18_000.0,
            unit_cost_violence_no_injury: 7_500.0,
            unit_cost_fall: 1_900.0,
            count_violence_injury: 1.0,
            count_violence_no_injury: 1.0,
            count_falls: 1.0,
            guard_hourly_rate: 13.45,
            hours_saved_per_month: 80.0,
            annual_insurance_delta: 1_200.0,
            closure_hours_avoided: 0.0,
            revenue_per_hour: 1_500.0,
            monthly_fee: 1_499.0,
            scenario: Scenario::Professional,
        }
    }
}

impl InputSet {
    pub fn get(&self, field: InputField) -> f64 {
        match field {
            InputField::UnitCostViolenceInjury => self.unit_cost_violence_injury,
            InputField::UnitCostViolenceNoInjury => self.unit_cost_violence_no_injury,
            InputField::UnitCostFall => self.unit_cost_fall,
            InputField::CountViolenceInjury => self.count_violence_injury,
            InputField::CountViolenceNoInjury => self.count_violence_no_injury,
            InputField::CountFalls => self.count_falls,
            InputField::GuardHourlyRate => self.guard_hourly_rate,
            InputField::HoursSavedPerMonth => self.hours_saved_per_month,
            InputField::AnnualInsuranceDelta => self.annual_insurance_delta,
            InputField::ClosureHoursAvoided => self.closure_hours_avoided,
            InputField::RevenuePerHour => self.revenue_per_hour,
            InputField::MonthlyFee => self.monthly_fee,
        }
    }

    pub fn set(&mut self, field: InputField, value: f64) {
        let slot = match field {
            InputField::UnitCostViolenceInjury => &mut self.unit_cost_violence_injury,
            InputField::UnitCostViolenceNoInjury => &mut self.unit_cost_violence_no_injury,
            InputField::UnitCostFall => &mut self.unit_cost_fall,
            InputField::CountViolenceInjury => &mut self.count_violence_injury,
            InputField::CountViolenceNoInjury => &mut self.count_violence_no_injury,
            InputField::CountFalls => &mut self.count_falls,
            InputField::GuardHourlyRate => &mut self.guard_hourly_rate,
            InputField::HoursSavedPerMonth => &mut self.hours_saved_per_month,
            InputField::AnnualInsuranceDelta => &mut self.annual_insurance_delta,
            InputField::ClosureHoursAvoided => &mut self.closure_hours_avoided,
            InputField::RevenuePerHour => &mut self.revenue_per_hour,
            InputField::MonthlyFee => &mut self.monthly_fee,
        };
        *slot = value;
    }

    /// Returns a copy with one field replaced.
    pub fn with(mut self, field: InputField, value: f64) -> Self {
        self.set(field, value);
        self
    }
}

/// Numeric inputs addressable one at a time.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum InputField {
    UnitCostViolenceInjury,
    UnitCostViolenceNoInjury,
    UnitCostFall,
    CountViolenceInjury,
    CountViolenceNoInjury,
    CountFalls,
    GuardHourlyRate,
    HoursSavedPerMonth,
    AnnualInsuranceDelta,
    ClosureHoursAvoided,
    RevenuePerHour,
    MonthlyFee,
}

impl InputField {
    pub const ALL: [InputField; 12] = [
        InputField::UnitCostViolenceInjury,
        InputField::UnitCostViolenceNoInjury,
        InputField::UnitCostFall,
        InputField::CountViolenceInjury,
        InputField::CountViolenceNoInjury,
        InputField::CountFalls,
        InputField::GuardHourlyRate,
        InputField::HoursSavedPerMonth,
        InputField::AnnualInsuranceDelta,
        InputField::ClosureHoursAvoided,
        InputField::RevenuePerHour,
        InputField::MonthlyFee,
    ];

    pub fn label(self) -> &'static str {
        match self {
            InputField::UnitCostViolenceInjury => "Violence (injury) £",
            InputField::UnitCostViolenceNoInjury => "Violence (no injury) £",
            InputField::UnitCostFall => "Fall / medical £",
            InputField::CountViolenceInjury => "Fights (injury)",
            InputField::CountViolenceNoInjury => "Fights (no injury)",
            InputField::CountFalls => "Falls",
            InputField::GuardHourlyRate => "Guard wage £/hr",
            InputField::HoursSavedPerMonth => "Hours saved / mo",
            InputField::AnnualInsuranceDelta => "Insurance Δ (annual £)",
            InputField::ClosureHoursAvoided => "Closure hours avoided",
            InputField::RevenuePerHour => "Revenue £/hour",
            InputField::MonthlyFee => "NightShield fee £/mo",
        }
    }

    /// Slider bounds for fields edited with a slider. Advisory only.
    pub fn slider_range(self) -> Option<RangeInclusive<f64>> {
        match self {
            InputField::CountViolenceInjury => Some(0.0..=10.0),
            InputField::CountViolenceNoInjury | InputField::CountFalls => Some(0.0..=12.0),
            InputField::HoursSavedPerMonth => Some(0.0..=160.0),
            InputField::ClosureHoursAvoided => Some(0.0..=40.0),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitBreakdown {
    pub violence: f64,
    pub falls: f64,
    pub labour: f64,
    pub insurance: f64,
    pub uptime: f64,
}

impl BenefitBreakdown {
    pub fn total(&self) -> f64 {
        self.violence + self.falls + self.labour + self.insurance + self.uptime
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_benefit: f64,
    pub net: f64,
    pub roi_percent: f64,
}

/// Benefits and totals derived from a single input snapshot.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiSummary {
    pub scenario: Scenario,
    pub multiplier: f64,
    pub monthly_fee: f64,
    pub benefits: BenefitBreakdown,
    pub totals: Totals,
}
