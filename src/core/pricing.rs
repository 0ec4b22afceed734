use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::format::Currency;
use super::types::Scenario;
use crate::error::RoiError;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    #[default]
    Monthly,
    Yearly,
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BillingCycle::Monthly => f.write_str("monthly"),
            BillingCycle::Yearly => f.write_str("yearly"),
        }
    }
}

impl FromStr for BillingCycle {
    type Err = RoiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" | "month" => Ok(BillingCycle::Monthly),
            "yearly" | "year" | "annual" => Ok(BillingCycle::Yearly),
            _ => Err(RoiError::UnknownBillingCycle(s.to_string())),
        }
    }
}

/// Price per month in GBP. Yearly billing is quoted as the discounted monthly rate.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PlanPrice {
    Fixed { monthly: f64, yearly: f64 },
    Custom,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub tier: Scenario,
    pub description: &'static str,
    pub features: &'static [&'static str],
    pub price: PlanPrice,
    pub popular: bool,
}

impl Plan {
    /// The monthly fee this plan charges under `cycle`, if it has a list price.
    pub fn fee_for(&self, cycle: BillingCycle) -> Option<f64> {
        match self.price {
            PlanPrice::Fixed { monthly, yearly } => Some(match cycle {
                BillingCycle::Monthly => monthly,
                BillingCycle::Yearly => yearly,
            }),
            PlanPrice::Custom => None,
        }
    }
}

pub fn plans() -> Vec<Plan> {
    Scenario::ALL.into_iter().map(plan_for).collect()
}

pub fn plan_for(tier: Scenario) -> Plan {
    match tier {
        Scenario::Starter => Plan {
            tier,
            description: "Perfect for small venues and bars",
            features: &[
                "Up to 4 cameras",
                "Basic AI detection",
                "Mobile app alerts",
                "7-day cloud storage",
                "Email support",
            ],
            price: PlanPrice::Fixed {
                monthly: 499.0,
                yearly: 399.0,
            },
            popular: false,
        },
        Scenario::Professional => Plan {
            tier,
            description: "Ideal for medium-sized venues and clubs",
            features: &[
                "Up to 12 cameras",
                "Advanced AI detection",
                "Real-time alerts",
                "30-day cloud storage",
                "Priority support",
                "Custom integrations",
                "Analytics dashboard",
            ],
            price: PlanPrice::Fixed {
                monthly: 1_499.0,
                yearly: 999.0,
            },
            popular: true,
        },
        Scenario::Enterprise => Plan {
            tier,
            description: "Custom pricing for enterprise needs",
            features: &[
                "Unlimited cameras",
                "Premium AI detection",
                "Instant alerts",
                "90-day cloud storage",
                "24/7 phone support",
                "Advanced analytics",
                "Dedicated account manager",
            ],
            price: PlanPrice::Custom,
            popular: false,
        },
    }
}

/// GBP-based conversion rates.
#[derive(Clone, Debug, PartialEq)]
pub struct RateTable {
    rates: HashMap<Currency, f64>,
}

impl RateTable {
    pub fn fallback() -> Self {
        Self {
            rates: HashMap::from([
                (Currency::Gbp, 1.0),
                (Currency::Usd, 1.25),
                (Currency::Eur, 1.15),
                (Currency::Aud, 1.9),
            ]),
        }
    }

    pub fn from_rates(rates: impl IntoIterator<Item = (Currency, f64)>) -> Self {
        let mut rates: HashMap<Currency, f64> = rates.into_iter().collect();
        rates.insert(Currency::Gbp, 1.0);
        Self { rates }
    }

    /// Falls back to 1.0 for a missing or unusable rate.
    pub fn rate(&self, currency: Currency) -> f64 {
        match self.rates.get(&currency) {
            Some(&rate) if rate.is_finite() && rate > 0.0 => rate,
            _ => 1.0,
        }
    }
}

/// Supplier of conversion rates, e.g. a live exchange-rate feed.
pub trait RateSource {
    fn rates(&self) -> Result<RateTable, RoiError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StaticRates;

impl RateSource for StaticRates {
    fn rates(&self) -> Result<RateTable, RoiError> {
        Ok(RateTable::fallback())
    }
}

pub fn resolve_rates(source: &dyn RateSource) -> RateTable {
    match source.rates() {
        Ok(table) => table,
        Err(err) => {
            tracing::warn!(error = %err, "falling back to static exchange rates");
            RateTable::fallback()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PriceQuote {
    #[serde(rename_all = "camelCase")]
    Fixed {
        currency: Currency,
        amount: f64,
        display: String,
    },
    Custom,
}

pub fn quote(plan: &Plan, cycle: BillingCycle, currency: Currency, rates: &RateTable) -> PriceQuote {
    let Some(fee) = plan.fee_for(cycle) else {
        return PriceQuote::Custom;
    };
    let amount = (fee * rates.rate(currency)).round();
    PriceQuote::Fixed {
        currency,
        amount,
        display: format!("{}{amount:.0}", currency.symbol()),
    }
}
