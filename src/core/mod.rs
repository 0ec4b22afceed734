mod countup;
mod engine;
mod format;
mod industries;
mod pricing;
mod types;

pub use countup::{CountUp, CountUpFrame, DEFAULT_STEPS};
pub use engine::{compute_benefits, compute_totals, reset_to_defaults, summarize};
pub use format::{Currency, format_currency, format_gbp, format_int, format_percent};
pub use industries::{
    AnimatedCounter, HeadlineStat, RegionalPresence, Showcase, UseCase, headline_stats,
    regional_presence, showcase, use_cases,
};
pub use pricing::{
    BillingCycle, Plan, PlanPrice, PriceQuote, RateSource, RateTable, StaticRates, plan_for,
    plans, quote, resolve_rates,
};
pub use types::{BenefitBreakdown, InputField, InputSet, RoiSummary, Scenario, Totals};
