use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::{
        Json, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use crate::core::{
    BillingCycle, Currency, InputSet, Plan, PriceQuote, RateTable, RoiSummary, Scenario,
    Showcase, StaticRates, format_gbp, format_percent, plan_for, plans, quote, resolve_rates,
    showcase, summarize,
};
use crate::error::Result;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliScenario {
    Starter,
    Professional,
    Enterprise,
}

impl From<CliScenario> for Scenario {
    fn from(value: CliScenario) -> Self {
        match value {
            CliScenario::Starter => Scenario::Starter,
            CliScenario::Professional => Scenario::Professional,
            CliScenario::Enterprise => Scenario::Enterprise,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliCurrency {
    Gbp,
    Usd,
    Eur,
    Aud,
}

impl From<CliCurrency> for Currency {
    fn from(value: CliCurrency) -> Self {
        match value {
            CliCurrency::Gbp => Currency::Gbp,
            CliCurrency::Usd => Currency::Usd,
            CliCurrency::Eur => Currency::Eur,
            CliCurrency::Aud => Currency::Aud,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliBillingCycle {
    Monthly,
    Yearly,
}

impl From<CliBillingCycle> for BillingCycle {
    fn from(value: CliBillingCycle) -> Self {
        match value {
            CliBillingCycle::Monthly => BillingCycle::Monthly,
            CliBillingCycle::Yearly => BillingCycle::Yearly,
        }
    }
}

/// Partial input set; absent fields keep their defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RoiPayload {
    /// Scenario name, matched case-insensitively.
    scenario: Option<String>,

    unit_cost_violence_injury: Option<f64>,
    unit_cost_violence_no_injury: Option<f64>,
    unit_cost_fall: Option<f64>,

    count_violence_injury: Option<f64>,
    count_violence_no_injury: Option<f64>,
    count_falls: Option<f64>,

    guard_hourly_rate: Option<f64>,
    hours_saved_per_month: Option<f64>,
    annual_insurance_delta: Option<f64>,
    closure_hours_avoided: Option<f64>,
    revenue_per_hour: Option<f64>,
    #[serde(alias = "fee")]
    monthly_fee: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PricingQuery {
    currency: Option<String>,
    #[serde(alias = "cycle")]
    billing: Option<String>,
}

#[derive(Parser, Debug)]
#[command(
    name = "nightshield",
    about = "NightShield ROI calculator, plan pricing and showcase API"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "Log filter, e.g. info or nightshield=debug; defaults to RUST_LOG, then info"
    )]
    pub log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the monthly ROI summary for one set of inputs
    Calc(RoiArgs),
    /// Quote every plan in a display currency
    Pricing(PricingArgs),
    /// Serve the JSON API
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[derive(Args, Debug, Clone)]
struct RoiArgs {
    #[arg(
        long,
        value_enum,
        default_value_t = CliScenario::Professional,
        help = "Scenario tier scaling the per-incident unit costs"
    )]
    scenario: CliScenario,
    #[arg(long, default_value_t = 18000.0, help = "Cost per violent incident with injury (£)")]
    unit_cost_violence_injury: f64,
    #[arg(long, default_value_t = 7500.0, help = "Cost per violent incident without injury (£)")]
    unit_cost_violence_no_injury: f64,
    #[arg(long, default_value_t = 1900.0, help = "Cost per fall / medical incident (£)")]
    unit_cost_fall: f64,
    #[arg(long, default_value_t = 1.0, help = "Fights with injury this month")]
    count_violence_injury: f64,
    #[arg(long, default_value_t = 1.0, help = "Fights without injury this month")]
    count_violence_no_injury: f64,
    #[arg(long, default_value_t = 1.0, help = "Falls this month")]
    count_falls: f64,
    #[arg(long, default_value_t = 13.45, help = "Guard wage (£/hour)")]
    guard_hourly_rate: f64,
    #[arg(long, default_value_t = 80.0, help = "Guard hours repurposed per month")]
    hours_saved_per_month: f64,
    #[arg(long, default_value_t = 1200.0, help = "Annual insurance premium reduction (£)")]
    annual_insurance_delta: f64,
    #[arg(long, default_value_t = 0.0, help = "Closure hours avoided per month")]
    closure_hours_avoided: f64,
    #[arg(long, default_value_t = 1500.0, help = "Revenue per trading hour (£)")]
    revenue_per_hour: f64,
    #[arg(long, default_value_t = 1499.0, help = "Subscription fee (£/month)")]
    monthly_fee: f64,
    #[arg(
        long,
        value_enum,
        help = "Take the fee from the scenario's plan list price for this billing cycle \
                (ignored for custom-priced plans)"
    )]
    fee_from_plan: Option<CliBillingCycle>,
    #[arg(long, help = "Print the summary as JSON")]
    json: bool,
}

#[derive(Args, Debug, Clone)]
struct PricingArgs {
    #[arg(long, value_enum, default_value_t = CliCurrency::Gbp)]
    currency: CliCurrency,
    #[arg(long, value_enum, default_value_t = CliBillingCycle::Monthly)]
    billing: CliBillingCycle,
    #[arg(long, help = "Print the quotes as JSON")]
    json: bool,
}

/// Formatted strings for every figure, computed from the same snapshot.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DisplayStrings {
    violence: String,
    falls: String,
    labour: String,
    insurance: String,
    uptime: String,
    subscription_fee: String,
    total_benefit: String,
    net: String,
    roi_percent: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RoiResponse {
    inputs: InputSet,
    summary: RoiSummary,
    display: DisplayStrings,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanQuote {
    plan: Plan,
    quote: PriceQuote,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PricingResponse {
    currency: Currency,
    billing: BillingCycle,
    plans: Vec<PlanQuote>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

struct AppState {
    rates: RateTable,
}

fn build_inputs(args: &RoiArgs) -> InputSet {
    let scenario: Scenario = args.scenario.into();
    let monthly_fee = args
        .fee_from_plan
        .and_then(|cycle| plan_for(scenario).fee_for(cycle.into()))
        .unwrap_or(args.monthly_fee);

    InputSet {
        unit_cost_violence_injury: args.unit_cost_violence_injury,
        unit_cost_violence_no_injury: args.unit_cost_violence_no_injury,
        unit_cost_fall: args.unit_cost_fall,
        count_violence_injury: args.count_violence_injury,
        count_violence_no_injury: args.count_violence_no_injury,
        count_falls: args.count_falls,
        guard_hourly_rate: args.guard_hourly_rate,
        hours_saved_per_month: args.hours_saved_per_month,
        annual_insurance_delta: args.annual_insurance_delta,
        closure_hours_avoided: args.closure_hours_avoided,
        revenue_per_hour: args.revenue_per_hour,
        monthly_fee,
        scenario,
    }
}

fn inputs_from_payload(payload: RoiPayload) -> Result<InputSet> {
    let mut inputs = InputSet::default();

    if let Some(name) = payload.scenario.as_deref() {
        inputs.scenario = name.parse()?;
    }
    if let Some(v) = payload.unit_cost_violence_injury {
        inputs.unit_cost_violence_injury = v;
    }
    if let Some(v) = payload.unit_cost_violence_no_injury {
        inputs.unit_cost_violence_no_injury = v;
    }
    if let Some(v) = payload.unit_cost_fall {
        inputs.unit_cost_fall = v;
    }
    if let Some(v) = payload.count_violence_injury {
        inputs.count_violence_injury = v;
    }
    if let Some(v) = payload.count_violence_no_injury {
        inputs.count_violence_no_injury = v;
    }
    if let Some(v) = payload.count_falls {
        inputs.count_falls = v;
    }
    if let Some(v) = payload.guard_hourly_rate {
        inputs.guard_hourly_rate = v;
    }
    if let Some(v) = payload.hours_saved_per_month {
        inputs.hours_saved_per_month = v;
    }
    if let Some(v) = payload.annual_insurance_delta {
        inputs.annual_insurance_delta = v;
    }
    if let Some(v) = payload.closure_hours_avoided {
        inputs.closure_hours_avoided = v;
    }
    if let Some(v) = payload.revenue_per_hour {
        inputs.revenue_per_hour = v;
    }
    if let Some(v) = payload.monthly_fee {
        inputs.monthly_fee = v;
    }

    Ok(inputs)
}

fn build_roi_response(inputs: InputSet) -> RoiResponse {
    let summary = summarize(&inputs);
    let b = &summary.benefits;
    let t = &summary.totals;
    let display = DisplayStrings {
        violence: format_gbp(b.violence),
        falls: format_gbp(b.falls),
        labour: format_gbp(b.labour),
        insurance: format_gbp(b.insurance),
        uptime: format_gbp(b.uptime),
        subscription_fee: format!("- {}", format_gbp(summary.monthly_fee.abs())),
        total_benefit: format_gbp(t.total_benefit),
        net: format_gbp(t.net),
        roi_percent: format_percent(t.roi_percent),
    };

    RoiResponse {
        inputs,
        summary,
        display,
    }
}

fn build_pricing_response(
    currency: Currency,
    billing: BillingCycle,
    rates: &RateTable,
) -> PricingResponse {
    let plans = plans()
        .into_iter()
        .map(|plan| {
            let quote = quote(&plan, billing, currency, rates);
            PlanQuote { plan, quote }
        })
        .collect();

    PricingResponse {
        currency,
        billing,
        plans,
    }
}

fn pricing_params(query: PricingQuery) -> Result<(Currency, BillingCycle)> {
    let currency = match query.currency.as_deref() {
        Some(code) => code.parse()?,
        None => Currency::default(),
    };
    let billing = match query.billing.as_deref() {
        Some(cycle) => cycle.parse()?,
        None => BillingCycle::default(),
    };
    Ok((currency, billing))
}

fn render_summary(response: &RoiResponse) -> String {
    let s = &response.summary;
    let d = &response.display;
    let rows = [
        ("Violence benefit", d.violence.as_str()),
        ("Falls benefit", d.falls.as_str()),
        ("Labour repurposed", d.labour.as_str()),
        ("Insurance effect", d.insurance.as_str()),
        ("Uptime revenue", d.uptime.as_str()),
        ("Subscription fee", d.subscription_fee.as_str()),
        ("Total monthly benefit", d.total_benefit.as_str()),
        ("Net impact", d.net.as_str()),
        ("ROI %", d.roi_percent.as_str()),
    ];

    let mut out = format!("Scenario: {} ({}x)\n", s.scenario, s.multiplier);
    for (label, value) in rows {
        out.push_str(&format!("{label:<24}{value:>14}\n"));
    }
    out
}

fn render_pricing(response: &PricingResponse) -> String {
    let mut out = format!("Plans ({}, billed {})\n", response.currency, response.billing);
    for entry in &response.plans {
        let price = match &entry.quote {
            PriceQuote::Fixed { display, .. } => format!("{display}/mo"),
            PriceQuote::Custom => "Custom".to_string(),
        };
        let marker = if entry.plan.popular { " *" } else { "" };
        out.push_str(&format!(
            "{:<14}{:>12}  {}{marker}\n",
            entry.plan.tier.name(),
            price,
            entry.plan.description
        ));
    }
    out
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Calc(args) => {
            let response = build_roi_response(build_inputs(&args));
            if args.json {
                println!("{}", to_json(&response)?);
            } else {
                print!("{}", render_summary(&response));
            }
            Ok(())
        }
        Command::Pricing(args) => {
            let rates = resolve_rates(&StaticRates);
            let response = build_pricing_response(args.currency.into(), args.billing.into(), &rates);
            if args.json {
                println!("{}", to_json(&response)?);
            } else {
                print!("{}", render_pricing(&response));
            }
            Ok(())
        }
        Command::Serve { port } => run_http_server(port).await,
    }
}

pub async fn run_http_server(port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let state = Arc::new(AppState {
        rates: resolve_rates(&StaticRates),
    });

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "NightShield API listening");
    tracing::info!("local access: http://127.0.0.1:{port}/api/roi");

    axum::serve(listener, app(state)).await?;
    Ok(())
}

fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/roi", get(roi_get_handler).post(roi_post_handler))
        .route("/api/roi/defaults", get(roi_defaults_handler))
        .route("/api/pricing", get(pricing_handler))
        .route("/api/industries", get(industries_handler))
        .fallback(not_found_handler)
        .with_state(state)
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn roi_get_handler(
    payload: std::result::Result<Query<RoiPayload>, QueryRejection>,
) -> Response {
    match payload {
        Ok(Query(payload)) => roi_handler_impl(payload),
        Err(rejection) => error_response(StatusCode::BAD_REQUEST, &rejection.body_text()),
    }
}

async fn roi_post_handler(
    payload: std::result::Result<Json<RoiPayload>, JsonRejection>,
) -> Response {
    match payload {
        Ok(Json(payload)) => roi_handler_impl(payload),
        Err(rejection) => error_response(StatusCode::BAD_REQUEST, &rejection.body_text()),
    }
}

fn roi_handler_impl(payload: RoiPayload) -> Response {
    let inputs = match inputs_from_payload(payload) {
        Ok(inputs) => inputs,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, &err.to_string()),
    };
    tracing::debug!(scenario = %inputs.scenario, fee = inputs.monthly_fee, "roi request");
    json_response(StatusCode::OK, build_roi_response(inputs))
}

async fn roi_defaults_handler() -> Response {
    json_response(StatusCode::OK, InputSet::default())
}

async fn pricing_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PricingQuery>,
) -> Response {
    let (currency, billing) = match pricing_params(query) {
        Ok(params) => params,
        Err(err) => return error_response(StatusCode::BAD_REQUEST, &err.to_string()),
    };
    tracing::debug!(%currency, %billing, "pricing request");
    json_response(
        StatusCode::OK,
        build_pricing_response(currency, billing, &state.rates),
    )
}

async fn industries_handler() -> Response {
    let body: Showcase = showcase();
    json_response(StatusCode::OK, body)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn inputs_from_json(json: &str) -> std::result::Result<InputSet, String> {
    let payload = serde_json::from_str::<RoiPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    inputs_from_payload(payload).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn parse_cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(args.iter().copied()).expect("valid command line")
    }

    fn calc_args(args: &[&str]) -> RoiArgs {
        let mut argv = vec!["nightshield", "calc"];
        argv.extend_from_slice(args);
        match parse_cli(&argv).command {
            Command::Calc(args) => args,
            other => panic!("expected calc, got {other:?}"),
        }
    }

    #[test]
    fn calc_defaults_match_baseline_inputs() {
        let inputs = build_inputs(&calc_args(&[]));
        assert_eq!(inputs, InputSet::default());
    }

    #[test]
    fn calc_fee_is_independent_of_scenario_by_default() {
        let starter = build_inputs(&calc_args(&["--scenario", "starter"]));
        assert_eq!(starter.scenario, Scenario::Starter);
        assert_approx(starter.monthly_fee, 1_499.0);

        let explicit = build_inputs(&calc_args(&["--scenario", "starter", "--monthly-fee", "0"]));
        assert_approx(explicit.monthly_fee, 0.0);
    }

    #[test]
    fn calc_fee_can_follow_plan_list_price() {
        let starter = build_inputs(&calc_args(&[
            "--scenario",
            "starter",
            "--fee-from-plan",
            "yearly",
        ]));
        assert_approx(starter.monthly_fee, 399.0);

        let enterprise = build_inputs(&calc_args(&[
            "--scenario",
            "enterprise",
            "--fee-from-plan",
            "monthly",
            "--monthly-fee",
            "2500",
        ]));
        assert_approx(enterprise.monthly_fee, 2_500.0);
    }

    #[test]
    fn calc_rejects_unknown_scenario() {
        let err = Cli::try_parse_from(["nightshield", "calc", "--scenario", "platinum"])
            .expect_err("must reject unknown scenario");
        assert!(err.to_string().contains("platinum"));
    }

    #[test]
    fn inputs_from_json_applies_overrides_over_defaults() {
        let inputs = inputs_from_json(
            r#"{
                "scenario": "enterprise",
                "countFalls": 3,
                "closureHoursAvoided": 2,
                "fee": 999
            }"#,
        )
        .expect("valid payload");

        assert_eq!(inputs.scenario, Scenario::Enterprise);
        assert_approx(inputs.count_falls, 3.0);
        assert_approx(inputs.closure_hours_avoided, 2.0);
        assert_approx(inputs.monthly_fee, 999.0);
        assert_approx(inputs.unit_cost_violence_injury, 18_000.0);
        assert_approx(inputs.guard_hourly_rate, 13.45);
    }

    #[test]
    fn inputs_from_json_parses_scenario_names_case_insensitively() {
        let inputs = inputs_from_json(r#"{"scenario":"Starter"}"#).expect("valid payload");
        assert_eq!(inputs.scenario, Scenario::Starter);

        let inputs = inputs_from_json(r#"{"scenario":"ENTERPRISE"}"#).expect("valid payload");
        assert_eq!(inputs.scenario, Scenario::Enterprise);

        let err = inputs_from_json(r#"{"scenario":"gold"}"#).expect_err("unknown scenario");
        assert!(err.contains("unknown scenario 'gold'"), "{err}");
    }

    #[test]
    fn roi_response_serialization_contains_expected_fields() {
        let response = build_roi_response(InputSet::default());
        let json = serde_json::to_value(&response).expect("serializable");

        assert_eq!(json["inputs"]["monthlyFee"], 1499.0);
        assert_eq!(json["inputs"]["scenario"], "Professional");
        assert_eq!(json["summary"]["multiplier"], 1.0);
        assert_eq!(json["summary"]["benefits"]["violence"], 25_500.0);
        assert_eq!(json["summary"]["totals"]["totalBenefit"], 28_576.0);
        assert_eq!(json["summary"]["totals"]["net"], 27_077.0);
        assert_eq!(json["display"]["totalBenefit"], "£28,576");
        assert_eq!(json["display"]["net"], "£27,077");
        assert_eq!(json["display"]["labour"], "£1,076");
        assert_eq!(json["display"]["subscriptionFee"], "- £1,499");
        assert_eq!(json["display"]["roiPercent"], "1,806%");
    }

    #[test]
    fn zero_fee_response_shows_zero_roi() {
        let inputs = InputSet {
            monthly_fee: 0.0,
            ..InputSet::default()
        };
        let response = build_roi_response(inputs);
        assert_eq!(response.summary.totals.roi_percent, 0.0);
        assert_eq!(response.display.roi_percent, "0%");
        assert_eq!(response.display.subscription_fee, "- £0");
    }

    #[test]
    fn non_finite_inputs_render_placeholders() {
        let inputs = InputSet {
            unit_cost_fall: f64::NAN,
            ..InputSet::default()
        };
        let response = build_roi_response(inputs);
        assert_eq!(response.display.falls, "£0");
        assert_eq!(response.display.total_benefit, "£0");
        assert_eq!(response.display.roi_percent, "0%");
    }

    #[test]
    fn pricing_params_parse_and_reject() {
        let (currency, billing) = pricing_params(PricingQuery {
            currency: Some("usd".to_string()),
            billing: Some("yearly".to_string()),
        })
        .expect("valid query");
        assert_eq!(currency, Currency::Usd);
        assert_eq!(billing, BillingCycle::Yearly);

        let defaults = pricing_params(PricingQuery::default()).expect("defaults");
        assert_eq!(defaults, (Currency::Gbp, BillingCycle::Monthly));

        let err = pricing_params(PricingQuery {
            currency: Some("JPY".to_string()),
            billing: None,
        })
        .expect_err("unknown currency");
        assert!(err.to_string().contains("JPY"));
    }

    #[test]
    fn pricing_response_quotes_every_plan() {
        let response =
            build_pricing_response(Currency::Eur, BillingCycle::Yearly, &RateTable::fallback());
        let json = serde_json::to_value(&response).expect("serializable");

        assert_eq!(json["currency"], "EUR");
        assert_eq!(json["billing"], "yearly");
        let plans = json["plans"].as_array().expect("plans array");
        assert_eq!(plans.len(), 3);
        // 399 * 1.15 = 458.85
        assert_eq!(plans[0]["quote"]["display"], "€459");
        assert_eq!(plans[1]["quote"]["amount"], 1_149.0);
        assert_eq!(plans[2]["quote"]["kind"], "custom");
        assert_eq!(plans[1]["plan"]["popular"], true);
    }

    #[test]
    fn rendered_summary_lists_every_figure() {
        let text = render_summary(&build_roi_response(InputSet::default()));
        assert!(text.starts_with("Scenario: Professional (1x)"));
        for needle in ["£25,500", "£1,900", "£100", "- £1,499", "£28,576", "1,806%"] {
            assert!(text.contains(needle), "missing {needle} in\n{text}");
        }
    }

    struct HttpReply {
        status: u16,
        head: String,
        body: String,
    }

    impl HttpReply {
        fn header(&self, name: &str) -> Option<&str> {
            self.head.lines().skip(1).find_map(|line| {
                let (key, value) = line.split_once(':')?;
                key.eq_ignore_ascii_case(name).then(|| value.trim())
            })
        }

        fn json(&self) -> serde_json::Value {
            serde_json::from_str(&self.body).expect("JSON body")
        }
    }

    /// Serves the router on a loopback port for one request.
    async fn send(method: &str, target: &str, body: Option<&str>) -> HttpReply {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let state = Arc::new(AppState {
            rates: RateTable::fallback(),
        });
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let server = tokio::spawn(async move { axum::serve(listener, app(state)).await });

        let body = body.unwrap_or("");
        let request = format!(
            "{method} {target} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\
             Content-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
            body.len()
        );
        let mut stream = tokio::net::TcpStream::connect(addr).await.expect("connect");
        stream.write_all(request.as_bytes()).await.expect("write request");
        let mut raw = String::new();
        stream.read_to_string(&mut raw).await.expect("read response");
        server.abort();

        let (head, body) = raw.split_once("\r\n\r\n").expect("header terminator");
        let status = head
            .split_whitespace()
            .nth(1)
            .and_then(|code| code.parse().ok())
            .expect("status code");
        HttpReply {
            status,
            head: head.to_string(),
            body: body.to_string(),
        }
    }

    #[tokio::test]
    async fn router_rejects_unknown_scenario_with_json_error() {
        let reply = send("GET", "/api/roi?scenario=gold", None).await;
        assert_eq!(reply.status, 400);
        assert!(reply.header("content-type").unwrap_or("").starts_with("application/json"));
        assert!(reply.json()["error"].as_str().unwrap_or("").contains("gold"));

        let reply = send("POST", "/api/roi", Some(r#"{"scenario":"gold"}"#)).await;
        assert_eq!(reply.status, 400);
        assert!(reply.json()["error"].as_str().unwrap_or("").contains("gold"));
        assert_eq!(reply.header("cache-control"), Some("no-store"));
    }

    #[tokio::test]
    async fn router_accepts_scenario_in_any_case() {
        let reply = send("GET", "/api/roi?scenario=ENTERPRISE&countFalls=2", None).await;
        assert_eq!(reply.status, 200);
        let json = reply.json();
        assert_eq!(json["summary"]["scenario"], "Enterprise");
        assert_eq!(json["summary"]["multiplier"], 1.25);
        assert_eq!(json["inputs"]["countFalls"], 2.0);

        let reply = send("POST", "/api/roi", Some(r#"{"scenario":"starter","fee":0}"#)).await;
        assert_eq!(reply.status, 200);
        assert_eq!(reply.json()["display"]["roiPercent"], "0%");
    }

    #[tokio::test]
    async fn router_reports_malformed_body_as_json_error() {
        let reply = send("POST", "/api/roi", Some(r#"{"countFalls":"three"}"#)).await;
        assert_eq!(reply.status, 400);
        assert!(reply.json()["error"].is_string());
    }

    #[tokio::test]
    async fn router_serves_defaults_without_caching() {
        let reply = send("GET", "/api/roi/defaults", None).await;
        assert_eq!(reply.status, 200);
        assert_eq!(reply.header("cache-control"), Some("no-store"));
        let json = reply.json();
        assert_eq!(json["monthlyFee"], 1499.0);
        assert_eq!(json["scenario"], "Professional");
        assert_eq!(json["guardHourlyRate"], 13.45);
    }

    #[tokio::test]
    async fn router_answers_unknown_paths_with_json_not_found() {
        let reply = send("GET", "/api/nope", None).await;
        assert_eq!(reply.status, 404);
        assert_eq!(reply.header("cache-control"), Some("no-store"));
        assert_eq!(reply.json(), serde_json::json!({ "error": "Not found" }));
    }

    #[tokio::test]
    async fn router_rejects_unknown_currency_and_quotes_known_ones() {
        let reply = send("GET", "/api/pricing?currency=JPY", None).await;
        assert_eq!(reply.status, 400);
        assert!(reply.json()["error"].as_str().unwrap_or("").contains("JPY"));

        let reply = send("GET", "/api/pricing?currency=usd&billing=yearly", None).await;
        assert_eq!(reply.status, 200);
        assert_eq!(reply.header("cache-control"), Some("no-store"));
        let json = reply.json();
        assert_eq!(json["currency"], "USD");
        assert_eq!(json["plans"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn rendered_pricing_marks_popular_plan() {
        let response =
            build_pricing_response(Currency::Gbp, BillingCycle::Monthly, &RateTable::fallback());
        let text = render_pricing(&response);
        assert!(text.contains("£1499/mo"));
        assert!(text.contains("Custom"));
        let pro_line = text
            .lines()
            .find(|l| l.starts_with("Professional"))
            .expect("professional row");
        assert!(pro_line.ends_with(" *"));
    }
}
