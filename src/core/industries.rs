use std::time::Duration;

use serde::Serialize;

use super::countup::{CountUp, CountUpFrame};

const COUNTER_DURATION: Duration = Duration::from_millis(1_500);
const STAT_STAGGER: Duration = Duration::from_millis(100);

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlineStat {
    pub label: &'static str,
    pub metric: f64,
    pub suffix: &'static str,
    pub delay_ms: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UseCase {
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionalPresence {
    pub region: &'static str,
    pub venues: u32,
    pub delay_ms: u64,
}

/// A labelled counter together with its animation schedule.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimatedCounter {
    pub label: &'static str,
    pub end: f64,
    pub suffix: &'static str,
    pub frames: Vec<CountUpFrame>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Showcase {
    pub stats: Vec<AnimatedCounter>,
    pub use_cases: Vec<UseCase>,
    pub regions: Vec<AnimatedCounter>,
}

pub fn headline_stats() -> Vec<HeadlineStat> {
    [
        ("Venues Protected", 500.0, "+"),
        ("Detection Rate", 99.9, "%"),
        ("Monitoring", 24.0, "/7"),
        ("Response Time", 2.0, "s"),
        ("Incident Reduction", 85.0, "%"),
        ("Cities Served", 50.0, "+"),
    ]
    .into_iter()
    .zip(0u32..)
    .map(|((label, metric, suffix), index)| HeadlineStat {
        label,
        metric,
        suffix,
        delay_ms: (STAT_STAGGER * index).as_millis() as u64,
    })
    .collect()
}

pub fn use_cases() -> Vec<UseCase> {
    vec![
        UseCase {
            title: "Crowd Control",
            description: "Monitor crowd density and detect potential disturbances before they escalate.",
        },
        UseCase {
            title: "Asset Protection",
            description: "Protect valuable equipment, cash, and inventory with intelligent monitoring.",
        },
        UseCase {
            title: "Staff Safety",
            description: "Ensure the safety of your employees with real-time threat detection.",
        },
        UseCase {
            title: "Compliance",
            description: "Meet regulatory requirements with comprehensive surveillance and reporting.",
        },
    ]
}

pub fn regional_presence() -> Vec<RegionalPresence> {
    vec![
        RegionalPresence {
            region: "North America",
            venues: 200,
            delay_ms: 0,
        },
        RegionalPresence {
            region: "Europe",
            venues: 150,
            delay_ms: 200,
        },
        RegionalPresence {
            region: "Asia Pacific",
            venues: 100,
            delay_ms: 400,
        },
        RegionalPresence {
            region: "Other Regions",
            venues: 50,
            delay_ms: 600,
        },
    ]
}

fn animate(label: &'static str, end: f64, suffix: &'static str, delay_ms: u64) -> AnimatedCounter {
    let counter = CountUp::new(end, COUNTER_DURATION, Duration::from_millis(delay_ms));
    AnimatedCounter {
        label,
        end,
        suffix,
        frames: counter.frames(),
    }
}

pub fn showcase() -> Showcase {
    let stats = headline_stats()
        .into_iter()
        .map(|s| animate(s.label, s.metric, s.suffix, s.delay_ms))
        .collect();
    let regions = regional_presence()
        .into_iter()
        .map(|r| animate(r.region, f64::from(r.venues), "+ Venues", r.delay_ms))
        .collect();

    Showcase {
        stats,
        use_cases: use_cases(),
        regions,
    }
}
