use std::time::Duration;

use serde::Serialize;

pub const DEFAULT_STEPS: u32 = 50;

/// A counter that climbs from 0 to `end` in equal increments.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CountUp {
    pub end: f64,
    pub duration: Duration,
    pub delay: Duration,
    pub steps: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountUpFrame {
    pub at_ms: u64,
    pub value: f64,
}

impl CountUp {
    pub fn new(end: f64, duration: Duration, delay: Duration) -> Self {
        Self {
            end,
            duration,
            delay,
            steps: DEFAULT_STEPS,
        }
    }

    pub fn increment(&self) -> f64 {
        (self.end / f64::from(self.steps.max(1))).ceil()
    }

    pub fn interval(&self) -> Duration {
        self.duration / self.steps.max(1)
    }

    /// Frame schedule relative to mount. Values never overshoot `end` and the
    /// final frame holds `end` exactly.
    pub fn frames(&self) -> Vec<CountUpFrame> {
        let start = CountUpFrame {
            at_ms: millis(self.delay),
            value: 0.0,
        };
        if !self.end.is_finite() {
            return vec![start];
        }
        if self.end <= 0.0 {
            return vec![CountUpFrame {
                value: self.end,
                ..start
            }];
        }

        let step = self.increment();
        let interval = self.interval();
        let mut frames = vec![start];
        let mut tick: u32 = 0;
        let mut value = 0.0;
        while value < self.end {
            tick += 1;
            value = (f64::from(tick) * step).min(self.end);
            frames.push(CountUpFrame {
                at_ms: millis(self.delay + interval * tick),
                value,
            });
        }
        frames
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
