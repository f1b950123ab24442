//! Count-up animation for the home page statistics.
//!
//! The timer is owned by a [`CountUp`] handle: it starts when the handle is
//! created and is aborted when the handle is dropped.
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::trace;

pub const DEFAULT_DURATION: Duration = Duration::from_millis(2000);
pub const DEFAULT_STEPS: u32 = 50;
const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stat {
    pub label: &'static str,
    pub value: u64,
    pub prefix: &'static str,
    pub suffix: &'static str,
}

pub const HOME_STATS: [Stat; 4] = [
    Stat {
        label: "Families Supported",
        value: 500,
        prefix: "",
        suffix: "+",
    },
    Stat {
        label: "Artworks Sold",
        value: 1000,
        prefix: "",
        suffix: "+",
    },
    Stat {
        label: "Total Donations",
        value: 250_000,
        prefix: "$",
        suffix: "",
    },
    Stat {
        label: "Young Artists",
        value: 750,
        prefix: "",
        suffix: "+",
    },
];

impl Stat {
    pub fn render(&self, count: u64) -> String {
        format!("{}{}{}", self.prefix, group_thousands(count), self.suffix)
    }
}

/// `250000` -> `250,000`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Values shown on each tick; the last one is always `target`.
pub fn frames(target: u64, steps: u32) -> Vec<u64> {
    let steps = u64::from(steps.max(1));
    (1..=steps).map(|i| target * i / steps).collect()
}

#[derive(Debug)]
pub struct CountUp {
    target: u64,
    rx: watch::Receiver<u64>,
    task: JoinHandle<()>,
}

impl CountUp {
    pub fn start(target: u64) -> Self {
        Self::with_timing(target, DEFAULT_DURATION, DEFAULT_STEPS)
    }

    /// Must be called inside a tokio runtime.
    pub fn with_timing(target: u64, duration: Duration, steps: u32) -> Self {
        let (tx, rx) = watch::channel(0u64);
        // `interval` rejects a zero period.
        let period = (duration / steps.max(1)).max(MIN_PERIOD);
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            for value in frames(target, steps) {
                ticker.tick().await;
                trace!(value, "count-up tick");
                if tx.send(value).is_err() {
                    break;
                }
            }
        });
        Self { target, rx, task }
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn value(&self) -> u64 {
        *self.rx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.rx.clone()
    }

    /// Resolve once the count reaches its target (or the timer died).
    pub async fn finished(&mut self) -> u64 {
        let target = self.target;
        if let Ok(v) = self.rx.wait_for(|v| *v >= target).await {
            return *v;
        }
        *self.rx.borrow()
    }
}

impl Drop for CountUp {
    fn drop(&mut self) {
        self.task.abort();
    }
}
