use std::hint::black_box;
use std::time::Duration;

use tracing::info;

use super::{Deadline, Probe, ProbeKind, ProbeReport, StopReason};
use crate::error::ProbeError;
use crate::stats::Stats;

pub const RANGE: u64 = 100_000;
const PROGRESS_EVERY: u64 = 10;

#[derive(Debug, Clone)]
pub struct ComputeProbe {
    range: u64,
}

impl Default for ComputeProbe {
    fn default() -> Self {
        Self { range: RANGE }
    }
}

impl Probe for ComputeProbe {
    fn kind(&self) -> ProbeKind {
        ProbeKind::Compute
    }

    fn run(&self, limit: Duration) -> Result<ProbeReport, ProbeError> {
        info!(probe = "cpu", "starting CPU test");
        let deadline = Deadline::start(limit);
        let mut stats = Stats::new();
        while !deadline.expired() {
            black_box(squares(black_box(self.range)));
            let n = stats.inc();
            if n % PROGRESS_EVERY == 0 {
                info!(probe = "cpu", iteration = n, "CPU busy computing");
            }
        }
        Ok(ProbeReport::new(
            ProbeKind::Compute,
            &stats,
            deadline.elapsed(),
            StopReason::Timeout,
        ))
    }
}

fn squares(n: u64) -> Vec<u64> {
    (0..n).map(|x| x * x).collect()
}
