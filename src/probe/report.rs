use std::time::Duration;

use tracing::info;

use super::ProbeKind;
use crate::stats::{Stats, mbit_per_sec, to_mib};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The deadline was reached.
    Timeout,
    /// The memory probe hit its configured block cap.
    Capped,
}

/// Result of one probe run that finished without error.
#[derive(Debug, Clone)]
pub struct ProbeReport {
    pub kind: ProbeKind,
    pub elapsed: Duration,
    pub iterations: u64,
    pub bytes: u64,
    pub stop: StopReason,
    /// Mean size of the retained blocks (memory probe only).
    pub mean_block_bytes: Option<f64>,
}

impl ProbeReport {
    pub fn new(kind: ProbeKind, stats: &Stats, elapsed: Duration, stop: StopReason) -> Self {
        Self {
            kind,
            elapsed,
            iterations: stats.iterations,
            bytes: stats.bytes,
            stop,
            mean_block_bytes: None,
        }
    }

    pub fn log(&self) {
        let secs = self.elapsed.as_secs_f64();
        let probe = self.kind.name();
        match self.kind {
            ProbeKind::Memory => {
                info!(probe, "RAM test finished after {:.2} seconds", secs);
                info!(
                    probe,
                    "mean memory allocated per iteration: {:.2} MiB",
                    to_mib(self.mean_block_bytes.unwrap_or(0.0))
                );
            }
            ProbeKind::Compute => info!(
                probe,
                iterations = self.iterations,
                "CPU test finished after {:.2} seconds",
                secs
            ),
            ProbeKind::Disk => info!(
                probe,
                iterations = self.iterations,
                "disk test finished after {:.2} seconds",
                secs
            ),
            ProbeKind::Download => info!(
                probe,
                "download test finished, total downloaded: {:.2} MiB",
                to_mib(self.bytes as f64)
            ),
            ProbeKind::Upload => info!(
                probe,
                bytes = self.bytes,
                "upload test finished, throughput: {:.2} Mbit/s",
                mbit_per_sec(self.bytes, self.elapsed)
            ),
        }
        if self.stop == StopReason::Capped {
            info!(probe, "stopped early at the configured block cap");
        }
    }
}
