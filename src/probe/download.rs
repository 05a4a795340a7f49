use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use tracing::info;

use super::{Deadline, Probe, ProbeKind, ProbeReport, StopReason};
use crate::error::ProbeError;
use crate::stats::{Stats, mib_per_sec};

#[derive(Debug, Clone)]
pub struct DownloadProbe {
    url: String,
    timeout: Duration,
}

impl DownloadProbe {
    pub fn new(url: String, timeout: Duration) -> Self {
        Self { url, timeout }
    }

    fn client(&self) -> Result<Client, ProbeError> {
        Ok(Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("load-hammer/", env!("CARGO_PKG_VERSION")))
            .build()?)
    }
}

impl Probe for DownloadProbe {
    fn kind(&self) -> ProbeKind {
        ProbeKind::Download
    }

    fn run(&self, limit: Duration) -> Result<ProbeReport, ProbeError> {
        info!(probe = "download", url = %self.url, "starting download test");
        let client = self.client()?;
        let deadline = Deadline::start(limit);
        let mut stats = Stats::new();
        while !deadline.expired() {
            let t0 = Instant::now();
            let body = client.get(&self.url).send()?.error_for_status()?.bytes()?;
            let took = t0.elapsed();
            stats.add_bytes(body.len());
            stats.inc();
            if !took.is_zero() {
                info!(
                    probe = "download",
                    "{} bytes downloaded in {:.2} seconds at {:.2} MiB/s",
                    body.len(),
                    took.as_secs_f64(),
                    mib_per_sec(body.len() as u64, took)
                );
            }
        }
        Ok(ProbeReport::new(
            ProbeKind::Download,
            &stats,
            deadline.elapsed(),
            StopReason::Timeout,
        ))
    }
}
