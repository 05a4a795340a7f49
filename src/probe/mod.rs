use std::fmt;
use std::time::{Duration, Instant};

use crate::config::BenchConfig;
use crate::error::ProbeError;

pub mod compute;
pub mod disk;
pub mod download;
pub mod memory;
pub mod report;
pub mod upload;

pub use report::{ProbeReport, StopReason};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    Memory,
    Compute,
    Disk,
    Download,
    Upload,
}

impl ProbeKind {
    /// Launch order used by `--all`.
    pub const ALL: [ProbeKind; 5] = [
        ProbeKind::Memory,
        ProbeKind::Compute,
        ProbeKind::Disk,
        ProbeKind::Upload,
        ProbeKind::Download,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ProbeKind::Memory => "ram",
            ProbeKind::Compute => "cpu",
            ProbeKind::Disk => "disk",
            ProbeKind::Download => "download",
            ProbeKind::Upload => "upload",
        }
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What happens to an error raised inside `Probe::run`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Hand it to the runner, ending the probe abnormally.
    Propagate,
    /// Log it at the probe boundary and finish normally.
    Contain,
}

pub trait Probe: Send + Sync {
    fn kind(&self) -> ProbeKind;

    fn policy(&self) -> ErrorPolicy {
        ErrorPolicy::Propagate
    }

    /// Loop until `limit` has elapsed on the probe's own clock.
    fn run(&self, limit: Duration) -> Result<ProbeReport, ProbeError>;
}

/// Wall-clock stop condition polled once per iteration.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    limit: Duration,
}

impl Deadline {
    pub fn start(limit: Duration) -> Self {
        Self {
            start: Instant::now(),
            limit,
        }
    }
    pub fn expired(&self) -> bool {
        self.start.elapsed() >= self.limit
    }
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

pub fn build(kind: ProbeKind, conf: &BenchConfig) -> Box<dyn Probe> {
    match kind {
        ProbeKind::Memory => Box::new(memory::MemoryProbe::new(conf.ram_max_blocks)),
        ProbeKind::Compute => Box::new(compute::ComputeProbe::default()),
        ProbeKind::Disk => Box::new(disk::DiskProbe::new(conf.disk_path.clone())),
        ProbeKind::Download => Box::new(download::DownloadProbe::new(
            conf.url.clone(),
            conf.http_timeout,
        )),
        ProbeKind::Upload => Box::new(upload::UploadProbe::new(
            conf.upload_host.clone(),
            conf.upload_port,
            conf.upload_buffer,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_expires() {
        let d = Deadline::start(Duration::from_millis(20));
        assert!(!d.expired());
        std::thread::sleep(Duration::from_millis(25));
        assert!(d.expired());
        assert!(d.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn zero_deadline_is_already_expired() {
        assert!(Deadline::start(Duration::ZERO).expired());
    }

    #[test]
    fn only_upload_contains_errors() {
        let conf = BenchConfig {
            duration: Duration::from_secs(60),
            ram_max_blocks: None,
            disk_path: "test_file".into(),
            url: "http://127.0.0.1:1/".into(),
            http_timeout: Duration::from_secs(1),
            upload_host: "127.0.0.1".into(),
            upload_port: 1,
            upload_buffer: 1024,
        };
        for kind in ProbeKind::ALL {
            let probe = build(kind, &conf);
            assert_eq!(probe.kind(), kind);
            let expected = match kind {
                ProbeKind::Upload => ErrorPolicy::Contain,
                _ => ErrorPolicy::Propagate,
            };
            assert_eq!(probe.policy(), expected, "{kind}");
        }
    }
}
