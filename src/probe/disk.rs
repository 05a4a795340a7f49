use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;

use super::{Deadline, Probe, ProbeKind, ProbeReport, StopReason};
use crate::error::ProbeError;
use crate::stats::Stats;

pub const PAYLOAD_LEN: usize = 10_000_000;

/// Writes a file at a fixed path and deletes it again, one cycle at a time.
#[derive(Debug, Clone)]
pub struct DiskProbe {
    path: PathBuf,
    payload_len: usize,
}

impl DiskProbe {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            payload_len: PAYLOAD_LEN,
        }
    }
}

impl Probe for DiskProbe {
    fn kind(&self) -> ProbeKind {
        ProbeKind::Disk
    }

    fn run(&self, limit: Duration) -> Result<ProbeReport, ProbeError> {
        info!(probe = "disk", path = %self.path.display(), "starting disk test");
        let payload = vec![b'0'; self.payload_len];
        let deadline = Deadline::start(limit);
        let mut stats = Stats::new();
        while !deadline.expired() {
            write_and_remove(&self.path, &payload)?;
            stats.add_bytes(payload.len());
            let n = stats.inc();
            info!(probe = "disk", iteration = n, "file written and deleted");
        }
        Ok(ProbeReport::new(
            ProbeKind::Disk,
            &stats,
            deadline.elapsed(),
            StopReason::Timeout,
        ))
    }
}

/// One full cycle; the file is closed before it is removed.
fn write_and_remove(path: &Path, payload: &[u8]) -> Result<(), ProbeError> {
    {
        let mut file = File::create(path)
            .map_err(|e| ProbeError::io(format!("create {}", path.display()), e))?;
        file.write_all(payload)
            .map_err(|e| ProbeError::io(format!("write {}", path.display()), e))?;
        file.flush()
            .map_err(|e| ProbeError::io(format!("flush {}", path.display()), e))?;
    }
    fs::remove_file(path).map_err(|e| ProbeError::io(format!("remove {}", path.display()), e))
}
