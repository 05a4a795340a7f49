use std::time::Duration;

const MIB: f64 = 1024.0 * 1024.0;

/// Counters for one probe run.
#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub iterations: u64,
    pub bytes: u64,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn inc(&mut self) -> u64 {
        self.iterations += 1;
        self.iterations
    }
    pub fn add_bytes(&mut self, n: usize) {
        self.bytes += n as u64;
    }
}

pub fn to_mib(bytes: f64) -> f64 {
    bytes / MIB
}

/// Byte rate in MiB/s; zero when no time has passed.
pub fn mib_per_sec(bytes: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs <= 0.0 {
        return 0.0;
    }
    to_mib(bytes as f64) / secs
}

/// Bit rate in Mbit/s (2^20 bits); zero when no time has passed.
pub fn mbit_per_sec(bytes: u64, elapsed: Duration) -> f64 {
    mib_per_sec(bytes, elapsed) * 8.0
}
