use clap::Parser;

use crate::probe::ProbeKind;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "load-hammer",
    about = "Stress RAM, CPU, disk and network for a fixed duration"
)]
pub struct Cli {
    /// Run every test concurrently
    #[arg(long)]
    pub all: bool,
    /// Memory allocation test
    #[arg(long)]
    pub ram: bool,
    /// CPU computation test
    #[arg(long)]
    pub cpu: bool,
    /// Disk write/delete test
    #[arg(long)]
    pub disk: bool,
    /// HTTP download test
    #[arg(long)]
    pub download: bool,
    /// TCP upload test
    #[arg(long)]
    pub upload: bool,

    /// Test duration in minutes (minimum 1)
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub duration: i64,

    /// Stop the RAM test after retaining this many blocks
    #[arg(long)]
    pub ram_max_blocks: Option<usize>,
    /// File written and deleted by the disk test
    #[arg(long, default_value = "test_file")]
    pub disk_path: String,
    /// Resource fetched by the download test
    #[arg(long, default_value = "http://ping.online.net/50Mo.dat")]
    pub url: String,
    /// Per-request timeout for the download test, in seconds
    #[arg(long, default_value_t = 300)]
    pub http_timeout: u64,
    /// Host receiving the upload stream
    #[arg(long, default_value = "nyc.speedtest.clouvider.net")]
    pub upload_host: String,
    /// Port receiving the upload stream
    #[arg(long, default_value_t = 5201)]
    pub upload_port: u16,
    /// Bytes per upload write
    #[arg(long, default_value_t = 1024)]
    pub upload_buffer: usize,
}

/// What the runner was asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    All,
    One(ProbeKind),
}

impl Cli {
    /// `--all` wins; otherwise the first individual flag in a fixed order.
    pub fn selection(&self) -> Option<Selection> {
        if self.all {
            return Some(Selection::All);
        }
        [
            (self.download, ProbeKind::Download),
            (self.upload, ProbeKind::Upload),
            (self.disk, ProbeKind::Disk),
            (self.cpu, ProbeKind::Compute),
            (self.ram, ProbeKind::Memory),
        ]
        .into_iter()
        .find_map(|(on, kind)| on.then_some(Selection::One(kind)))
    }
}
