use std::time::Duration;

use tracing::info;

use super::{Deadline, Probe, ProbeKind, ProbeReport, StopReason};
use crate::error::ProbeError;
use crate::stats::Stats;

pub const BLOCK_ELEMS: usize = 100_000;
const PROGRESS_EVERY: u64 = 100;

/// Allocates fixed-size blocks and keeps every one of them until the end.
#[derive(Debug, Clone)]
pub struct MemoryProbe {
    block_elems: usize,
    max_blocks: Option<usize>,
}

impl MemoryProbe {
    pub fn new(max_blocks: Option<usize>) -> Self {
        Self {
            block_elems: BLOCK_ELEMS,
            max_blocks,
        }
    }

    fn fill(&self, deadline: &Deadline) -> (Vec<Vec<u64>>, Stats, StopReason) {
        let mut blocks: Vec<Vec<u64>> = Vec::new();
        let mut stats = Stats::new();
        let stop = loop {
            if deadline.expired() {
                break StopReason::Timeout;
            }
            if let Some(max) = self.max_blocks
                && blocks.len() >= max
            {
                break StopReason::Capped;
            }
            blocks.push(alloc_block(self.block_elems));
            stats.add_bytes(self.block_elems * size_of::<u64>());
            let n = stats.inc();
            if n % PROGRESS_EVERY == 0 {
                info!(probe = "ram", iteration = n, "memory allocated so far");
            }
        };
        (blocks, stats, stop)
    }
}

impl Probe for MemoryProbe {
    fn kind(&self) -> ProbeKind {
        ProbeKind::Memory
    }

    fn run(&self, limit: Duration) -> Result<ProbeReport, ProbeError> {
        info!(probe = "ram", "starting RAM test");
        let deadline = Deadline::start(limit);
        let (blocks, stats, stop) = self.fill(&deadline);
        let mut report = ProbeReport::new(ProbeKind::Memory, &stats, deadline.elapsed(), stop);
        report.mean_block_bytes = mean_block_bytes(&blocks);
        Ok(report)
    }
}

/// Filled explicitly so the pages are committed.
fn alloc_block(elems: usize) -> Vec<u64> {
    let mut block = Vec::with_capacity(elems);
    block.resize(elems, 0u64);
    block
}

fn mean_block_bytes(blocks: &[Vec<u64>]) -> Option<f64> {
    if blocks.is_empty() {
        return None;
    }
    let total: usize = blocks.iter().map(|b| b.len() * size_of::<u64>()).sum();
    Some(total as f64 / blocks.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(max_blocks: Option<usize>) -> MemoryProbe {
        MemoryProbe {
            block_elems: 16,
            max_blocks,
        }
    }

    #[test]
    fn retained_blocks_match_iterations() {
        let deadline = Deadline::start(Duration::from_millis(2));
        let (blocks, stats, stop) = small(None).fill(&deadline);
        assert_eq!(stop, StopReason::Timeout);
        assert!(stats.iterations > 0);
        assert_eq!(blocks.len() as u64, stats.iterations);
        assert_eq!(stats.bytes, stats.iterations * 16 * 8);
        assert!(blocks.iter().all(|b| b.len() == 16));
    }

    #[test]
    fn cap_stops_allocation() {
        let deadline = Deadline::start(Duration::from_secs(30));
        let (blocks, stats, stop) = small(Some(5)).fill(&deadline);
        assert_eq!(stop, StopReason::Capped);
        assert_eq!(blocks.len(), 5);
        assert_eq!(stats.iterations, 5);
    }

    #[test]
    fn mean_is_block_size() {
        let probe = small(Some(3));
        let report = probe.run(Duration::from_secs(30)).unwrap();
        assert_eq!(report.kind, ProbeKind::Memory);
        assert_eq!(report.iterations, 3);
        assert_eq!(report.mean_block_bytes, Some(128.0));
        assert_eq!(mean_block_bytes(&[]), None);
    }

    #[test]
    fn default_block_size() {
        assert_eq!(alloc_block(BLOCK_ELEMS).len() * size_of::<u64>(), 800_000);
    }
}
