use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::{error, info};

use crate::cli::Selection;
use crate::config::BenchConfig;
use crate::error::ProbeError;
use crate::probe::{self, ErrorPolicy, Probe, ProbeKind, ProbeReport};

/// How a single probe ended, as seen by the runner.
#[derive(Debug)]
pub enum Outcome {
    Finished(ProbeReport),
    /// The probe failed but its policy kept the failure inside it.
    Contained,
    Failed(String),
}

pub struct Runner {
    config: BenchConfig,
}

impl Runner {
    pub fn new(config: BenchConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, selection: Selection) -> Result<()> {
        match selection {
            Selection::One(kind) => {
                let probe = probe::build(kind, &self.config);
                execute(probe.as_ref(), self.config.duration)
                    .with_context(|| format!("{kind} test"))?;
                Ok(())
            }
            Selection::All => self.run_all(),
        }
    }

    fn run_all(&self) -> Result<()> {
        let probes: Vec<Box<dyn Probe>> = ProbeKind::ALL
            .into_iter()
            .map(|kind| probe::build(kind, &self.config))
            .collect();
        let outcomes = run_concurrently(&probes, self.config.duration)?;
        info!("all tests complete");

        let failed: Vec<String> = outcomes
            .iter()
            .filter_map(|(kind, o)| match o {
                Outcome::Failed(reason) => Some(format!("{kind} ({reason})")),
                _ => None,
            })
            .collect();
        if !failed.is_empty() {
            bail!("tests stopped by error: {}", failed.join(", "));
        }
        Ok(())
    }
}

/// Runs one probe and applies its error policy.
pub fn execute(probe: &dyn Probe, limit: Duration) -> Result<Option<ProbeReport>, ProbeError> {
    match probe.run(limit) {
        Ok(report) => {
            report.log();
            Ok(Some(report))
        }
        Err(e) => match probe.policy() {
            ErrorPolicy::Propagate => Err(e),
            ErrorPolicy::Contain => {
                let probe = probe.kind().name();
                error!(probe, "error during connection or test: {e}");
                info!(probe, "{probe} test ended without a throughput figure");
                Ok(None)
            }
        },
    }
}

/// One thread per probe, joined before returning.
pub fn run_concurrently(
    probes: &[Box<dyn Probe>],
    limit: Duration,
) -> Result<Vec<(ProbeKind, Outcome)>> {
    thread::scope(|s| -> Result<Vec<(ProbeKind, Outcome)>> {
        let mut handles = Vec::with_capacity(probes.len());
        for p in probes {
            let kind = p.kind();
            let handle = thread::Builder::new()
                .name(format!("probe-{kind}"))
                .spawn_scoped(s, move || execute(p.as_ref(), limit))
                .with_context(|| format!("spawning {kind} probe"))?;
            handles.push((kind, handle));
        }

        let outcomes = handles
            .into_iter()
            .map(|(kind, handle)| {
                let outcome = match handle.join() {
                    Ok(Ok(Some(report))) => Outcome::Finished(report),
                    Ok(Ok(None)) => Outcome::Contained,
                    Ok(Err(e)) => {
                        error!(probe = kind.name(), "test stopped by error: {e}");
                        Outcome::Failed(e.to_string())
                    }
                    Err(_) => {
                        error!(probe = kind.name(), "test thread panicked");
                        Outcome::Failed("panicked".into())
                    }
                };
                (kind, outcome)
            })
            .collect();
        Ok(outcomes)
    })
}
