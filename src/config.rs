use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Cli;
use crate::error::ConfigError;

pub const MIN_DURATION_MINUTES: i64 = 1;

#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// How long every probe keeps looping.
    pub duration: Duration,
    pub ram_max_blocks: Option<usize>,
    pub disk_path: PathBuf,
    pub url: String,
    pub http_timeout: Duration,
    pub upload_host: String,
    pub upload_port: u16,
    pub upload_buffer: usize,
}

impl BenchConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let duration = duration_from_minutes(cli.duration)?;
        if cli.upload_buffer == 0 {
            return Err(ConfigError::EmptyUploadBuffer);
        }
        Ok(Self {
            duration,
            ram_max_blocks: cli.ram_max_blocks,
            disk_path: PathBuf::from(&cli.disk_path),
            url: cli.url.clone(),
            http_timeout: Duration::from_secs(cli.http_timeout),
            upload_host: cli.upload_host.clone(),
            upload_port: cli.upload_port,
            upload_buffer: cli.upload_buffer,
        })
    }
}

pub fn duration_from_minutes(minutes: i64) -> Result<Duration, ConfigError> {
    if minutes < MIN_DURATION_MINUTES {
        return Err(ConfigError::DurationTooShort(minutes));
    }
    Ok(Duration::from_secs((minutes as u64).saturating_mul(60)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn rejects_short_durations() {
        assert!(matches!(
            duration_from_minutes(0),
            Err(ConfigError::DurationTooShort(0))
        ));
        assert!(duration_from_minutes(-2).is_err());
        assert_eq!(duration_from_minutes(1).unwrap(), Duration::from_secs(60));
        assert_eq!(duration_from_minutes(3).unwrap(), Duration::from_secs(180));
    }

    #[test]
    fn builds_from_cli_defaults() {
        let cli = Cli::try_parse_from(["load-hammer", "--all"]).unwrap();
        let conf = BenchConfig::from_cli(&cli).unwrap();
        assert_eq!(conf.duration, Duration::from_secs(60));
        assert_eq!(conf.disk_path, PathBuf::from("test_file"));
        assert_eq!(conf.upload_port, 5201);
        assert_eq!(conf.upload_buffer, 1024);
        assert_eq!(conf.ram_max_blocks, None);
    }

    #[test]
    fn zero_duration_refused_from_cli() {
        let cli = Cli::try_parse_from(["load-hammer", "--all", "--duration", "0"]).unwrap();
        assert!(BenchConfig::from_cli(&cli).is_err());
    }
}
