use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("duration must be at least 1 minute (got {0})")]
    DurationTooShort(i64),
    #[error("upload buffer must not be empty")]
    EmptyUploadBuffer,
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error("connect {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    #[error("connection broken")]
    ConnectionBroken,
}

impl ProbeError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
