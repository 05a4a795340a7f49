use std::io::Write;
use std::net::TcpStream;
use std::time::Duration;

use tracing::{debug, info};

use super::{Deadline, ErrorPolicy, Probe, ProbeKind, ProbeReport, StopReason};
use crate::error::ProbeError;
use crate::stats::Stats;

/// Pushes padding over a single TCP connection.
#[derive(Debug, Clone)]
pub struct UploadProbe {
    host: String,
    port: u16,
    buffer_len: usize,
}

impl UploadProbe {
    pub fn new(host: String, port: u16, buffer_len: usize) -> Self {
        Self {
            host,
            port,
            buffer_len,
        }
    }
}

impl Probe for UploadProbe {
    fn kind(&self) -> ProbeKind {
        ProbeKind::Upload
    }

    fn policy(&self) -> ErrorPolicy {
        ErrorPolicy::Contain
    }

    fn run(&self, limit: Duration) -> Result<ProbeReport, ProbeError> {
        let addr = format!("{}:{}", self.host, self.port);
        info!(probe = "upload", %addr, "starting upload test");
        let mut stream = TcpStream::connect((self.host.as_str(), self.port))
            .map_err(|source| ProbeError::Connect { addr, source })?;
        let data = vec![b'0'; self.buffer_len];
        let deadline = Deadline::start(limit);
        let stats = send_until(&mut stream, &data, &deadline)?;
        Ok(ProbeReport::new(
            ProbeKind::Upload,
            &stats,
            deadline.elapsed(),
            StopReason::Timeout,
        ))
    }
}

fn send_until<W: Write>(
    sink: &mut W,
    data: &[u8],
    deadline: &Deadline,
) -> Result<Stats, ProbeError> {
    let mut stats = Stats::new();
    while !deadline.expired() {
        let sent = sink.write(data).map_err(|e| ProbeError::io("send", e))?;
        if sent == 0 {
            return Err(ProbeError::ConnectionBroken);
        }
        stats.add_bytes(sent);
        stats.inc();
        debug!(probe = "upload", sent, total = stats.bytes, "bytes sent");
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Read};
    use std::net::TcpListener;
    use std::thread;

    struct ClosedSink;

    impl Write for ClosedSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Ok(0)
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn zero_write_breaks_connection() {
        let deadline = Deadline::start(Duration::from_secs(30));
        let err = send_until(&mut ClosedSink, b"0000", &deadline).unwrap_err();
        assert!(matches!(err, ProbeError::ConnectionBroken));
    }

    #[test]
    fn counts_partial_writes() {
        let mut sink = Vec::new();
        let deadline = Deadline::start(Duration::from_millis(10));
        let stats = send_until(&mut sink, b"0123", &deadline).unwrap();
        assert_eq!(stats.bytes as usize, sink.len());
        assert_eq!(stats.bytes, stats.iterations * 4);
    }

    #[test]
    fn streams_to_local_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let receiver = thread::spawn(move || {
            let (mut conn, _) = listener.accept().unwrap();
            let mut buf = Vec::new();
            conn.read_to_end(&mut buf).unwrap();
            buf.len() as u64
        });
        let probe = UploadProbe::new("127.0.0.1".into(), port, 512);
        let report = probe.run(Duration::from_millis(50)).unwrap();
        assert!(report.bytes > 0);
        assert_eq!(receiver.join().unwrap(), report.bytes);
    }

    #[test]
    fn refused_connection_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        let probe = UploadProbe::new("127.0.0.1".into(), port, 512);
        let err = probe.run(Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ProbeError::Connect { .. }));
    }
}
