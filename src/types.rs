use serde::{Deserialize, Serialize};

/// One open port discovered by the TCP connect scanner.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PortFinding {
    pub ip: String,
    pub port: u16,
    pub banner: Option<String>,
    pub latency_ms: u64,
    pub timestamp: String,
}

/// Aggregate port-scan results and progress counters.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct PortScanReport {
    pub target: String,
    pub ip: String,
    pub scanned_total: u64,
    pub scanned_done: u64,
    pub open_count: u64,
    pub findings: Vec<PortFinding>,
}

/// One live host discovered by the ICMP sweep.
///
/// `ttl` is `None` when the reply carried no readable IP header (some
/// platforms strip it on unprivileged sockets).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HostFinding {
    pub ip: String,
    pub ttl: Option<u8>,
    pub os_guess: String,
}

/// Aggregate ping-sweep results.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SweepReport {
    pub subnet: String,
    pub probed: u64,
    pub findings: Vec<HostFinding>,
}

/// A cracked hash together with the wordlist line that produced it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CrackFinding {
    pub hash: String,
    pub plaintext: String,
    pub line: u64,
}

/// Which signal marked an injection payload as suspicious.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SqliSignal {
    /// Response body contained a known database error substring.
    ErrorPattern(String),
    /// Response arrived, but slower than 80% of the request timeout.
    SlowResponse { seconds: f64 },
    /// The request timed out entirely (possible blind injection).
    Timeout,
}

/// One payload that produced an injection signal.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SqliFinding {
    pub payload: String,
    pub signal: SqliSignal,
}
