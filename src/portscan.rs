use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use tokio::io::AsyncReadExt;
use tokio::net::{lookup_host, TcpStream};
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use ::time::{format_description::well_known, OffsetDateTime};

use crate::probe::{run_session, ProbeOutcome};
use crate::types::{PortFinding, PortScanReport};

/// Resolve a hostname or IP literal to a single address for scanning.
///
/// Resolution failure is fatal for the whole scan; nothing is probed.
pub async fn resolve_target(target: &str) -> Result<IpAddr> {
    if let Ok(ip) = target.parse::<IpAddr>() {
        return Ok(ip);
    }
    let mut addrs = lookup_host((target, 0u16))
        .await
        .with_context(|| format!("could not resolve hostname: {target}"))?;
    addrs
        .next()
        .map(|sa| sa.ip())
        .ok_or_else(|| anyhow!("could not resolve hostname: {target}"))
}

/// Scan the given ports on one target using asynchronous TCP connects.
///
/// Open ports are printed as they are discovered. Closed, filtered, and
/// timed-out ports are not findings and never abort the scan.
pub async fn scan(
    target: &str,
    ports: Vec<u16>,
    concurrency: usize,
    timeout: Duration,
) -> Result<PortScanReport> {
    let ip = resolve_target(target).await?;
    let total = ports.len() as u64;

    println!(
        "\n{} Scanning {} ({} ports)...\n",
        "[*]".blue(),
        ip,
        ports.len()
    );

    let report = run_session(
        ports,
        concurrency,
        CancellationToken::new(),
        None,
        move |port| scan_port(ip, port, timeout),
        |_| false,
    )
    .await;

    Ok(PortScanReport {
        target: target.to_string(),
        ip: ip.to_string(),
        scanned_total: total,
        scanned_done: report.completed,
        open_count: report.findings.len() as u64,
        findings: report.findings,
    })
}

async fn scan_port(ip: IpAddr, port: u16, timeout: Duration) -> ProbeOutcome<PortFinding> {
    let addr = SocketAddr::new(ip, port);
    let start = Instant::now();
    match time::timeout(timeout, TcpStream::connect(addr)).await {
        Ok(Ok(mut stream)) => {
            let latency_ms = start.elapsed().as_millis() as u64;
            // Short, passive banner read.
            let banner = read_banner(&mut stream).await;
            println!(
                "{} Port {} open - Banner: {}",
                "[+]".green(),
                port,
                banner.as_deref().unwrap_or("No banner")
            );
            ProbeOutcome::Finding(PortFinding {
                ip: ip.to_string(),
                port,
                banner,
                latency_ms,
                timestamp: now_rfc3339(),
            })
        }
        // Closed, filtered, or timed out.
        _ => ProbeOutcome::NoFinding,
    }
}

/// Try to read up to 256 bytes from the stream with a short timeout and
/// convert to a lossy UTF-8 string.
async fn read_banner(stream: &mut TcpStream) -> Option<String> {
    let mut buf = vec![0u8; 256];
    match time::timeout(Duration::from_millis(200), stream.read(&mut buf)).await {
        Ok(Ok(n)) if n > 0 => {
            buf.truncate(n);
            let s = String::from_utf8_lossy(&buf).to_string();
            let s = s.replace('\n', "\\n").replace('\r', "\\r");
            Some(s.trim().to_string())
        }
        _ => None,
    }
}

fn now_rfc3339() -> String {
    let now = OffsetDateTime::now_utc();
    now.format(&well_known::Rfc3339)
        .unwrap_or_else(|_| String::from("1970-01-01T00:00:00Z"))
}
