use std::net::IpAddr;
use std::time::Duration;

use anyhow::{bail, Result};
use colored::Colorize;
use indicatif::ProgressBar;
use surge_ping::IcmpPacket;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::probe::{run_session, session_progress_bar, ProbeOutcome};
use crate::types::{HostFinding, SweepReport};

const ECHO_TIMEOUT: Duration = Duration::from_secs(1);

/// Guess an OS family from an echo reply's TTL. Heuristic, not authoritative.
pub fn classify_ttl(ttl: u8) -> String {
    if ttl <= 64 {
        "Linux/Unix".to_string()
    } else if ttl <= 128 {
        "Windows".to_string()
    } else {
        format!("Unknown (TTL: {ttl})")
    }
}

/// A sweep subnet is the first three dotted octets, e.g. "192.168.1".
pub fn validate_subnet(subnet: &str) -> bool {
    let parts: Vec<&str> = subnet.split('.').collect();
    parts.len() == 3 && parts.iter().all(|p| !p.is_empty() && p.parse::<u8>().is_ok())
}

/// Enumerate the sweep targets `subnet.start ..= subnet.end`.
pub fn sweep_targets(subnet: &str, start: u8, end: u8) -> Vec<IpAddr> {
    (start..=end)
        .filter_map(|i| format!("{subnet}.{i}").parse().ok())
        .collect()
}

/// ICMP-sweep a last-octet range of a /24, classifying responders by TTL.
///
/// Live hosts are printed as replies arrive. Hosts that don't answer within
/// the echo timeout are simply absent from the result; per-host send errors
/// are logged and skipped. The sweep ends when the full range has been
/// probed.
pub async fn sweep(subnet: &str, start: u8, end: u8, workers: usize) -> Result<SweepReport> {
    if !validate_subnet(subnet) {
        bail!("invalid subnet format (use like: 192.168.1): {subnet}");
    }
    if start < 1 || end > 254 || start > end {
        bail!("invalid IP range {start}-{end} (use 1-254)");
    }

    let targets = sweep_targets(subnet, start, end);
    println!(
        "\n{} Scanning {} hosts ({}.{}-{})...",
        "[*]".blue(),
        targets.len(),
        subnet,
        start,
        end
    );

    let pb = session_progress_bar(targets.len() as u64);
    let reporter = pb.clone();
    let report = run_session(
        targets,
        workers,
        CancellationToken::new(),
        Some(pb),
        move |ip| ping_host(ip, reporter.clone()),
        |_| false,
    )
    .await;

    Ok(SweepReport {
        subnet: subnet.to_string(),
        probed: report.completed,
        findings: report.findings,
    })
}

async fn ping_host(ip: IpAddr, reporter: ProgressBar) -> ProbeOutcome<HostFinding> {
    let payload = [0u8; 56];
    match time::timeout(ECHO_TIMEOUT, surge_ping::ping(ip, &payload)).await {
        Ok(Ok((packet, _rtt))) => {
            let ttl = match packet {
                IcmpPacket::V4(reply) => reply.get_ttl().to_owned(),
                IcmpPacket::V6(_) => None,
            };
            let (ttl, os_guess) = match ttl {
                Some(t) => (Some(t), classify_ttl(t)),
                None => (None, "Unknown (TTL unavailable)".to_string()),
            };
            // Printed through the bar so live-host lines don't tear it.
            reporter.println(format!("{} {} is up | OS: {}", "[+]".green(), ip, os_guess));
            ProbeOutcome::Finding(HostFinding {
                ip: ip.to_string(),
                ttl,
                os_guess,
            })
        }
        // Echo send failed (raw socket denied, unreachable route, ...).
        Ok(Err(e)) => ProbeOutcome::Transient(format!("ping {ip}: {e}")),
        // No reply within the timeout: host considered down.
        Err(_) => ProbeOutcome::NoFinding,
    }
}
