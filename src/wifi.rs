use std::collections::HashSet;

use anyhow::{Context, Result};
use colored::Colorize;
use pcap::Capture;

/// SSID/BSSID pair pulled out of one beacon frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BeaconInfo {
    pub ssid: String,
    pub bssid: String,
}

/// Parse a radiotap-framed 802.11 management beacon (type 0, subtype 8).
///
/// Returns None for any other frame kind and for truncated data. The SSID
/// comes from tagged parameter 0 and tolerates non-UTF-8 bytes; hidden
/// networks yield an empty SSID.
pub fn parse_beacon(data: &[u8]) -> Option<BeaconInfo> {
    if data.len() < 4 {
        return None;
    }

    // Radiotap header length is little-endian at offset 2.
    let radiotap_len = u16::from_le_bytes([data[2], data[3]]) as usize;
    if data.len() < radiotap_len + 24 {
        return None;
    }
    let frame = &data[radiotap_len..];

    let fc = frame[0];
    let f_type = (fc >> 2) & 0x3;
    let f_subtype = (fc >> 4) & 0xF;
    if f_type != 0 || f_subtype != 8 {
        return None;
    }

    // BSSID is address 3 in management frames.
    let bssid_bytes: [u8; 6] = frame[16..22].try_into().ok()?;
    let bssid = bssid_bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(":");

    // Fixed parameters: timestamp (8) + beacon interval (2) + capability (2).
    let body = &frame[24..];
    if body.len() < 12 {
        return None;
    }

    let tags = &body[12..];
    let mut i = 0;
    while i + 2 <= tags.len() {
        let id = tags[i];
        let len = tags[i + 1] as usize;
        let val_end = i + 2 + len;
        if val_end > tags.len() {
            break;
        }
        if id == 0 {
            let ssid = String::from_utf8_lossy(&tags[i + 2..val_end]).to_string();
            return Some(BeaconInfo { ssid, bssid });
        }
        i = val_end;
    }

    None
}

/// Sniff beacons on a monitor-mode interface, printing each newly observed
/// SSID/BSSID pair once. Runs until interrupted.
///
/// Needs elevated privileges and a capture-capable interface; opening the
/// handle in monitor mode fails otherwise.
pub fn sniff(interface: &str) -> Result<()> {
    let mut cap = Capture::from_device(interface)
        .with_context(|| format!("failed to open device: {interface}"))?
        .promisc(true)
        .rfmon(true)
        .timeout(100)
        .snaplen(2048)
        .open()
        .with_context(|| format!("failed to enable monitor mode on {interface} (are you root?)"))?;

    println!(
        "{} Starting WiFi scan on {interface}... Press Ctrl+C to stop.",
        "[*]".blue()
    );

    let mut seen: HashSet<BeaconInfo> = HashSet::new();
    loop {
        match cap.next_packet() {
            Ok(packet) => {
                if let Some(info) = parse_beacon(packet.data) {
                    if seen.insert(info.clone()) {
                        let ssid = if info.ssid.is_empty() {
                            "<Hidden>"
                        } else {
                            info.ssid.as_str()
                        };
                        println!("{} SSID: {} | BSSID: {}", "[+]".green(), ssid, info.bssid);
                    }
                }
            }
            Err(pcap::Error::TimeoutExpired) => continue,
            Err(e) => return Err(e).context("packet capture failed"),
        }
    }
}
