//! Library crate for sec-audit-rs exposing reusable modules.
pub mod hashcrack;
pub mod passwd;
pub mod pingsweep;
pub mod portscan;
pub mod ports;
pub mod probe;
pub mod sqli;
pub mod types;
pub mod wifi;
