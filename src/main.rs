use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use sec_audit_rs::hashcrack::{self, Algorithm};
use sec_audit_rs::passwd;
use sec_audit_rs::pingsweep;
use sec_audit_rs::ports;
use sec_audit_rs::portscan;
use sec_audit_rs::sqli::{self, Method};
use sec_audit_rs::types::PortScanReport;
use sec_audit_rs::wifi;

const DEFAULT_TARGET: &str = "scanme.nmap.org";
const DEFAULT_PORT_SPEC: &str = "20-80";
const BENCHMARK_ITERATIONS: u64 = 100_000;

/// sec-audit-rs — toolbox of concurrent security-auditing utilities.
#[derive(Debug, Parser)]
#[command(
    name = "sec-audit-rs",
    version,
    about = "Toolbox of concurrent security-auditing utilities.",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// TCP connect port scanner with passive banner grabbing.
    Portscan {
        /// Target IP or hostname. Prompts when omitted.
        #[arg(short, long)]
        target: Option<String>,
        /// Port spec: single port ("80") or inclusive range ("20-443").
        #[arg(short, long)]
        ports: Option<String>,
        /// Max concurrent connect attempts.
        #[arg(long, default_value_t = 100)]
        concurrency: usize,
        /// Socket connect timeout in milliseconds.
        #[arg(long = "timeout-ms", default_value_t = 500)]
        timeout_ms: u64,
        /// Write results as pretty JSON to this path.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// ICMP echo sweep with TTL-based OS guessing.
    Pingsweep {
        /// Subnet prefix, e.g. 192.168.1. Prompts when omitted.
        #[arg(short, long)]
        subnet: Option<String>,
        /// First last-octet to probe (1-254).
        #[arg(long, default_value_t = 1)]
        start: u8,
        /// Last last-octet to probe (1-254).
        #[arg(long, default_value_t = 254)]
        end: u8,
        /// Worker count.
        #[arg(short, long, default_value_t = 50)]
        threads: usize,
    },
    /// Wordlist hash cracker with algorithm auto-detection.
    Hashcrack {
        /// Hash(es) to crack, comma-separated. Prompts when omitted.
        #[arg(long = "hash")]
        hashes: Option<String>,
        /// Path to wordlist. Prompts when omitted.
        #[arg(short, long)]
        wordlist: Option<PathBuf>,
        /// Hash algorithm; auto-detected from digest length when omitted.
        #[arg(short, long, value_enum)]
        algorithm: Option<Algorithm>,
        /// Salt prepended to each candidate.
        #[arg(short, long)]
        salt: Option<String>,
        /// Worker count.
        #[arg(short, long, default_value_t = 4)]
        threads: usize,
        /// Benchmark hash speed before cracking.
        #[arg(short, long, default_value_t = false)]
        benchmark: bool,
    },
    /// Password strength and local breach-list check.
    Passwd {
        /// Password to check. Prompts when omitted.
        password: Option<String>,
    },
    /// SQL injection probe (error-based and time-based signals).
    Sqli {
        /// Target URL. Prompts when omitted.
        #[arg(short, long)]
        url: Option<String>,
        /// Parameter to test. Prompts when omitted.
        #[arg(short, long)]
        param: Option<String>,
        /// HTTP method.
        #[arg(short, long, value_enum, ignore_case = true, default_value_t = Method::Get)]
        method: Method,
        /// File with one payload per line; built-in defaults otherwise.
        #[arg(short = 'f', long = "payload-file")]
        payload_file: Option<PathBuf>,
        /// Worker count.
        #[arg(short, long, default_value_t = 5)]
        threads: usize,
        /// Per-request timeout in seconds.
        #[arg(long, default_value_t = 5)]
        timeout: u64,
    },
    /// 802.11 beacon sniffer (needs a monitor-mode interface and root).
    Wifi {
        /// Monitor-mode interface name.
        #[arg(short, long, default_value = "wlan0mon")]
        interface: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Portscan {
            target,
            ports,
            concurrency,
            timeout_ms,
            output,
        } => run_portscan(target, ports, concurrency, timeout_ms, output).await,
        Command::Pingsweep {
            subnet,
            start,
            end,
            threads,
        } => run_pingsweep(subnet, start, end, threads).await,
        Command::Hashcrack {
            hashes,
            wordlist,
            algorithm,
            salt,
            threads,
            benchmark,
        } => run_hashcrack(hashes, wordlist, algorithm, salt, threads, benchmark).await,
        Command::Passwd { password } => run_passwd(password),
        Command::Sqli {
            url,
            param,
            method,
            payload_file,
            threads,
            timeout,
        } => run_sqli(url, param, method, payload_file, threads, timeout).await,
        Command::Wifi { interface } => wifi::sniff(&interface),
    }
}

async fn run_portscan(
    target: Option<String>,
    port_spec: Option<String>,
    concurrency: usize,
    timeout_ms: u64,
    output: Option<PathBuf>,
) -> Result<()> {
    let target = match target {
        Some(t) => t,
        None => prompt_default("Target IP/Domain", DEFAULT_TARGET)?,
    };
    let spec = match port_spec {
        Some(p) => p,
        None => prompt_default("Port Range", DEFAULT_PORT_SPEC)?,
    };
    let port_list = ports::parse_port_spec(&spec)?;

    let report = portscan::scan(
        &target,
        port_list,
        concurrency,
        Duration::from_millis(timeout_ms),
    )
    .await?;

    println!(
        "\n{} Scan completed. {} ports open.",
        "[+]".green(),
        report.open_count
    );

    if let Some(path) = output {
        write_report_json(&path, &report)?;
        println!("Wrote JSON results to {}", path.display());
    }
    Ok(())
}

async fn run_pingsweep(
    subnet: Option<String>,
    start: u8,
    end: u8,
    threads: usize,
) -> Result<()> {
    let subnet = match subnet {
        Some(s) => s,
        None => prompt_required("Enter subnet (e.g. 192.168.1)")?,
    };

    let report = pingsweep::sweep(&subnet, start, end, threads).await?;
    println!(
        "\n{} Sweep complete. Found {} active hosts.",
        "[+]".green(),
        report.findings.len()
    );
    Ok(())
}

async fn run_hashcrack(
    hashes: Option<String>,
    wordlist: Option<PathBuf>,
    algorithm: Option<Algorithm>,
    salt: Option<String>,
    threads: usize,
    benchmark: bool,
) -> Result<()> {
    let hashes_raw = match hashes {
        Some(h) => h,
        None => prompt_required("Enter hash (or multiple hashes separated by commas)")?,
    };
    let wordlist = match wordlist {
        Some(w) => w,
        None => PathBuf::from(prompt_required("Wordlist path")?),
    };

    let hash_list: Vec<String> = hashes_raw
        .split(',')
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(str::to_string)
        .collect();
    if hash_list.is_empty() {
        bail!("no hashes given");
    }

    let algo = match algorithm {
        Some(a) => a,
        None => {
            let detected = hashcrack::detect_algorithm(&hash_list[0])
                .context("couldn't auto-detect algorithm, specify with --algorithm")?;
            println!("{} Auto-detected algorithm: {detected}", "[*]".blue());
            detected
        }
    };

    // Missing wordlist is fatal before any cracking starts.
    let words = hashcrack::load_wordlist(&wordlist)?;

    if benchmark {
        println!("\n{} Benchmarking {algo}...", "[*]".blue());
        let rate = hashcrack::benchmark(algo, BENCHMARK_ITERATIONS);
        println!("  Speed: {rate:.0} hashes/sec");
    }

    for hash in &hash_list {
        println!("\n{} Cracking hash: {hash}", "[*]".blue());
        println!("  Algorithm: {algo}");
        if let Some(s) = &salt {
            println!("  Salt: {s}");
        }
        println!("  Wordlist: {} ({} candidates)", wordlist.display(), words.len());
        println!("  Workers: {threads}");

        let started = Instant::now();
        match hashcrack::crack(hash, &words, algo, salt.as_deref(), threads).await {
            Some(finding) => {
                println!(
                    "\n{} CRACKED! Plaintext: {}",
                    "[+]".green(),
                    finding.plaintext
                );
                println!("  Time elapsed: {:.2}s", started.elapsed().as_secs_f64());
            }
            None => println!("\n{} No match found in wordlist", "[-]".red()),
        }
    }
    Ok(())
}

fn run_passwd(password: Option<String>) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt_required("Enter password to check")?,
    };
    if password.is_empty() {
        bail!("password must not be empty");
    }

    println!("Analyzing password strength...\n");

    let weaknesses = passwd::check_password_strength(&password);
    if weaknesses.is_empty() {
        println!("{} Strong password!", "[+]".green());
    } else {
        println!("{} Weaknesses:", "[!]".yellow());
        for weakness in weaknesses {
            println!(" - {weakness}");
        }
    }

    if passwd::is_breached(&password) {
        println!("{} Found in breached database!", "[!]".red());
    }

    println!("\n{}", passwd::DISCLAIMER);
    Ok(())
}

async fn run_sqli(
    url: Option<String>,
    param: Option<String>,
    method: Method,
    payload_file: Option<PathBuf>,
    threads: usize,
    timeout: u64,
) -> Result<()> {
    let url = match url {
        Some(u) => u,
        None => prompt_required("Enter target URL")?,
    };
    let param = match param {
        Some(p) => p,
        None => prompt_required("Enter parameter to test")?,
    };

    let payloads = sqli::load_payloads(payload_file.as_deref());
    let findings = sqli::test_url(
        &url,
        &param,
        method,
        payloads,
        threads,
        Duration::from_secs(timeout),
    )
    .await?;

    if findings.is_empty() {
        println!("{} No SQL injection vulnerabilities found", "[+]".green());
    } else {
        println!(
            "{} SQL Injection vulnerability detected! ({} payloads flagged)",
            "[!]".red(),
            findings.len()
        );
    }
    Ok(())
}

fn write_report_json(path: &Path, report: &PortScanReport) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(file, report)?;
    Ok(())
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}: ");
    io::stdout().flush()?;
    let mut line = String::new();
    let read = io::stdin()
        .read_line(&mut line)
        .context("failed to read stdin")?;
    if read == 0 {
        bail!("unexpected end of input");
    }
    Ok(line.trim().to_string())
}

/// Prompt with a default; an empty answer takes the default.
fn prompt_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{message} [default: {default}]"))?;
    Ok(if input.is_empty() {
        default.to_string()
    } else {
        input
    })
}

/// Prompt until a non-empty answer is given.
fn prompt_required(message: &str) -> Result<String> {
    loop {
        let input = prompt(message)?;
        if !input.is_empty() {
            return Ok(input);
        }
    }
}
