use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Outcome of checking one work item.
pub enum ProbeOutcome<R> {
    /// The check produced evidence worth reporting.
    Finding(R),
    /// The check completed and found nothing.
    NoFinding,
    /// The check itself failed (connection refused mid-sweep, decode error,
    /// single bad request). Logged and folded into "no finding"; never aborts
    /// the session.
    Transient(String),
}

/// Final state of one prober session.
#[derive(Debug, Clone)]
pub struct SessionReport<R> {
    pub total: u64,
    pub completed: u64,
    pub findings: Vec<R>,
}

/// Run `probe` over `items` with at most `concurrency` checks in flight.
///
/// - Limits concurrent probes with a `Semaphore`; a `JoinSet` is the join
///   barrier, so all workers have finished before the report is returned.
/// - Findings are appended to a mutex-guarded Vec in completion order; no
///   input-order guarantee is made.
/// - `stop_when` is evaluated on each finding. Returning true cancels the
///   session token, which stops new dispatch; every already-dispatched item
///   still runs to completion (soft cancellation only).
/// - `Transient` outcomes are logged and otherwise treated as no finding.
/// - Ctrl-C cancels the session the same way an early stop does.
pub async fn run_session<T, R, F, Fut, S>(
    items: Vec<T>,
    concurrency: usize,
    cancel: CancellationToken,
    progress: Option<ProgressBar>,
    probe: F,
    stop_when: S,
) -> SessionReport<R>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = ProbeOutcome<R>> + Send + 'static,
    S: Fn(&R) -> bool + Clone + Send + Sync + 'static,
{
    let total = items.len() as u64;
    let completed = Arc::new(AtomicU64::new(0));
    let findings: Arc<Mutex<Vec<R>>> = Arc::new(Mutex::new(Vec::new()));
    let sem = Arc::new(Semaphore::new(concurrency.clamp(1, 5_000)));
    let mut set = JoinSet::new();

    // Ctrl-C cancels the session.
    let cancel_ctrlc = cancel.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        cancel_ctrlc.cancel();
    });

    for item in items {
        if cancel.is_cancelled() {
            break;
        }
        let permit = sem
            .clone()
            .acquire_owned()
            .await
            .expect("semaphore in scope");
        let findings = findings.clone();
        let completed = completed.clone();
        let cancel = cancel.clone();
        let probe = probe.clone();
        let stop_when = stop_when.clone();
        let progress = progress.clone();

        set.spawn(async move {
            let _permit = permit; // keep permit until task completes

            match probe(item).await {
                ProbeOutcome::Finding(result) => {
                    if stop_when(&result) {
                        cancel.cancel();
                    }
                    let mut guard = findings.lock().await;
                    guard.push(result);
                }
                ProbeOutcome::NoFinding => {}
                ProbeOutcome::Transient(msg) => {
                    debug!("probe failed: {msg}");
                }
            }

            completed.fetch_add(1, Ordering::Relaxed);
            if let Some(pb) = &progress {
                pb.inc(1);
            }
        });
    }

    while set.join_next().await.is_some() {}

    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }

    let findings_vec = match Arc::try_unwrap(findings) {
        Ok(m) => m.into_inner(),
        // All workers are joined above, so this branch shouldn't trigger.
        // If it somehow does, drain through the lock.
        Err(arc) => std::mem::take(&mut *arc.lock().await),
    };

    SessionReport {
        total,
        completed: completed.load(Ordering::Relaxed),
        findings: findings_vec,
    }
}

/// Progress bar used by the long-running sweeps.
pub fn session_progress_bar(total: u64) -> ProgressBar {
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({per_sec}) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    let pb = ProgressBar::new(total);
    pb.set_style(style.progress_chars("█▓▒░-"));
    pb
}
