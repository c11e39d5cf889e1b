//! Concurrent user creation.
//!
//! A fixed pool of tasks pulls user indices from a shared counter. Each
//! completion is sent back to the caller's task, which reports progress in
//! completion order and stops the whole batch at the first fatal error.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use indicatif::ProgressBar;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::client::{AdminApi, CreateUserResponse};
use crate::output;
use crate::token::TokenCell;
use crate::user::build_user;
use crate::{SeedConfig, SeedError, SeedResult};

/// Outcome of a batch run.
#[derive(Debug)]
pub struct BatchReport {
    /// Number of users the batch was asked to create.
    pub requested: u64,
    /// Users created.
    pub succeeded: u64,
    /// Users whose creation failed.
    pub failed: u64,
    /// Token replacements during the run.
    pub refreshes: u64,
    /// Wall-clock duration.
    pub elapsed: Duration,
    /// First fatal error, if the batch stopped early.
    pub error: Option<SeedError>,
}

impl BatchReport {
    /// Returns true if every requested user was created.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.succeeded == self.requested
    }

    /// Converts an aborted report into its error.
    ///
    /// ## Errors
    ///
    /// Returns the first fatal error recorded during the run.
    pub fn into_result(mut self) -> SeedResult<Self> {
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}

/// How a single user ended up created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Created {
    FirstTry,
    AfterRefresh,
}

struct Completion {
    index: u64,
    result: SeedResult<Created>,
}

/// Creates users `1..=config.total_users` in `config.realm`.
///
/// Never returns early on a creation failure; the failure is recorded in
/// the report so that counts and elapsed time are still available.
pub async fn run_batch<A>(
    api: Arc<A>,
    config: &SeedConfig,
    tokens: Arc<TokenCell>,
    progress: &ProgressBar,
) -> BatchReport
where
    A: AdminApi + 'static,
{
    let total = config.total_users;
    let interval = config.progress_interval;
    let started = Instant::now();

    let next_index = Arc::new(AtomicU64::new(1));
    let cancelled = Arc::new(AtomicBool::new(false));
    let realm: Arc<str> = Arc::from(config.realm.as_str());
    let (tx, mut rx) = mpsc::channel::<Completion>(config.workers * 2);

    let width = usize::try_from(total).map_or(config.workers, |t| config.workers.min(t));
    info!(total, workers = width, realm = %realm, "Starting batch");

    let mut workers = JoinSet::new();
    for _ in 0..width {
        let api = api.clone();
        let tokens = tokens.clone();
        let realm = realm.clone();
        let next_index = next_index.clone();
        let cancelled = cancelled.clone();
        let tx = tx.clone();

        workers.spawn(async move {
            loop {
                if cancelled.load(Ordering::Acquire) {
                    break;
                }
                let index = next_index.fetch_add(1, Ordering::SeqCst);
                if index > total {
                    break;
                }

                let result = create_one(api.as_ref(), &tokens, &realm, index).await;
                if tx.send(Completion { index, result }).await.is_err() {
                    break;
                }
            }
        });
    }
    drop(tx);

    let mut report = BatchReport {
        requested: total,
        succeeded: 0,
        failed: 0,
        refreshes: 0,
        elapsed: Duration::ZERO,
        error: None,
    };

    let mut completed: u64 = 0;
    while let Some(Completion { index, result }) = rx.recv().await {
        match result {
            Ok(created) => {
                report.succeeded += 1;
                progress.inc(1);
                if let Some(line) = progress_line(completed, interval, index, created) {
                    progress.suspend(|| output::info(&line));
                }
                completed += 1;
            }
            Err(err) => {
                report.failed += 1;
                error!(index, error = %err, "Aborting batch");
                cancelled.store(true, Ordering::Release);
                workers.abort_all();
                report.error = Some(err);
                break;
            }
        }
    }
    drop(rx);

    while let Some(joined) = workers.join_next().await {
        if let Err(join_err) = joined {
            if join_err.is_panic() && report.error.is_none() {
                report.error = Some(SeedError::Worker(join_err.to_string()));
            }
        }
    }

    if report.error.is_none() && report.succeeded < total {
        report.error = Some(SeedError::Worker(format!(
            "workers stopped after {} of {} users",
            report.succeeded, total
        )));
    }

    report.refreshes = tokens.refreshes();
    report.elapsed = started.elapsed();
    progress.finish_and_clear();

    debug!(
        succeeded = report.succeeded,
        failed = report.failed,
        elapsed_ms = u64::try_from(report.elapsed.as_millis()).unwrap_or(u64::MAX),
        "Batch finished"
    );
    report
}

/// Progress line for a success, printed for the 1st, (N+1)th, (2N+1)th...
/// completion. `completed` counts the successes before this one.
fn progress_line(completed: u64, interval: u64, index: u64, created: Created) -> Option<String> {
    if completed % interval != 0 {
        return None;
    }
    Some(match created {
        Created::FirstTry => format!("User {index} created."),
        Created::AfterRefresh => format!("User {index} created after refreshing token."),
    })
}

/// Creates one user, refreshing the shared token and retrying once on 401.
async fn create_one<A>(api: &A, tokens: &TokenCell, realm: &str, index: u64) -> SeedResult<Created>
where
    A: AdminApi + ?Sized,
{
    let user = build_user(index);
    let snapshot = tokens.current();

    match api.create_user(&snapshot.token, realm, &user).await? {
        CreateUserResponse::Created => Ok(Created::FirstTry),
        CreateUserResponse::Unauthorized => {
            let refreshed = tokens.refresh(api, &snapshot).await?;
            match api.create_user(&refreshed.token, realm, &user).await? {
                CreateUserResponse::Created => Ok(Created::AfterRefresh),
                CreateUserResponse::Unauthorized => Err(SeedError::Unauthorized {
                    username: user.username,
                }),
            }
        }
    }
}
