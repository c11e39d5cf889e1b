//! End-to-end seeding run.

use std::sync::Arc;

use tracing::info;

use crate::batch::{run_batch, BatchReport};
use crate::client::AdminApi;
use crate::output;
use crate::realm::{ensure_realm, RealmStatus};
use crate::token::TokenCell;
use crate::{SeedConfig, SeedResult};

/// Display options for a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedOptions {
    /// Draw a progress bar.
    pub show_progress: bool,
}

/// Authenticates, ensures the realm exists, and creates the configured users.
///
/// The summary is printed whether or not the batch completes.
///
/// ## Errors
///
/// Returns the authentication or provisioning error that prevented the
/// batch from starting, or the first fatal error of the batch.
pub async fn seed<A>(api: Arc<A>, config: &SeedConfig, options: SeedOptions) -> SeedResult<BatchReport>
where
    A: AdminApi + 'static,
{
    info!(server = %config.server_url, realm = %config.realm, "Authenticating");
    let token = api.authenticate().await?;

    if ensure_realm(api.as_ref(), &token, &config.realm).await? == RealmStatus::Created {
        output::success(&format!("Realm '{}' created.", config.realm));
    }

    let tokens = Arc::new(TokenCell::new(token));
    let progress = output::progress_bar(config.total_users, options.show_progress);

    let report = run_batch(api, config, tokens, &progress).await;
    output::summary(&report);
    report.into_result()
}
