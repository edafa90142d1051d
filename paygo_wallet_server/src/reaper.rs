use chrono::Duration;
use log::*;
use paygo_wallet_engine::{traits::WalletLedgerDatabase, SqliteDatabase};
use tokio::task::JoinHandle;

/// Sweep interval. Stale handles only matter on the scale of hours, so a coarse tick is plenty.
const SWEEP_INTERVAL_SECS: u64 = 600;

/// Starts the stale-funding reaper. Do not await the returned JoinHandle, as it will run indefinitely.
///
/// A pending funding whose redirect handle was never completed blocks the user from initializing a new one.
/// This worker periodically fails pending credit transactions older than the configured cutoff.
pub fn start_stale_funding_reaper(db: SqliteDatabase, older_than: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(std::time::Duration::from_secs(SWEEP_INTERVAL_SECS));
        info!("🕰️ Stale funding reaper started (cutoff: {} hrs)", older_than.num_hours());
        loop {
            timer.tick().await;
            match db.fail_stale_fundings(older_than).await {
                Ok(flipped) if flipped.is_empty() => trace!("🕰️ Stale funding sweep: nothing to do"),
                Ok(flipped) => {
                    info!("🕰️ {} stale pending funding(s) marked as failed", flipped.len());
                    for tx in &flipped {
                        debug!("🕰️ Failed stale funding [{}] of {} for user #{}", tx.reference, tx.amount, tx.user_id);
                    }
                },
                Err(e) => error!("🕰️ Error running stale funding sweep: {e}"),
            }
        }
    })
}
