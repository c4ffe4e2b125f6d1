//! Recurring reminder sweep.
//!
//! Once per minute, scan for tasks whose reminder lands on the current
//! minute and emit one notice per match. The match window is exactly
//! one minute and the scan runs once per minute, so each qualifying
//! task is reported once; a missed tick (process pause) is a silent
//! skip with no catch-up.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use crate::database::Database;
use crate::error::Result;
use crate::models::ReminderNotice;
use crate::utils;

pub const DEFAULT_PERIOD: Duration = Duration::from_secs(60);

/// The sweep loop, configured but not yet running. It opens its own
/// store connection and shares no in-memory state with request paths.
pub struct ReminderSweeper {
    db_path: String,
    period: Duration,
}

impl ReminderSweeper {
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            period: DEFAULT_PERIOD,
        }
    }

    /// Override the tick period. Tests run with short periods.
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Open the sweeper's store connection and start the tick loop.
    /// Returns a cancelable handle and the notice channel.
    pub fn spawn(self) -> Result<(SweeperHandle, mpsc::Receiver<ReminderNotice>)> {
        let db = Database::new(&self.db_path)?;
        let (notice_tx, notice_rx) = mpsc::channel(64);
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let period = self.period;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let now = utils::now_string();
                        match db.reminders_at_minute(utils::minute_key(&now)) {
                            Ok(notices) => {
                                for notice in notices {
                                    info!(
                                        task_id = notice.task_id,
                                        title = %notice.title,
                                        "reminder due"
                                    );
                                    if notice_tx.send(notice).await.is_err() {
                                        // Receiver is gone; nothing left to notify.
                                        return;
                                    }
                                }
                            }
                            // A failed query is isolated to this tick; the
                            // next tick proceeds independently.
                            Err(err) => error!(error = %err, "reminder sweep tick failed"),
                        }
                    }
                    _ = shutdown_rx.changed() => return,
                }
            }
        });

        Ok((
            SweeperHandle {
                shutdown: shutdown_tx,
                task,
            },
            notice_rx,
        ))
    }
}

/// Handle to a running sweeper.
pub struct SweeperHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Stop the tick loop and wait for it to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}
