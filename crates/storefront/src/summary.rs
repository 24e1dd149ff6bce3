//! Floating cart summary.
//!
//! A presentation timer: the summary pops up whenever the cart gains items
//! and hides itself after a fixed duration. Every qualifying change restarts
//! the countdown. Visibility is published on a `watch` channel so any number
//! of subscribers can follow it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// How long the summary stays up after the cart gains an item.
pub const DEFAULT_SUMMARY_DURATION: Duration = Duration::from_secs(4);

/// Published visibility.
///
/// `generation` increases on every show or dismiss, so a countdown that was
/// superseded can tell it no longer owns the current state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryState {
    pub visible: bool,
    generation: u64,
}

impl SummaryState {
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// Visibility controller for the floating cart summary.
///
/// Dropping it cancels any pending countdown.
#[derive(Debug)]
pub struct FloatingSummary {
    duration: Duration,
    tx: Arc<watch::Sender<SummaryState>>,
    timer: Option<JoinHandle<()>>,
    deadline: Option<Instant>,
}

impl Default for FloatingSummary {
    fn default() -> Self {
        Self::new(DEFAULT_SUMMARY_DURATION)
    }
}

impl FloatingSummary {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        let (tx, _rx) = watch::channel(SummaryState::default());
        Self {
            duration,
            tx: Arc::new(tx),
            timer: None,
            deadline: None,
        }
    }

    /// React to a change in the cart's total item count.
    ///
    /// An increase (including empty to non-empty) shows the summary and
    /// restarts the countdown. An empty cart hides it. Anything else leaves
    /// it alone.
    pub fn on_cart_change(&mut self, before: u64, after: u64) {
        if after == 0 {
            self.dismiss();
        } else if after > before {
            self.show();
        }
    }

    /// Show the summary and (re)start the countdown.
    pub fn show(&mut self) {
        self.cancel_timer();

        let mut generation = 0;
        self.tx.send_modify(|state| {
            state.generation += 1;
            state.visible = true;
            generation = state.generation;
        });

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("No runtime available, summary will stay visible until dismissed");
            return;
        };

        let tx = Arc::clone(&self.tx);
        let duration = self.duration;
        self.deadline = Some(Instant::now() + duration);
        self.timer = Some(runtime.spawn(async move {
            tokio::time::sleep(duration).await;
            tx.send_if_modified(|state| {
                if state.generation == generation && state.visible {
                    state.visible = false;
                    true
                } else {
                    false
                }
            });
        }));
    }

    /// Hide the summary immediately.
    pub fn dismiss(&mut self) {
        self.cancel_timer();
        self.tx.send_if_modified(|state| {
            if state.visible {
                state.generation += 1;
                state.visible = false;
                true
            } else {
                false
            }
        });
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.tx.borrow().visible
    }

    /// Time left before the summary hides itself, if it is visible.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        if !self.is_visible() {
            return None;
        }
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Follow visibility changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SummaryState> {
        self.tx.subscribe()
    }

    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.deadline = None;
    }
}

impl Drop for FloatingSummary {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
