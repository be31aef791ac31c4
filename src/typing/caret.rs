//! Blinking caret, independent of reveal progress.
//!
//! The caret fades 0 -> 1 -> 0 once per period. The discrete flag used by
//! the timer is "visible while opacity >= 0.5", i.e. hidden for the first
//! quarter of every period, visible for the middle half, hidden again for
//! the last quarter.

use crate::errors::HeroTextErrors;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

pub const DEFAULT_CARET_PERIOD_MS: u64 = 800;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaretOscillator {
    period: Duration,
}

impl CaretOscillator {
    pub fn new(period_ms: u64) -> Result<Self, HeroTextErrors> {
        if period_ms == 0 {
            return Err(HeroTextErrors::InvalidParameter(
                "caret period must be at least 1ms".to_string(),
            ));
        }
        Ok(Self {
            period: Duration::from_millis(period_ms),
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Time between two flips of the visibility flag.
    pub fn half_period(&self) -> Duration {
        self.period / 2
    }

    /// Offset of the first flip (hidden -> visible) after mount.
    pub fn first_flip(&self) -> Duration {
        self.period / 4
    }

    pub fn opacity_at(&self, elapsed: Duration) -> f32 {
        let period = self.period.as_secs_f64();
        let phase = (elapsed.as_secs_f64() % period) / period;
        (1.0 - (2.0 * phase - 1.0).abs()) as f32
    }

    pub fn visible_at(&self, elapsed: Duration) -> bool {
        let offset = elapsed.as_nanos() % self.period.as_nanos();
        let quarter = self.first_flip().as_nanos();
        offset >= quarter && offset < quarter + self.half_period().as_nanos()
    }

    /// Starts the always-on blink timer on the current tokio runtime.
    ///
    /// Each flip publishes `visible_at` for the time since mount, so the flag
    /// and the fade never disagree.
    pub fn spawn(self) -> CaretHandle {
        let (tx, rx) = watch::channel(false);
        let mounted = Instant::now();
        let task = tokio::spawn(async move {
            let mut flips = interval_at(mounted + self.first_flip(), self.half_period());
            flips.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                flips.tick().await;
                let visible = self.visible_at(mounted.elapsed());
                tx.send_modify(|flag| *flag = visible);
                if tx.is_closed() {
                    break;
                }
            }
        });
        CaretHandle {
            oscillator: self,
            mounted,
            rx,
            task,
        }
    }
}

impl Default for CaretOscillator {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(DEFAULT_CARET_PERIOD_MS),
        }
    }
}

/// Running caret timer. Dropping it stops the timer.
#[derive(Debug)]
pub struct CaretHandle {
    oscillator: CaretOscillator,
    mounted: Instant,
    rx: watch::Receiver<bool>,
    task: JoinHandle<()>,
}

impl CaretHandle {
    pub fn is_visible(&self) -> bool {
        *self.rx.borrow()
    }

    /// Current point of the 0 -> 1 -> 0 fade.
    pub fn opacity(&self) -> f32 {
        self.oscillator.opacity_at(self.mounted.elapsed())
    }

    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for CaretHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
