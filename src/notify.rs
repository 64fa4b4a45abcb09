use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::rolling_median::RollingMedian;
use crate::sample::Sample;

#[derive(Serialize, Deserialize, JsonSchema, Clone, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct NotifierConfig {
    /// Number of trailing samples the median is taken over.
    pub window: usize,
    /// A sample at or above `factor` times the trailing median raises a notification.
    pub factor: u32,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            window: 5,
            factor: 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notification<T> {
    /// Zero based position of the sample in the stream.
    pub index: usize,
    pub amount: T,
    /// Median of the trailing window the sample was compared against.
    pub median: f64,
}

/// Flags samples that reach `factor` times the median of the preceding window.
///
/// Nothing is flagged until a full window of history exists.
pub struct Notifier<T> {
    trailing: RollingMedian<T>,
    factor: u32,
    seen: usize,
}

impl<T: Sample> Notifier<T> {
    pub fn new(config: &NotifierConfig) -> Result<Self> {
        Ok(Self {
            trailing: RollingMedian::new(config.window)?,
            factor: config.factor,
            seen: 0,
        })
    }

    pub fn observe(&mut self, amount: T) -> Result<Option<Notification<T>>> {
        let index = self.seen;
        let mut notification = None;
        if self.trailing.is_full() && self.reaches_threshold(amount)? {
            let median = self.trailing.current_median()?;
            debug!("sample {} ({:?}) reached {} x median {}", index, amount, self.factor, median);
            notification = Some(Notification {
                index,
                amount,
                median,
            });
        }
        self.trailing.add(amount)?;
        self.seen += 1;
        Ok(notification)
    }

    /// `2 * amount >= factor * (low + high)`, so the median is never halved.
    /// Integers are compared exactly in i128.
    fn reaches_threshold(&self, amount: T) -> Result<bool> {
        let low = self.trailing.low_median()?;
        let high = self.trailing.high_median()?;
        let reached = match (amount.to_i128(), low.to_i128(), high.to_i128()) {
            (Some(amount), Some(low), Some(high)) => {
                2 * amount >= i128::from(self.factor) * (low + high)
            }
            _ => 2.0 * amount.to_f64() >= f64::from(self.factor) * (low.to_f64() + high.to_f64()),
        };
        Ok(reached)
    }

    pub fn seen(&self) -> usize {
        self.seen
    }
}

/// Runs `amounts` through a fresh [`Notifier`] and counts the notifications.
pub fn count_notifications<T: Sample>(amounts: &[T], config: &NotifierConfig) -> Result<usize> {
    let mut notifier = Notifier::new(config)?;
    let mut count = 0;
    for &amount in amounts {
        if notifier.observe(amount)?.is_some() {
            count += 1;
        }
    }
    Ok(count)
}
