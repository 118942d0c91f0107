use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::primitives::{add_hours, hours_between};
use crate::error::{ChartError, ChartResult};

/// Phase of a period. Ordering puts fasting before eating, matching the
/// order phases occur inside one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseType {
    Fasting,
    Eating,
}

/// One fasting + eating cycle. Owned by the host; the chart only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub id: String,
    pub start_time: DateTime<Utc>,
    /// Hours, always `> 0`.
    pub fasting_duration: f64,
    /// Hours, `>= 0`. Zero means the period has no eating phase.
    pub eating_window: f64,
}

impl Period {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        start_time: DateTime<Utc>,
        fasting_duration: f64,
        eating_window: f64,
    ) -> Self {
        Self {
            id: id.into(),
            start_time,
            fasting_duration,
            eating_window,
        }
    }

    #[must_use]
    pub fn fasting_end(&self) -> DateTime<Utc> {
        add_hours(self.start_time, self.fasting_duration)
    }

    #[must_use]
    pub fn end_time(&self) -> DateTime<Utc> {
        add_hours(self.fasting_end(), self.eating_window)
    }

    #[must_use]
    pub fn total_hours(&self) -> f64 {
        self.fasting_duration + self.eating_window
    }

    #[must_use]
    pub fn phase_duration(&self, phase: PhaseType) -> f64 {
        match phase {
            PhaseType::Fasting => self.fasting_duration,
            PhaseType::Eating => self.eating_window,
        }
    }

    /// Returns `[start, end)` of the phase, or `None` for an empty eating window.
    #[must_use]
    pub fn phase_range(&self, phase: PhaseType) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match phase {
            PhaseType::Fasting => Some((self.start_time, self.fasting_end())),
            PhaseType::Eating if self.eating_window > 0.0 => {
                Some((self.fasting_end(), self.end_time()))
            }
            PhaseType::Eating => None,
        }
    }

    #[must_use]
    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        self.start_time <= time && time < self.end_time()
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.fasting_duration.is_finite() || self.fasting_duration <= 0.0 {
            return Err(ChartError::InvalidData(format!(
                "period `{}` fasting duration must be finite and > 0",
                self.id
            )));
        }
        if !self.eating_window.is_finite() || self.eating_window < 0.0 {
            return Err(ChartError::InvalidData(format!(
                "period `{}` eating window must be finite and >= 0",
                self.id
            )));
        }
        Ok(())
    }
}

pub fn validate_periods(periods: &[Period]) -> ChartResult<()> {
    for period in periods {
        period.validate()?;
    }
    Ok(())
}

/// A finished prior cycle, rendered for context only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletedCycle {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl CompletedCycle {
    #[must_use]
    pub fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            end_time,
        }
    }

    #[must_use]
    pub fn duration_hours(&self) -> f64 {
        hours_between(self.start_time, self.end_time)
    }

    /// A cycle is shown when it ended at most `lookback_hours` before `first_start`.
    #[must_use]
    pub fn is_visible_before(&self, first_start: DateTime<Utc>, lookback_hours: f64) -> bool {
        if self.end_time <= self.start_time {
            return false;
        }
        let gap = hours_between(self.end_time, first_start);
        (0.0..=lookback_hours).contains(&gap)
    }
}

/// Partial period proposed by a drag. `None` fields are unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PeriodChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fasting_duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eating_window: Option<f64>,
}

impl PeriodChanges {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start_time.is_none() && self.fasting_duration.is_none() && self.eating_window.is_none()
    }

    #[must_use]
    pub fn apply_to(&self, period: &Period) -> Period {
        Period {
            id: period.id.clone(),
            start_time: self.start_time.unwrap_or(period.start_time),
            fasting_duration: self.fasting_duration.unwrap_or(period.fasting_duration),
            eating_window: self.eating_window.unwrap_or(period.eating_window),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodUpdate {
    pub period_index: usize,
    pub changes: PeriodChanges,
}

impl PeriodUpdate {
    #[must_use]
    pub fn new(period_index: usize, changes: PeriodChanges) -> Self {
        Self {
            period_index,
            changes,
        }
    }
}

/// Folds an update batch into a copy of `periods`, in batch order.
///
/// Updates that point past the end of the list are skipped.
#[must_use]
pub fn apply_period_updates(periods: &[Period], updates: &[PeriodUpdate]) -> Vec<Period> {
    let mut next = periods.to_vec();
    for update in updates {
        match next.get_mut(update.period_index) {
            Some(period) => *period = update.changes.apply_to(period),
            None => warn!(
                period_index = update.period_index,
                period_count = periods.len(),
                "skipping period update with out-of-range index"
            ),
        }
    }
    next
}
