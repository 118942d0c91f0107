use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::period::PhaseType;
use crate::core::types::ChartMode;

/// Lifecycle of one phase relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarState {
    Scheduled,
    InProgress,
    Completed,
}

/// Classifies a phase `[phase_start, phase_end)` against `now`.
///
/// Edit mode does not track live progress of eating windows, so eating
/// phases are always `Scheduled` there.
#[must_use]
pub fn classify_phase(
    phase: PhaseType,
    phase_start: DateTime<Utc>,
    phase_end: DateTime<Utc>,
    now: DateTime<Utc>,
    mode: ChartMode,
) -> BarState {
    if mode == ChartMode::Edit && phase == PhaseType::Eating {
        return BarState::Scheduled;
    }
    if now < phase_start {
        BarState::Scheduled
    } else if now < phase_end {
        BarState::InProgress
    } else {
        BarState::Completed
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone, Utc};

    use super::{BarState, classify_phase};
    use crate::core::period::PhaseType;
    use crate::core::types::ChartMode;

    #[test]
    fn fasting_phase_moves_through_all_states() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 20, 0, 0).unwrap();
        let end = start + TimeDelta::hours(16);
        let classify = |now| classify_phase(PhaseType::Fasting, start, end, now, ChartMode::View);

        assert_eq!(classify(start - TimeDelta::minutes(1)), BarState::Scheduled);
        assert_eq!(classify(start), BarState::InProgress);
        assert_eq!(classify(start + TimeDelta::hours(1)), BarState::InProgress);
        assert_eq!(classify(end), BarState::Completed);
    }

    #[test]
    fn eating_phase_is_scheduled_in_edit_mode() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let end = start + TimeDelta::hours(8);
        let now = end + TimeDelta::hours(5);

        assert_eq!(
            classify_phase(PhaseType::Eating, start, end, now, ChartMode::Edit),
            BarState::Scheduled
        );
        assert_eq!(
            classify_phase(PhaseType::Eating, start, end, now, ChartMode::View),
            BarState::Completed
        );
        assert_eq!(
            classify_phase(PhaseType::Fasting, start, end, now, ChartMode::Edit),
            BarState::Completed
        );
    }
}
