use chrono::{TimeDelta, TimeZone, Utc};
use period_chart::core::{Period, PhaseType, apply_period_updates};
use period_chart::interaction::{
    DragLimits, DragSettings, DragState, NextPeriodSnapshot, PeriodCoupling, PeriodSnapshot,
    PointerId, PreviousPeriodSnapshot, ResizeEdge, resolve_drag_updates,
};
use proptest::prelude::*;

const EPSILON: f64 = 1e-6;

fn quarter_hours(quarters: u32) -> f64 {
    f64::from(quarters) / 4.0
}

fn edge_strategy() -> impl Strategy<Value = (PhaseType, ResizeEdge)> {
    prop_oneof![
        Just((PhaseType::Fasting, ResizeEdge::Left)),
        Just((PhaseType::Fasting, ResizeEdge::Right)),
        Just((PhaseType::Eating, ResizeEdge::Left)),
        Just((PhaseType::Eating, ResizeEdge::Right)),
    ]
}

fn coupling_strategy() -> impl Strategy<Value = PeriodCoupling> {
    prop_oneof![
        Just(PeriodCoupling::Independent),
        Just(PeriodCoupling::Contiguous),
    ]
}

/// Three periods separated by `gaps` quarter hours; negative gaps overlap.
fn three_periods(durations: [(u32, u32); 3], gaps: (i32, i32)) -> Vec<Period> {
    let mut start = Utc
        .with_ymd_and_hms(2024, 5, 1, 6, 0, 0)
        .single()
        .expect("valid instant");
    let gaps = [0, gaps.0, gaps.1];
    durations
        .iter()
        .zip(gaps)
        .enumerate()
        .map(|(index, (&(fasting, eating), gap))| {
            start += TimeDelta::minutes(i64::from(gap) * 15);
            let period = Period::new(
                format!("p{index}"),
                start,
                quarter_hours(fasting),
                quarter_hours(eating),
            );
            start = period.end_time();
            period
        })
        .collect()
}

fn drag_state(
    periods: &[Period],
    bar_type: PhaseType,
    edge: ResizeEdge,
    coupling: PeriodCoupling,
) -> DragState {
    let previous = &periods[0];
    let next = &periods[2];
    DragState {
        edge,
        bar_type,
        period_index: 1,
        start_x: 0.0,
        hour_delta: 0.0,
        pointer: PointerId::Mouse,
        original: PeriodSnapshot::of(&periods[1]),
        previous: Some(PreviousPeriodSnapshot {
            period_index: 0,
            fasting_duration: previous.fasting_duration,
            eating_window: previous.eating_window,
            end_time: previous.end_time(),
        }),
        next: Some(NextPeriodSnapshot {
            period_index: 2,
            start_time: next.start_time,
            fasting_duration: next.fasting_duration,
        }),
        settings: DragSettings {
            pixels_per_hour: 20.0,
            limits: DragLimits::default(),
            coupling,
            lower_bound: None,
            snap_step_hours: None,
            utc_offset_seconds: 0,
        },
    }
}

proptest! {
    #[test]
    fn drag_results_respect_duration_limits_and_neighbours(
        durations in prop::array::uniform3((4u32..(168 * 4), 4u32..(24 * 4))),
        gaps in (0i32..16, 0i32..16),
        (bar_type, edge) in edge_strategy(),
        coupling in coupling_strategy(),
        raw_delta in -400.0f64..400.0,
    ) {
        let periods = three_periods(durations, gaps);
        let state = drag_state(&periods, bar_type, edge, coupling);
        let (delta, updates) = resolve_drag_updates(&state, raw_delta);
        let limits = DragLimits::default();

        prop_assert!(delta.abs() <= raw_delta.abs() + EPSILON);
        prop_assert!(updates.windows(2).all(|pair| pair[0].period_index < pair[1].period_index));

        let updated = apply_period_updates(&periods, &updates);
        for period in &updated {
            prop_assert!(period.fasting_duration >= limits.min_fasting_hours - EPSILON);
            prop_assert!(period.fasting_duration <= limits.max_fasting_hours + EPSILON);
            prop_assert!(period.eating_window >= limits.min_eating_hours - EPSILON);
            prop_assert!(period.eating_window <= limits.max_eating_hours + EPSILON);
        }

        // Neighbours never overlap the dragged period, coupled or not.
        let tolerance = TimeDelta::milliseconds(1);
        prop_assert!(updated[0].end_time() <= updated[1].start_time + tolerance);
        prop_assert!(updated[1].end_time() <= updated[2].start_time + tolerance);

        if coupling == PeriodCoupling::Independent {
            prop_assert_eq!(&updated[0], &periods[0]);
            prop_assert_eq!(&updated[2], &periods[2]);
        }
    }

    #[test]
    fn snapped_deltas_land_on_the_step(
        raw_delta in -6.0f64..6.0,
        step_quarters in 1u32..8,
    ) {
        let periods = three_periods([(64, 32), (64, 32), (64, 32)], (40, 40));
        let mut state = drag_state(
            &periods,
            PhaseType::Eating,
            ResizeEdge::Right,
            PeriodCoupling::Independent,
        );
        let step = quarter_hours(step_quarters);
        state.settings.snap_step_hours = Some(step);

        let (delta, _) = resolve_drag_updates(&state, raw_delta);
        let steps = delta / step;
        prop_assert!((steps - steps.round()).abs() <= EPSILON);
    }

    #[test]
    fn motionless_drag_commits_snapshot_even_outside_limits(
        durations in prop::array::uniform3((1u32..(200 * 4), 0u32..(30 * 4))),
        gaps in (-8i32..16, -8i32..16),
        (bar_type, edge) in edge_strategy(),
        coupling in coupling_strategy(),
        lower_bound_quarters in prop::option::of(-8i64..8),
    ) {
        let periods = three_periods(durations, gaps);
        let mut state = drag_state(&periods, bar_type, edge, coupling);
        state.settings.lower_bound = lower_bound_quarters
            .map(|quarters| periods[1].start_time + TimeDelta::minutes(quarters * 15));

        let (delta, updates) = resolve_drag_updates(&state, 0.0);

        prop_assert_eq!(delta, 0.0);
        prop_assert_eq!(apply_period_updates(&periods, &updates), periods);
    }

    #[test]
    fn out_of_limit_durations_never_move_further_out(
        durations in prop::array::uniform3((1u32..(200 * 4), 0u32..(30 * 4))),
        (bar_type, edge) in edge_strategy(),
        coupling in coupling_strategy(),
        raw_delta in -400.0f64..400.0,
    ) {
        let periods = three_periods(durations, (0, 0));
        let state = drag_state(&periods, bar_type, edge, coupling);
        let (_, updates) = resolve_drag_updates(&state, raw_delta);
        let limits = DragLimits::default();

        let updated = apply_period_updates(&periods, &updates);
        for (before, after) in periods.iter().zip(&updated) {
            for (old, new, min, max) in [
                (
                    before.fasting_duration,
                    after.fasting_duration,
                    limits.min_fasting_hours,
                    limits.max_fasting_hours,
                ),
                (
                    before.eating_window,
                    after.eating_window,
                    limits.min_eating_hours,
                    limits.max_eating_hours,
                ),
            ] {
                prop_assert!(new >= old.min(min) - EPSILON, "{old} -> {new}");
                prop_assert!(new <= old.max(max) + EPSILON, "{old} -> {new}");
            }
        }
    }
}
