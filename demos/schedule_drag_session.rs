use chrono::{TimeZone, Utc};
use period_chart::api::{ChartConfig, ChartObserver, ScheduleChart};
use period_chart::core::{ChartMode, Period, PeriodUpdate, PhaseType};
use period_chart::interaction::{PointerInput, ResizeEdge};
use period_chart::render::{NullRenderer, SeriesKind};
use period_chart::telemetry::init_default_tracing;

struct PrintingObserver;

impl ChartObserver for PrintingObserver {
    fn id(&self) -> &str {
        "printer"
    }

    fn on_periods_changed(&mut self, updates: &[PeriodUpdate]) {
        for update in updates {
            println!("period {} changed: {:?}", update.period_index, update.changes);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = init_default_tracing();

    let now = Utc
        .with_ymd_and_hms(2024, 1, 2, 9, 0, 0)
        .single()
        .ok_or("invalid now")?;
    let first_start = Utc
        .with_ymd_and_hms(2024, 1, 1, 20, 0, 0)
        .single()
        .ok_or("invalid start")?;

    let mut chart = ScheduleChart::new(
        NullRenderer::default(),
        ChartConfig::new(ChartMode::Edit).with_snap_step_hours(Some(0.25)),
        now,
        720.0,
    )?;
    chart.register_observer(Box::new(PrintingObserver))?;
    chart.set_periods(vec![
        Period::new("mon", first_start, 16.0, 8.0),
        Period::new("tue", first_start + chrono::TimeDelta::hours(24), 18.0, 6.0),
    ]);
    chart.render()?;

    let zone = chart
        .model()
        .zones
        .iter()
        .find(|zone| {
            zone.period_index == 1
                && zone.bar_type == PhaseType::Eating
                && zone.edge == ResizeEdge::Right
        })
        .ok_or("no resize zone for tuesday's eating window")?
        .clone();

    let origin = PointerInput::mouse(zone.edge_x(), zone.y + zone.height / 2.0);
    let pixels_per_hour = chart.layout().pixels_per_hour();
    chart.pointer_down(origin).ok_or("drag did not start")?;
    let preview = chart
        .pointer_move(PointerInput::mouse(origin.x + 1.5 * pixels_per_hour, origin.y))
        .ok_or("no preview")?;
    println!("tooltip: {}", preview.tooltip);
    println!("render during drag: {:?}", chart.render()?);

    chart.pointer_up(PointerInput::mouse(origin.x + 1.5 * pixels_per_hour, origin.y));
    println!("render after drag: {:?}", chart.render()?);

    let frame = chart.renderer().last_frame.as_ref().ok_or("nothing rendered")?;
    let bar_count = frame
        .series(SeriesKind::PeriodBars)
        .map_or(0, |layer| layer.primitive_count());
    println!("rows: {}, bar primitives: {bar_count}", chart.model().day_count());

    Ok(())
}
