use std::{error::Error, fs::File, io::BufReader, path::Path};

use chrono::NaiveDate;
use log::{debug, info};
use similar::TextDiff;

use crate::availability::{
    grid::{format_hour, stored_for_week, SelectedCellSet, TimeCell, END_HOUR, FIRST_HOUR},
    models::{interval_model::AvailabilityInterval, PointerRecord},
    selection::PointerEvent,
    week::{WeekWindow, DAYS_IN_WEEK},
};

const DAY_NAMES: [&str; DAYS_IN_WEEK as usize] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub fn day_name(day_of_week: u8) -> &'static str {
    DAY_NAMES.get(day_of_week as usize).copied().unwrap_or("???")
}

pub fn log_all_intervals(intervals: &[AvailabilityInterval]) -> () {
    for interval in intervals.iter() {
        debug!(
            "Known interval {:?}: {} (effective {:?})",
            interval.id,
            format_interval_as_string(interval),
            interval.effective_date
        );
    }
}

/// Reads a JSON array of intervals. A missing file is an empty schedule.
pub fn read_intervals(path: &Path) -> Result<Vec<AvailabilityInterval>, Box<dyn Error>> {
    info!(
        "Reading intervals from {}",
        std::path::absolute(path)?.display()
    );
    if path.exists() {
        let intervals_file = BufReader::new(File::open(path)?);
        let intervals: Vec<AvailabilityInterval> = serde_json::from_reader(intervals_file)?;
        log_all_intervals(&intervals);
        Ok(intervals)
    } else {
        Ok(Vec::new())
    }
}

pub fn write_intervals(
    path: &Path,
    intervals: &[AvailabilityInterval],
) -> Result<(), Box<dyn Error>> {
    info!(
        "Writing {} intervals to {}",
        intervals.len(),
        std::path::absolute(path)?.display()
    );
    let intervals_file = File::create(path)?;

    Ok(serde_json::to_writer_pretty(intervals_file, intervals)?)
}

pub fn read_pointer_script(path: &Path) -> Result<Vec<PointerRecord>, Box<dyn Error>> {
    info!(
        "Reading pointer events from {}",
        std::path::absolute(path)?.display()
    );
    let script_file = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(script_file)?)
}

/// `None` for records pointing outside the grid.
pub fn pointer_event(record: &PointerRecord) -> Option<PointerEvent> {
    match *record {
        PointerRecord::Down { day, hour } => TimeCell::checked(day, hour).map(PointerEvent::Down),
        PointerRecord::Enter { day, hour } => TimeCell::checked(day, hour).map(PointerEvent::Enter),
        PointerRecord::Up => Some(PointerEvent::Up),
        PointerRecord::Leave => Some(PointerEvent::Leave),
    }
}

/* form a one-line description of an interval */
pub fn format_interval_as_string(interval: &AvailabilityInterval) -> String {
    format!(
        "{} {}-{} ({} min, {})",
        day_name(interval.day_of_week),
        interval.start_time.as_deref().unwrap_or("??:??"),
        interval.end_time.as_deref().unwrap_or("??:??"),
        interval.slot_duration,
        if interval.is_published { "published" } else { "draft" }
    )
}

/// The intervals stored for exactly this week, one per line, ordered by day and start.
pub fn describe_week(intervals: &[AvailabilityInterval], week_start: NaiveDate) -> String {
    let mut week = intervals
        .iter()
        .filter(|interval| stored_for_week(interval, week_start))
        .collect::<Vec<_>>();
    week.sort_by(|a, b| (a.day_of_week, &a.start_time).cmp(&(b.day_of_week, &b.start_time)));
    week.into_iter()
        .map(|interval| format!("{}\n", format_interval_as_string(interval)))
        .collect()
}

/// Unified diff between two week descriptions, `None` when they are equal.
pub fn diff_weeks(old_week: &str, new_week: &str) -> Option<String> {
    let diff = TextDiff::from_lines(old_week, new_week);
    if diff.ratio() != 1.0 {
        Some(diff.unified_diff().header("stored", "pending").to_string())
    } else {
        None
    }
}

/// Text rendering of the grid: one row per hour, one column per day.
pub fn render_grid(selected: &SelectedCellSet, week: &WeekWindow) -> String {
    let mut out = String::from("      ");
    for date in week.week_dates() {
        out.push_str(&date.format(" %a %d").to_string());
    }
    out.push('\n');

    for hour in FIRST_HOUR..END_HOUR {
        out.push_str(&format_hour(hour));
        out.push(' ');
        for day in 0..DAYS_IN_WEEK {
            let mark = if selected.contains(TimeCell::new(day, hour)) {
                "   ##  "
            } else {
                "   ..  "
            };
            out.push_str(mark);
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
#[path = "tests/tests.rs"]
mod tests;
