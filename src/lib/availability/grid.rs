//! The weekly selection grid and its conversion to and from stored intervals.
//!
//! The grid is 7 days by 16 one-hour cells (06:00 to 22:00). Each day is a
//! `u16` whose bit `h - FIRST_HOUR` is set when hour `h` is selected, so
//! contiguous runs fall out of bit scanning.
use std::fmt;

use chrono::NaiveDate;
use log::debug;

use super::{models::interval_model::AvailabilityInterval, week::DAYS_IN_WEEK};

/// First hour shown on the grid.
pub const FIRST_HOUR: u8 = 6;
/// Hour at which the grid ends (exclusive).
pub const END_HOUR: u8 = 22;

/// One (day, hour) unit of the visual weekly grid. Day 0 is Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeCell {
    day_of_week: u8,
    hour: u8,
}

impl TimeCell {
    /// Panics when the coordinates are off the grid; callers build cells from the fixed grid.
    pub fn new(day_of_week: u8, hour: u8) -> Self {
        assert!(
            day_of_week < DAYS_IN_WEEK,
            "day of week {day_of_week} out of range"
        );
        assert!(
            (FIRST_HOUR..END_HOUR).contains(&hour),
            "hour {hour} outside the visible grid"
        );
        Self { day_of_week, hour }
    }

    /// `None` when the coordinates are off the grid.
    pub fn checked(day_of_week: u8, hour: u8) -> Option<Self> {
        (day_of_week < DAYS_IN_WEEK && (FIRST_HOUR..END_HOUR).contains(&hour))
            .then_some(Self { day_of_week, hour })
    }

    pub fn day_of_week(&self) -> u8 {
        self.day_of_week
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    fn bit(&self) -> u16 {
        1 << (self.hour - FIRST_HOUR)
    }
}

impl fmt::Display for TimeCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}:00", self.day_of_week, self.hour)
    }
}

/// The cells currently marked available for the displayed week.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SelectedCellSet {
    days: [u16; DAYS_IN_WEEK as usize],
}

impl SelectedCellSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, cell: TimeCell) -> bool {
        self.days[cell.day_of_week as usize] & cell.bit() != 0
    }

    /// Returns `true` when the cell was not selected before.
    pub fn insert(&mut self, cell: TimeCell) -> bool {
        let day = &mut self.days[cell.day_of_week as usize];
        let added = *day & cell.bit() == 0;
        *day |= cell.bit();
        added
    }

    /// Returns `true` when the cell was selected before.
    pub fn remove(&mut self, cell: TimeCell) -> bool {
        let day = &mut self.days[cell.day_of_week as usize];
        let removed = *day & cell.bit() != 0;
        *day &= !cell.bit();
        removed
    }

    pub fn len(&self) -> usize {
        self.days.iter().map(|day| day.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.iter().all(|day| *day == 0)
    }

    pub fn clear(&mut self) {
        self.days = [0; DAYS_IN_WEEK as usize];
    }

    /// Selected hours of one day, ascending.
    pub fn hours_on(&self, day_of_week: u8) -> impl Iterator<Item = u8> + '_ {
        let mask = self.days[day_of_week as usize];
        (FIRST_HOUR..END_HOUR).filter(move |hour| mask & (1 << (hour - FIRST_HOUR)) != 0)
    }

    /// Cells ordered by day, then hour.
    pub fn iter(&self) -> impl Iterator<Item = TimeCell> + '_ {
        (0..DAYS_IN_WEEK).flat_map(move |day| {
            self.hours_on(day)
                .map(move |hour| TimeCell { day_of_week: day, hour })
        })
    }

    /// Maximal runs of consecutive selected hours on one day as `(start, end)`
    /// with `end` exclusive.
    pub fn runs_on(&self, day_of_week: u8) -> Vec<(u8, u8)> {
        let mut mask = self.days[day_of_week as usize] as u32;
        let mut runs = Vec::new();
        while mask != 0 {
            let start = mask.trailing_zeros();
            let len = (!(mask >> start)).trailing_zeros();
            runs.push((FIRST_HOUR + start as u8, FIRST_HOUR + (start + len) as u8));
            mask &= !(((1u32 << len) - 1) << start);
        }
        runs
    }
}

impl FromIterator<TimeCell> for SelectedCellSet {
    fn from_iter<I: IntoIterator<Item = TimeCell>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl Extend<TimeCell> for SelectedCellSet {
    fn extend<I: IntoIterator<Item = TimeCell>>(&mut self, iter: I) {
        for cell in iter {
            self.insert(cell);
        }
    }
}

/// Result of rebuilding a grid from stored intervals.
///
/// Loading it into a [`SelectionController`](super::selection::SelectionController)
/// clears the unsaved-changes flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hydrated {
    pub selected: SelectedCellSet,
    /// Intervals that applied to the week and were expanded.
    pub matched: usize,
    /// Intervals that applied to the week but were malformed.
    pub skipped: usize,
}

/// Hour component of `HH:MM` or `HH:MM:SS`. `24:00` is accepted as the end of the day.
pub fn parse_hour(time: &str) -> Option<u32> {
    let fields = time
        .trim()
        .split(':')
        .map(|field| field.parse::<u32>().ok())
        .collect::<Option<Vec<_>>>()?;
    let valid = match fields.as_slice() {
        [24, 0] | [24, 0, 0] => true,
        &[hour, minute] => hour < 24 && minute < 60,
        &[hour, minute, second] => hour < 24 && minute < 60 && second < 60,
        _ => false,
    };
    valid.then(|| fields[0])
}

pub fn format_hour(hour: u8) -> String {
    format!("{:02}:00", hour)
}

/// Date part of `effectiveDate`, accepting full timestamps. Blank counts as absent.
fn effective_day(interval: &AvailabilityInterval) -> Option<&str> {
    let date = interval.effective_date.as_deref()?.trim();
    let date = date.split('T').next().unwrap_or(date);
    (!date.is_empty()).then_some(date)
}

/// Whether the interval belongs to exactly this week; replacing a week supersedes these.
pub fn stored_for_week(interval: &AvailabilityInterval, week_start: NaiveDate) -> bool {
    effective_day(interval) == Some(week_start.format("%Y-%m-%d").to_string().as_str())
}

/// Like [`stored_for_week`], but an interval without `effectiveDate` applies to every week.
pub fn applies_to_week(interval: &AvailabilityInterval, week_start: NaiveDate) -> bool {
    effective_day(interval).is_none() || stored_for_week(interval, week_start)
}

/// Whole-hour span `[start, end)` of a stored interval, if it is well formed.
fn hour_span(interval: &AvailabilityInterval) -> Option<(u32, u32)> {
    if interval.day_of_week >= DAYS_IN_WEEK {
        return None;
    }
    let start = parse_hour(interval.start_time.as_deref()?)?;
    let end = parse_hour(interval.end_time.as_deref()?)?;
    Some((start, end))
}

/// Rebuilds the selection for the week starting at `week_start`.
///
/// Each interval is walked from its start hour in `slotDuration` steps; only
/// steps landing on a whole hour inside the visible grid become cells.
pub fn hydrate(intervals: &[AvailabilityInterval], week_start: NaiveDate) -> Hydrated {
    let mut hydrated = Hydrated::default();

    for interval in intervals
        .iter()
        .filter(|interval| applies_to_week(interval, week_start))
    {
        let Some((start, end)) = hour_span(interval) else {
            debug!(
                "Skipping malformed interval {:?} on day {}",
                interval.id, interval.day_of_week
            );
            hydrated.skipped += 1;
            continue;
        };

        let step = match interval.slot_duration {
            0 => 60,
            minutes => minutes,
        };
        let mut minute = start * 60;
        while minute < end * 60 {
            if minute % 60 == 0 {
                if let Ok(hour) = u8::try_from(minute / 60) {
                    if let Some(cell) = TimeCell::checked(interval.day_of_week, hour) {
                        hydrated.selected.insert(cell);
                    }
                }
            }
            match minute.checked_add(step) {
                Some(next) => minute = next,
                None => break,
            }
        }
        hydrated.matched += 1;
    }

    hydrated
}

/// Encodes the selection as one unpublished interval per maximal run of
/// consecutive hours, ordered by day and start.
///
/// Contiguity is judged in whole hours whatever `slot_duration` is; the
/// duration is attached as metadata only.
pub fn serialize(
    selected: &SelectedCellSet,
    week_start: NaiveDate,
    slot_duration: u32,
) -> Vec<AvailabilityInterval> {
    let effective_date = week_start.format("%Y-%m-%d").to_string();

    (0..DAYS_IN_WEEK)
        .flat_map(|day| {
            selected
                .runs_on(day)
                .into_iter()
                .map(move |(start, end)| (day, start, end))
        })
        .map(|(day, start, end)| AvailabilityInterval {
            id: None,
            day_of_week: day,
            start_time: Some(format_hour(start)),
            end_time: Some(format_hour(end)),
            slot_duration,
            is_published: false,
            effective_date: Some(effective_date.clone()),
            expiry_date: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_key_matches_grid_format() {
        assert_eq!(TimeCell::new(2, 9).to_string(), "2-09:00");
    }

    #[test]
    #[should_panic]
    fn cell_before_grid_is_rejected() {
        TimeCell::new(0, 5);
    }

    #[test]
    #[should_panic]
    fn cell_past_saturday_is_rejected() {
        TimeCell::new(7, 10);
    }

    #[test]
    fn checked_cell_bounds() {
        assert!(TimeCell::checked(6, 21).is_some());
        assert!(TimeCell::checked(6, 22).is_none());
        assert!(TimeCell::checked(0, 6).is_some());
    }

    #[test]
    fn runs_cover_full_day() {
        let set: SelectedCellSet = (FIRST_HOUR..END_HOUR).map(|h| TimeCell::new(5, h)).collect();
        assert_eq!(set.runs_on(5), vec![(6, 22)]);
        assert_eq!(set.len(), 16);
    }

    #[test]
    fn runs_split_on_gaps() {
        let set: SelectedCellSet = [6, 7, 9, 12, 13, 14, 21]
            .into_iter()
            .map(|h| TimeCell::new(0, h))
            .collect();
        assert_eq!(set.runs_on(0), vec![(6, 8), (9, 10), (12, 15), (21, 22)]);
        assert!(set.runs_on(1).is_empty());
    }

    #[test]
    fn insert_and_remove_report_changes() {
        let mut set = SelectedCellSet::new();
        let cell = TimeCell::new(3, 14);
        assert!(set.insert(cell));
        assert!(!set.insert(cell));
        assert!(set.contains(cell));
        assert!(set.remove(cell));
        assert!(!set.remove(cell));
        assert!(set.is_empty());
    }

    #[test]
    fn parse_hour_accepts_seconds() {
        assert_eq!(parse_hour("09:00"), Some(9));
        assert_eq!(parse_hour("17:30:00"), Some(17));
        assert_eq!(parse_hour("nine"), None);
        assert_eq!(parse_hour("24:00"), Some(24));
        assert_eq!(parse_hour("24:30"), None);
        assert_eq!(parse_hour("9"), None);
    }
}
