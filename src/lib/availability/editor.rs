use std::error::Error;

use chrono::NaiveDate;
use log::{info, warn};

use super::{
    availability_client::AvailabilityClient,
    grid::{hydrate, serialize, stored_for_week},
    models::interval_model::AvailabilityInterval,
    selection::{PointerEvent, SelectionController},
    week::WeekWindow,
};

/// A teacher's availability editor for one displayed week at a time.
///
/// `intervals` mirrors what the persistence layer holds for the teacher;
/// the selection is rebuilt from it whenever the displayed week changes.
pub struct AvailabilityEditor {
    week: WeekWindow,
    controller: SelectionController,
    intervals: Vec<AvailabilityInterval>,
    slot_duration: u32,
}

impl AvailabilityEditor {
    pub fn new(
        intervals: Vec<AvailabilityInterval>,
        reference_date: NaiveDate,
        slot_duration: u32,
        read_only: bool,
    ) -> Self {
        let mut editor = Self {
            week: WeekWindow::containing(reference_date),
            controller: SelectionController::new(read_only),
            intervals,
            slot_duration,
        };
        editor.rehydrate();
        editor
    }

    pub fn week(&self) -> WeekWindow {
        self.week
    }

    pub fn controller(&self) -> &SelectionController {
        &self.controller
    }

    pub fn intervals(&self) -> &[AvailabilityInterval] {
        &self.intervals
    }

    pub fn slot_duration(&self) -> u32 {
        self.slot_duration
    }

    pub fn is_dirty(&self) -> bool {
        self.controller.is_dirty()
    }

    pub fn handle(&mut self, event: PointerEvent) -> bool {
        self.controller.handle(event)
    }

    fn rehydrate(&mut self) {
        let hydrated = hydrate(&self.intervals, self.week.week_start());
        info!(
            "Hydrated week {} from {} interval(s), {} cell(s) selected",
            self.week.iso_start(),
            hydrated.matched,
            hydrated.selected.len()
        );
        if hydrated.skipped > 0 {
            warn!(
                "Skipped {} malformed interval(s) for week {}",
                hydrated.skipped,
                self.week.iso_start()
            );
        }
        if self.controller.load(hydrated) {
            info!("Discarded unsaved changes");
        }
    }

    /// Shows another week; unsaved changes to the current one are dropped.
    pub fn switch_week(&mut self, week: WeekWindow) {
        self.week = week;
        self.rehydrate();
    }

    pub fn next_week(&mut self) {
        self.switch_week(self.week.next());
    }

    pub fn previous_week(&mut self) {
        self.switch_week(self.week.previous());
    }

    /// What a save would store for the displayed week.
    pub fn pending_intervals(&self) -> Vec<AvailabilityInterval> {
        serialize(
            self.controller.selected(),
            self.week.week_start(),
            self.slot_duration,
        )
    }

    /// Replaces the displayed week in the store with the current selection.
    ///
    /// The selection is kept as is whether or not the store accepts it; only
    /// an acknowledged save clears the dirty flag.
    pub async fn save<C: AvailabilityClient>(
        &mut self,
        client: &C,
        teacher_id: &str,
    ) -> Result<Vec<AvailabilityInterval>, Box<dyn Error>> {
        let pending = self.pending_intervals();
        let week_start = self.week.week_start();
        let stored = client.replace_week(teacher_id, week_start, &pending).await?;

        self.intervals
            .retain(|interval| !stored_for_week(interval, week_start));
        self.intervals.extend(stored.iter().cloned());
        self.controller.mark_saved();
        info!(
            "Saved {} interval(s) for week {}",
            stored.len(),
            self.week.iso_start()
        );
        Ok(stored)
    }

    pub async fn publish<C: AvailabilityClient>(
        &mut self,
        client: &C,
        interval_id: &str,
    ) -> Result<AvailabilityInterval, Box<dyn Error>> {
        let updated = client.publish(interval_id).await?;
        self.replace_cached(&updated);
        Ok(updated)
    }

    pub async fn unpublish<C: AvailabilityClient>(
        &mut self,
        client: &C,
        interval_id: &str,
    ) -> Result<AvailabilityInterval, Box<dyn Error>> {
        let updated = client.unpublish(interval_id).await?;
        self.replace_cached(&updated);
        Ok(updated)
    }

    fn replace_cached(&mut self, updated: &AvailabilityInterval) {
        if let Some(cached) = self
            .intervals
            .iter_mut()
            .find(|interval| interval.id.is_some() && interval.id == updated.id)
        {
            *cached = updated.clone();
        }
    }
}
