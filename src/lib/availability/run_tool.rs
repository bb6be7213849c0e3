use std::error::Error;

use chrono::{Local, NaiveDate};
use log::{debug, info, warn};

use super::{
    availability_client::AvailabilityClient,
    editor::AvailabilityEditor,
    helpers::{describe_week, diff_weeks, pointer_event, read_pointer_script, render_grid},
    models::{interval_model::AvailabilityInterval, Args, Config},
};

/// What a run did, for the caller to report or assert on.
#[derive(Debug, Default)]
pub struct RunReport {
    pub week_start: Option<NaiveDate>,
    pub pending: Vec<AvailabilityInterval>,
    pub saved: Option<Vec<AvailabilityInterval>>,
    pub diff: Option<String>,
    pub toggled: Vec<AvailabilityInterval>,
}

pub async fn run<C: AvailabilityClient>(
    client: C,
    args: &Args,
    config: Config,
) -> Result<RunReport, Box<dyn Error>> {
    let intervals = client.list_availability(&args.teacher_id).await?;
    info!(
        "Found {} interval(s) for teacher {}",
        intervals.len(),
        args.teacher_id
    );

    let reference_date = args.week_of.unwrap_or_else(|| Local::now().date_naive());
    let slot_duration = args.slot_duration.unwrap_or(config.default_slot_duration);
    let mut editor =
        AvailabilityEditor::new(intervals, reference_date, slot_duration, args.read_only);
    let mut report = RunReport {
        week_start: Some(editor.week().week_start()),
        ..RunReport::default()
    };

    info!(
        "Editing week {} with {}-minute slots",
        editor.week().iso_start(),
        editor.slot_duration()
    );

    /* Replay the pointer script over the grid */
    if let Some(script_path) = &args.pointer_events_json_path {
        if editor.controller().is_read_only() {
            warn!("Grid is read only, pointer events will be ignored");
        }
        for record in read_pointer_script(script_path)? {
            match pointer_event(&record) {
                Some(event) => {
                    let changed = editor.handle(event);
                    debug!("{:?} changed grid: {}", event, changed);
                }
                None => warn!("Ignoring pointer event outside the grid: {:?}", record),
            }
        }
    }
    info!(
        "Week of {}:\n{}",
        editor.week().iso_start(),
        render_grid(editor.controller().selected(), &editor.week())
    );

    report.pending = editor.pending_intervals();
    if args.dry_run {
        let stored = describe_week(editor.intervals(), editor.week().week_start());
        let pending = describe_week(&report.pending, editor.week().week_start());
        report.diff = diff_weeks(&stored, &pending);
        match &report.diff {
            Some(diff) => info!("Dry run, would change:\n{}", diff),
            None => info!("Dry run, nothing would change"),
        }
    } else if editor.is_dirty() {
        report.saved = Some(editor.save(&client, &args.teacher_id).await?);
    } else {
        info!("No changes to save");
    }

    for id in args.publish.iter() {
        let interval = editor.publish(&client, id).await?;
        info!("Published interval {}", id);
        report.toggled.push(interval);
    }
    for id in args.unpublish.iter() {
        let interval = editor.unpublish(&client, id).await?;
        info!("Unpublished interval {}", id);
        report.toggled.push(interval);
    }

    Ok(report)
}
