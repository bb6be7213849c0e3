use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use serde::{Deserialize, Serialize};

pub mod interval_model;

/// A model for describing ARGS of the tool.
/// Consists of:
/// 1. Path to config.json, that contains API connection parameters.
/// 2. ID of the teacher whose availability is edited.
/// 3. Any date inside the week to edit (defaults to today).
/// 4. Slot duration in minutes attached to saved intervals (defaults to the configured one).
/// 5. Path to a JSON list of pointer events to replay on the grid.
/// 6. Path to a local intervals.json; when given, it is used instead of the REST API.
/// 7. Dry run: show what would be saved without saving.
/// 8. Read only: pointer events are ignored.
/// 9. Interval IDs to publish and to unpublish.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, value_name = "FILE", default_value = "config.json")]
    pub config_json_path: PathBuf,
    #[arg(long)]
    pub teacher_id: String,
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub week_of: Option<NaiveDate>,
    #[arg(long, value_name = "MINUTES")]
    pub slot_duration: Option<u32>,
    #[arg(long, value_name = "FILE")]
    pub pointer_events_json_path: Option<PathBuf>,
    #[arg(long, value_name = "FILE")]
    pub intervals_json_path: Option<PathBuf>,
    #[arg(long)]
    pub dry_run: bool,
    #[arg(long)]
    pub read_only: bool,
    #[arg(long, value_name = "ID")]
    pub publish: Vec<String>,
    #[arg(long, value_name = "ID")]
    pub unpublish: Vec<String>,
}

fn default_slot_duration() -> u32 {
    60
}

/// A model for describing configuration of the tool.
/// Consists of:
/// 1. Base URL of the availability REST API (may be empty when a local intervals.json is used)
/// 2. Optional bearer token sent with every request
/// 3. Slot duration in minutes used when `--slot-duration` is not given
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    #[serde(default)]
    pub api_base_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_slot_duration")]
    pub default_slot_duration: u32,
}

/// One entry of a pointer script, as a UI layer would report it.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PointerRecord {
    Down { day: u8, hour: u8 },
    Enter { day: u8, hour: u8 },
    Up,
    Leave,
}
