use std::{error::Error, path::PathBuf};

use chrono::NaiveDate;
use futures::future;
use log::info;
use reqwest::{Client, Method, RequestBuilder};

use super::{
    grid::stored_for_week,
    helpers::{read_intervals, write_intervals},
    models::{interval_model::AvailabilityInterval, Config},
};

/// A trait, necessary for every entity that stores teachers' availability.
#[allow(async_fn_in_trait)]
pub trait AvailabilityClient {
    async fn list_availability(
        &self,
        teacher_id: &str,
    ) -> Result<Vec<AvailabilityInterval>, Box<dyn Error>>;

    /// Drops every interval of the teacher stored for `week_start` and stores
    /// `intervals` instead. Returns the stored records, ids included.
    async fn replace_week(
        &self,
        teacher_id: &str,
        week_start: NaiveDate,
        intervals: &[AvailabilityInterval],
    ) -> Result<Vec<AvailabilityInterval>, Box<dyn Error>>;

    async fn publish(&self, interval_id: &str) -> Result<AvailabilityInterval, Box<dyn Error>>;

    async fn unpublish(&self, interval_id: &str) -> Result<AvailabilityInterval, Box<dyn Error>>;
}

/// Talks to the availability REST API.
pub struct RestClient {
    http_client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl RestClient {
    pub fn new(http_client: Client, config: &Config) -> Self {
        Self {
            http_client,
            base_url: config.api_base_url.trim_end_matches('/').to_owned(),
            api_token: config.api_token.clone(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http_client
            .request(method, format!("{}{}", self.base_url, path));
        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn create_interval(
        &self,
        teacher_id: &str,
        interval: &AvailabilityInterval,
    ) -> Result<AvailabilityInterval, reqwest::Error> {
        let response = self
            .request(Method::POST, &format!("/teachers/{}/availability", teacher_id))
            .json(interval)
            .send()
            .await?
            .error_for_status()?;
        response.json().await
    }

    async fn set_published(
        &self,
        interval_id: &str,
        action: &str,
    ) -> Result<AvailabilityInterval, reqwest::Error> {
        info!("Sending {} for interval {}", action, interval_id);
        let response = self
            .request(
                Method::PATCH,
                &format!("/availability/{}/{}", interval_id, action),
            )
            .send()
            .await?
            .error_for_status()?;
        response.json().await
    }
}

impl AvailabilityClient for RestClient {
    async fn list_availability(
        &self,
        teacher_id: &str,
    ) -> Result<Vec<AvailabilityInterval>, Box<dyn Error>> {
        info!("Getting availability for teacher {}", teacher_id);
        let response = self
            .request(Method::GET, &format!("/teachers/{}/availability", teacher_id))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn replace_week(
        &self,
        teacher_id: &str,
        week_start: NaiveDate,
        intervals: &[AvailabilityInterval],
    ) -> Result<Vec<AvailabilityInterval>, Box<dyn Error>> {
        let effective_date = week_start.format("%Y-%m-%d").to_string();
        info!(
            "Replacing week {} of teacher {} with {} interval(s)",
            effective_date,
            teacher_id,
            intervals.len()
        );
        self.request(Method::DELETE, &format!("/teachers/{}/availability", teacher_id))
            .query(&[("effectiveDate", effective_date.as_str())])
            .send()
            .await?
            .error_for_status()?;

        let created = future::join_all(
            intervals
                .iter()
                .map(|interval| self.create_interval(teacher_id, interval)),
        )
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;
        Ok(created)
    }

    async fn publish(&self, interval_id: &str) -> Result<AvailabilityInterval, Box<dyn Error>> {
        Ok(self.set_published(interval_id, "publish").await?)
    }

    async fn unpublish(&self, interval_id: &str) -> Result<AvailabilityInterval, Box<dyn Error>> {
        Ok(self.set_published(interval_id, "unpublish").await?)
    }
}

/// Keeps one teacher's availability in a local JSON file.
pub struct JsonFileStore {
    pub path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn set_published(
        &self,
        interval_id: &str,
        is_published: bool,
    ) -> Result<AvailabilityInterval, Box<dyn Error>> {
        let mut intervals = read_intervals(&self.path)?;
        let interval = intervals
            .iter_mut()
            .find(|interval| interval.id.as_deref() == Some(interval_id))
            .ok_or_else(|| format!("no interval with id {}", interval_id))?;
        interval.is_published = is_published;
        let updated = interval.clone();
        write_intervals(&self.path, &intervals)?;
        Ok(updated)
    }
}

/* next free number for ids of the form "local-N" */
fn next_local_id(intervals: &[AvailabilityInterval]) -> u64 {
    intervals
        .iter()
        .filter_map(|interval| interval.id.as_deref()?.strip_prefix("local-")?.parse::<u64>().ok())
        .max()
        .map_or(1, |max| max + 1)
}

impl AvailabilityClient for JsonFileStore {
    async fn list_availability(
        &self,
        _teacher_id: &str,
    ) -> Result<Vec<AvailabilityInterval>, Box<dyn Error>> {
        read_intervals(&self.path)
    }

    async fn replace_week(
        &self,
        _teacher_id: &str,
        week_start: NaiveDate,
        intervals: &[AvailabilityInterval],
    ) -> Result<Vec<AvailabilityInterval>, Box<dyn Error>> {
        let mut stored = read_intervals(&self.path)?;
        // ids of superseded records are not handed out again
        let first_id = next_local_id(&stored);
        stored.retain(|interval| !stored_for_week(interval, week_start));

        let created = intervals
            .iter()
            .cloned()
            .zip(first_id..)
            .map(|(mut interval, id)| {
                interval.id = Some(format!("local-{}", id));
                interval
            })
            .collect::<Vec<_>>();
        stored.extend(created.iter().cloned());
        write_intervals(&self.path, &stored)?;
        Ok(created)
    }

    async fn publish(&self, interval_id: &str) -> Result<AvailabilityInterval, Box<dyn Error>> {
        self.set_published(interval_id, true)
    }

    async fn unpublish(&self, interval_id: &str) -> Result<AvailabilityInterval, Box<dyn Error>> {
        self.set_published(interval_id, false)
    }
}
