use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

use super::ValidationErrors;

/// `datetime-local` input value, minute precision
const FORM_MINUTES: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]");
/// `datetime-local` input value, second precision
const FORM_SECONDS: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const DISPLAY: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i32,
    pub contract_id: i32,
    pub rate: i32,
    pub description: String,
    pub start_time: OffsetDateTime,
    pub end_time: OffsetDateTime,
    /// Minutes
    pub duration: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Task {
    pub fn formatted_duration(&self) -> String {
        format_duration(self.duration)
    }
}

/// Values a task form falls back to for fields left blank
#[derive(Debug, Clone, Copy)]
pub struct TaskDefaults {
    pub rate: i32,
    pub start_time: OffsetDateTime,
    pub end_time: OffsetDateTime,
}

impl TaskDefaults {
    /// Defaults for a fresh task on a contract: both times set to now.
    pub fn new_on_contract(rate: i32) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            rate,
            start_time: now,
            end_time: now,
        }
    }
}

impl From<&Task> for TaskDefaults {
    fn from(task: &Task) -> Self {
        Self {
            rate: task.rate,
            start_time: task.start_time,
            end_time: task.end_time,
        }
    }
}

/// Task create/edit form. All fields arrive as text and are checked by [`TaskForm::validate`].
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TaskForm {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub rate: String,
}

/// A checked task form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInput {
    pub description: String,
    pub start_time: OffsetDateTime,
    pub end_time: OffsetDateTime,
    pub duration: i32,
    pub rate: i32,
}

impl TaskForm {
    /// Prefill the form from stored values
    pub fn from_task(task: &Task) -> Self {
        Self {
            description: task.description.clone(),
            start_time: format_form_datetime(task.start_time),
            end_time: format_form_datetime(task.end_time),
            duration: task.duration.to_string(),
            rate: task.rate.to_string(),
        }
    }

    /// Blank form whose times read "now"
    pub fn blank(defaults: TaskDefaults) -> Self {
        Self {
            description: String::new(),
            start_time: format_form_datetime(defaults.start_time),
            end_time: format_form_datetime(defaults.end_time),
            duration: String::new(),
            rate: defaults.rate.to_string(),
        }
    }

    /// Blank fields take their value from `defaults`; a blank duration is derived from the
    /// time span. Zero or negative durations are accepted as entered.
    pub fn validate(&self, defaults: TaskDefaults) -> Result<TaskInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let start_time =
            self.time_field(&mut errors, "start_time", "Start time", &self.start_time);
        let end_time = self.time_field(&mut errors, "end_time", "End time", &self.end_time);

        let rate = if self.rate.trim().is_empty() {
            Some(defaults.rate)
        } else {
            errors.parse_int("rate", "Rate", &self.rate)
        };

        let duration = if self.duration.trim().is_empty() {
            None
        } else {
            errors.parse_int("duration", "Duration", &self.duration)
        };

        if errors.has_any() {
            return Err(errors);
        }

        let start_time = start_time.unwrap_or(defaults.start_time);
        let end_time = end_time.unwrap_or(defaults.end_time);
        let duration = duration.unwrap_or_else(|| span_minutes(start_time, end_time));

        Ok(TaskInput {
            description: self.description.trim().to_string(),
            start_time,
            end_time,
            duration,
            rate: rate.unwrap_or(defaults.rate),
        })
    }

    fn time_field(
        &self,
        errors: &mut ValidationErrors,
        field: &str,
        name: &str,
        value: &str,
    ) -> Option<OffsetDateTime> {
        if value.trim().is_empty() {
            return None;
        }
        let parsed = parse_form_datetime(value);
        if parsed.is_none() {
            errors.add(field, format!("{} is not a valid date and time.", name));
        }
        parsed
    }
}

/// Whole minutes between `start` and `end`, never negative
pub fn span_minutes(start: OffsetDateTime, end: OffsetDateTime) -> i32 {
    let minutes = (end - start).whole_minutes().max(0);
    i32::try_from(minutes).unwrap_or(i32::MAX)
}

/// Human readable duration: `"45m"`, `"2h"`, `"1h 30m"`. Exactly one hour still reads `"60m"`.
pub fn format_duration(minutes: i32) -> String {
    if minutes > 60 {
        let rest = minutes % 60;
        if rest == 0 {
            return format!("{}h", minutes / 60);
        }
        return format!("{}h {}m", minutes / 60, rest);
    }
    format!("{}m", minutes)
}

/// Parse a `datetime-local` value as UTC
pub fn parse_form_datetime(value: &str) -> Option<OffsetDateTime> {
    let value = value.trim();
    PrimitiveDateTime::parse(value, FORM_MINUTES)
        .or_else(|_| PrimitiveDateTime::parse(value, FORM_SECONDS))
        .ok()
        .map(PrimitiveDateTime::assume_utc)
}

pub fn format_form_datetime(value: OffsetDateTime) -> String {
    value.format(FORM_MINUTES).unwrap_or_default()
}

pub fn format_display_datetime(value: OffsetDateTime) -> String {
    value.format(DISPLAY).unwrap_or_default()
}
