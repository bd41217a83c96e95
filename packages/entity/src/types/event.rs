use crate::error::{FieldErrors, ValidationError};
use crate::utils::local_time;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How often an event repeats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Once,
    Daily,
    Weekly,
    Monthly,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Once => write!(f, "once"),
            Frequency::Daily => write!(f, "daily"),
            Frequency::Weekly => write!(f, "weekly"),
            Frequency::Monthly => write!(f, "monthly"),
        }
    }
}

/// A scheduled community event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityEvent {
    #[serde(skip)]
    pub id: String,

    /// Owning community document ID
    pub community_id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    /// Local start time
    #[serde(rename = "startDate", with = "local_time")]
    pub start: NaiveDateTime,

    /// Local end time, strictly after `start`
    #[serde(rename = "endDate", with = "local_time")]
    pub end: NaiveDateTime,

    #[serde(default)]
    pub frequency: Frequency,
}

/// Event form input, validated against the caller's clock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub community_id: String,
    pub title: String,
    pub description: String,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub frequency: Frequency,
}

impl EventDraft {
    pub fn new(community_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self { community_id: community_id.into(), title: title.into(), ..Self::default() }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_range(mut self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Set the range from separate date and time form fields
    /// (`2025-03-01`, `18:30`). A blank or unparseable pair leaves that end
    /// unset, which [`validate`](Self::validate) reports as required.
    pub fn with_form_times(
        mut self,
        start_date: &str,
        start_time: &str,
        end_date: &str,
        end_time: &str,
    ) -> Self {
        self.start = local_time::parse(start_date, start_time);
        self.end = local_time::parse(end_date, end_time);
        self
    }

    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    /// Check the draft and produce a writable event.
    ///
    /// Every failing field is reported at once. An end time that is both in
    /// the past and not after the start reports only the ordering error.
    pub fn validate(self, now: NaiveDateTime) -> Result<NewEvent, ValidationError> {
        let mut errors = FieldErrors::new();

        if self.community_id.trim().is_empty() {
            return Err(ValidationError::Missing { field: "community_id" });
        }

        let title = self.title.trim().to_string();
        if title.is_empty() {
            errors.insert("title", "Title is required.");
        }

        match (self.start, self.end) {
            (Some(start), Some(end)) => {
                if start < now {
                    errors.insert("start", "Start time must be in the future.");
                }
                if end < now {
                    errors.insert("end", "End time must be in the future.");
                }
                if end <= start {
                    errors.insert("end", "End time must be after start time.");
                }
            }
            (start, end) => {
                if start.is_none() {
                    errors.insert("start", "Start date and time are required.");
                }
                if end.is_none() {
                    errors.insert("end", "End date and time are required.");
                }
            }
        }

        errors.into_result()?;

        match (self.start, self.end) {
            (Some(start), Some(end)) => Ok(NewEvent {
                community_id: self.community_id,
                title,
                description: self.description.trim().to_string(),
                start,
                end,
                frequency: self.frequency,
            }),
            _ => Err(ValidationError::Missing { field: "start" }),
        }
    }
}

/// A validated event ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    community_id: String,
    title: String,
    description: String,
    start: NaiveDateTime,
    end: NaiveDateTime,
    frequency: Frequency,
}

impl NewEvent {
    pub fn community_id(&self) -> &str {
        &self.community_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn into_event(self) -> CommunityEvent {
        CommunityEvent {
            id: String::new(),
            community_id: self.community_id,
            title: self.title,
            description: self.description,
            start: self.start,
            end: self.end,
            frequency: self.frequency,
        }
    }
}
