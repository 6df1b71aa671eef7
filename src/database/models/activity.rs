use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::database::query_builder::Column;
use crate::database::repository::{Repository, Resource, OWNER_COLUMN};
use crate::database::store::SqlValue;

/// Scheduled activity in a user's calendar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: i32,
    pub username: String,
    pub activity_name: String,
    pub activity_description: Option<String>,
    pub repeat_frequency: Option<String>,
    pub start_time: Option<NaiveTime>,
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewActivity {
    pub activity_name: String,
    #[serde(default)]
    pub activity_description: Option<String>,
    #[serde(default)]
    pub repeat_frequency: Option<String>,
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

/// Only name and description may change after creation
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ActivityChanges {
    #[serde(default)]
    pub activity_name: Option<String>,
    #[serde(default)]
    pub activity_description: Option<String>,
}

impl ActivityChanges {
    pub fn is_empty(&self) -> bool {
        self.activity_name.is_none() && self.activity_description.is_none()
    }
}

/// What an update hands back: owner and schedule fields are left out
/// even though they are unchanged in storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    pub id: i32,
    pub activity_name: String,
    pub activity_description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityField {
    Name,
    Description,
}

impl Column for ActivityField {
    fn column(self) -> &'static str {
        match self {
            ActivityField::Name => "activity_name",
            ActivityField::Description => "activity_description",
        }
    }
}

pub struct Activities;

impl Resource for Activities {
    const TABLE: &'static str = "activities_calendar";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "username",
        "activity_name",
        "activity_description",
        "repeat_frequency",
        "start_time",
        "start_date",
    ];
    const UPDATE_COLUMNS: &'static [&'static str] = &["id", "activity_name", "activity_description"];

    type Record = Activity;
    type New = NewActivity;
    type Changes = ActivityChanges;
    type Field = ActivityField;
    type Projection = ActivitySummary;

    fn insert_values(owner: &str, new: NewActivity) -> Vec<(&'static str, SqlValue)> {
        let mut values = vec![
            (OWNER_COLUMN, SqlValue::from(owner)),
            ("activity_name", SqlValue::from(new.activity_name)),
        ];
        if let Some(v) = new.activity_description {
            values.push(("activity_description", v.into()));
        }
        if let Some(v) = new.repeat_frequency {
            values.push(("repeat_frequency", v.into()));
        }
        if let Some(v) = new.start_time {
            values.push(("start_time", v.into()));
        }
        if let Some(v) = new.start_date {
            values.push(("start_date", v.into()));
        }
        values
    }

    fn changed_fields(changes: ActivityChanges) -> Vec<(ActivityField, SqlValue)> {
        let mut fields = Vec::new();
        if let Some(v) = changes.activity_name {
            fields.push((ActivityField::Name, v.into()));
        }
        if let Some(v) = changes.activity_description {
            fields.push((ActivityField::Description, v.into()));
        }
        fields
    }

    fn not_found(id: i32) -> String {
        format!("No activity history: {}", id)
    }
}

/// Activity calendar model
pub type ActivitiesCalendar = Repository<Activities>;
