use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::database::query_builder::Column;
use crate::database::repository::{Repository, Resource, OWNER_COLUMN};
use crate::database::store::SqlValue;

/// One journal entry. `activity_name` is a free-text label, not a
/// reference to an activity row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: i32,
    pub username: String,
    pub journal_entry: String,
    pub journal_date: NaiveDate,
    pub activity_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewJournalEntry {
    pub journal_entry: String,
    pub journal_date: NaiveDate,
    #[serde(default)]
    pub activity_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct JournalChanges {
    #[serde(default)]
    pub journal_entry: Option<String>,
    #[serde(default)]
    pub journal_date: Option<NaiveDate>,
    #[serde(default)]
    pub activity_name: Option<String>,
}

impl JournalChanges {
    pub fn is_empty(&self) -> bool {
        self.journal_entry.is_none() && self.journal_date.is_none() && self.activity_name.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalField {
    Entry,
    Date,
    ActivityName,
}

impl Column for JournalField {
    fn column(self) -> &'static str {
        match self {
            JournalField::Entry => "journal_entry",
            JournalField::Date => "journal_date",
            JournalField::ActivityName => "activity_name",
        }
    }
}

pub struct Journal;

const JOURNAL_COLUMNS: &[&str] = &["id", "username", "journal_entry", "journal_date", "activity_name"];

impl Resource for Journal {
    const TABLE: &'static str = "journal";
    const COLUMNS: &'static [&'static str] = JOURNAL_COLUMNS;
    // Updates return the whole entry, owner included
    const UPDATE_COLUMNS: &'static [&'static str] = JOURNAL_COLUMNS;

    type Record = JournalEntry;
    type New = NewJournalEntry;
    type Changes = JournalChanges;
    type Field = JournalField;
    type Projection = JournalEntry;

    fn insert_values(owner: &str, new: NewJournalEntry) -> Vec<(&'static str, SqlValue)> {
        let mut values = vec![
            (OWNER_COLUMN, SqlValue::from(owner)),
            ("journal_entry", SqlValue::from(new.journal_entry)),
            ("journal_date", SqlValue::from(new.journal_date)),
        ];
        if let Some(v) = new.activity_name {
            values.push(("activity_name", v.into()));
        }
        values
    }

    fn changed_fields(changes: JournalChanges) -> Vec<(JournalField, SqlValue)> {
        let mut fields = Vec::new();
        if let Some(v) = changes.journal_entry {
            fields.push((JournalField::Entry, v.into()));
        }
        if let Some(v) = changes.journal_date {
            fields.push((JournalField::Date, v.into()));
        }
        if let Some(v) = changes.activity_name {
            fields.push((JournalField::ActivityName, v.into()));
        }
        fields
    }

    fn not_found(id: i32) -> String {
        format!("Journal entry with ID {} not found.", id)
    }
}

/// Journal model
pub type JournalEntries = Repository<Journal>;
