//! Wire format of the document-database task store.

use crate::mirror::domain::{
    DueDate, TaskDraft, TaskId, TaskPatch, TaskRecord, extract_issue_key,
    mapping::{parse_priority_label, parse_status_label},
};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::collections::HashMap;

pub(super) const TITLE: &str = "Name";
pub(super) const STATUS: &str = "Status";
pub(super) const PRIORITY: &str = "Priority";
pub(super) const DETAILS: &str = "Details";
pub(super) const DUE_DATE: &str = "Due Date";
pub(super) const ISSUE_LINK: &str = "Linear Issue";
pub(super) const PULL_REQUEST: &str = "GitHub PR";
pub(super) const ASSIGNEE: &str = "Assignee";

/// Rich-text segments longer than this are rejected by the store.
const RICH_TEXT_LIMIT: usize = 2000;

#[derive(Debug, Deserialize)]
pub(super) struct QueryPage {
    pub results: Vec<Page>,
    #[serde(default)]
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Page {
    pub id: String,
    #[serde(default)]
    pub properties: HashMap<String, Property>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(super) enum Property {
    Title { title: Vec<RichText> },
    RichText { rich_text: Vec<RichText> },
    Select { select: Option<SelectOption> },
    Status { status: Option<SelectOption> },
    Date { date: Option<DateValue> },
    People { people: Vec<Person> },
    Url { url: Option<String> },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Deserialize)]
pub(super) struct RichText {
    #[serde(default)]
    pub plain_text: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct SelectOption {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct DateValue {
    pub start: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Person {
    pub name: Option<String>,
}

impl Property {
    fn text(&self) -> Option<String> {
        let segments = match self {
            Self::Title { title } => title,
            Self::RichText { rich_text } => rich_text,
            _ => return None,
        };
        let joined = segments
            .iter()
            .map(|segment| segment.plain_text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        (!joined.trim().is_empty()).then_some(joined)
    }

    fn option_name(&self) -> Option<&str> {
        match self {
            Self::Select { select: option } | Self::Status { status: option } => {
                option.as_ref().map(|value| value.name.as_str())
            }
            _ => None,
        }
    }
}

impl Page {
    fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    fn text(&self, name: &str) -> Option<String> {
        self.property(name).and_then(Property::text)
    }

    /// Converts the page into a task snapshot.
    ///
    /// Unreadable optional properties are dropped rather than failing the
    /// whole listing.
    pub fn into_record(self) -> Result<TaskRecord, String> {
        let id = TaskId::new(self.id.as_str()).map_err(|err| err.to_string())?;
        let title = self.text(TITLE).unwrap_or_default();
        let status = parse_status_label(self.property(STATUS).and_then(Property::option_name));
        let priority =
            parse_priority_label(self.property(PRIORITY).and_then(Property::option_name));

        let mut record = TaskRecord::new(id, title).with_status(status);
        if let Some(value) = priority {
            record = record.with_priority(value);
        }
        if let Some(details) = self.text(DETAILS) {
            record = record.with_details(details);
        }
        if let Some(Property::Date {
            date: Some(DateValue { start: Some(start) }),
        }) = self.property(DUE_DATE)
            && let Ok(due) = DueDate::parse(start)
        {
            record = record.with_due_date(due);
        }
        if let Some(key) = self.text(ISSUE_LINK).as_deref().and_then(extract_issue_key) {
            record = record.with_issue_key(key);
        }
        if let Some(Property::Url { url: Some(url) }) = self.property(PULL_REQUEST) {
            record = record.with_pull_request_url(url.clone());
        }
        if let Some(Property::People { people }) = self.property(ASSIGNEE) {
            record = record.with_assignees(people.iter().filter_map(|person| person.name.clone()));
        }
        Ok(record)
    }
}

fn rich_text(content: &str) -> Value {
    let chars: Vec<char> = content.chars().collect();
    let segments: Vec<Value> = chars
        .chunks(RICH_TEXT_LIMIT)
        .map(|chunk| json!({ "text": { "content": chunk.iter().collect::<String>() } }))
        .collect();
    json!({ "rich_text": segments })
}

fn select(name: &str) -> Value {
    json!({ "select": { "name": name } })
}

fn date(due: Option<DueDate>) -> Value {
    match due {
        Some(value) => json!({ "date": { "start": value.to_string() } }),
        None => json!({ "date": null }),
    }
}

/// Builds the property bag for a create call.
pub(super) fn draft_properties(draft: &TaskDraft) -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert(
        TITLE.to_owned(),
        json!({ "title": [{ "text": { "content": draft.title } }] }),
    );
    properties.insert(STATUS.to_owned(), select(draft.status.label()));
    if let Some(priority) = draft.priority {
        properties.insert(PRIORITY.to_owned(), select(priority.label()));
    }
    if let Some(details) = &draft.details {
        properties.insert(DETAILS.to_owned(), rich_text(details));
    }
    if draft.due_date.is_some() {
        properties.insert(DUE_DATE.to_owned(), date(draft.due_date));
    }
    if let Some(link) = &draft.issue_link {
        properties.insert(ISSUE_LINK.to_owned(), rich_text(&link.to_text()));
    }
    if let Some(url) = &draft.pull_request_url {
        properties.insert(PULL_REQUEST.to_owned(), json!({ "url": url }));
    }
    properties
}

/// Builds the property bag for an update call; untouched fields are
/// omitted.
pub(super) fn patch_properties(patch: &TaskPatch) -> Map<String, Value> {
    let mut properties = Map::new();
    if let Some(status) = patch.status {
        properties.insert(STATUS.to_owned(), select(status.label()));
    }
    if let Some(priority) = patch.priority {
        properties.insert(PRIORITY.to_owned(), select(priority.label()));
    }
    if let Some(due) = patch.due_date {
        properties.insert(DUE_DATE.to_owned(), date(due));
    }
    if let Some(details) = &patch.details {
        properties.insert(DETAILS.to_owned(), rich_text(details));
    }
    if let Some(link) = &patch.issue_link {
        properties.insert(ISSUE_LINK.to_owned(), rich_text(&link.to_text()));
    }
    if let Some(url) = &patch.pull_request_url {
        properties.insert(PULL_REQUEST.to_owned(), json!({ "url": url }));
    }
    if let Some(assignee) = &patch.assignee {
        properties.insert(
            ASSIGNEE.to_owned(),
            json!({ "people": [{ "name": assignee }] }),
        );
    }
    properties
}
