//! Events, as stored in a remote document database

use serde_json::{Map, Value};
use chrono::NaiveDate;

use crate::event::{Event, EventId, DATE_FORMAT};

/// A remote document: an ID and its fields
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    id: EventId,
    fields: Map<String, Value>,
}

impl Document {
    pub fn new(id: EventId, fields: Map<String, Value>) -> Self {
        Self { id, fields }
    }

    pub fn id(&self) -> &EventId { &self.id }
    pub fn fields(&self) -> &Map<String, Value> { &self.fields }
    pub fn into_fields(self) -> Map<String, Value> { self.fields }

    /// Returns the `date` field, as a string
    pub fn date_field(&self) -> Option<&str> {
        self.fields.get("date").and_then(|v| v.as_str())
    }

    /// Build the document that stores an event.
    ///
    /// A missing description is stored as an empty string, a missing photo as `null`.
    pub fn from_event(event: &Event) -> Self {
        let mut fields = Map::new();
        fields.insert("date".to_string(), Value::String(event.date().format(DATE_FORMAT).to_string()));
        fields.insert("title".to_string(), Value::String(event.title().to_string()));
        fields.insert("description".to_string(), Value::String(event.description().unwrap_or_default().to_string()));
        fields.insert("photo".to_string(), event.photo().map_or(Value::Null, |p| Value::String(p.to_string())));
        Self::new(event.id().clone(), fields)
    }

    /// Returns the event this document stores, or `None` if it lacks a valid date or a title
    pub fn to_event(&self) -> Option<Event> {
        let date = self.date_field()
            .and_then(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).ok())?;
        let title = self.string_field("title").filter(|t| t.is_empty() == false)?;
        Some(Event::new_with_parameters(
            self.id.clone(), date, title,
            self.string_field("description"),
            self.string_field("photo"),
        ))
    }

    fn string_field(&self, name: &str) -> Option<String> {
        self.fields.get(name)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }
}
