//! Timeline events

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

/// The format of dates, both in the local blob and in remote documents (this is also what HTML date inputs use)
pub const DATE_FORMAT: &str = "%Y-%m-%d";


/// The identifier of an event.
///
/// This is either assigned by the remote store, or randomly generated locally
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId {
    content: String,
}

impl EventId {
    /// Generate a random EventId.
    pub fn random() -> Self {
        let random = Uuid::new_v4().to_hyphenated().to_string();
        Self { content: random }
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }
}

impl From<String> for EventId {
    fn from(content: String) -> Self {
        Self { content }
    }
}
impl From<&str> for EventId {
    fn from(content: &str) -> Self {
        Self { content: content.to_string() }
    }
}

impl Display for EventId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}



/// An event of the timeline (a "memory")
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    id: EventId,
    date: NaiveDate,
    title: String,
    description: Option<String>,
    /// A reference to a photo (usually a URL or a data URL)
    photo: Option<String>,
}

impl Event {
    /// Create a new event, with a random ID
    pub fn new(date: NaiveDate, title: String) -> Self {
        Self::new_with_parameters(EventId::random(), date, title, None, None)
    }

    /// Create an event that may already exist in a store
    ///
    /// Empty descriptions and photos are stored as `None`
    pub fn new_with_parameters(id: EventId, date: NaiveDate, title: String,
                               description: Option<String>, photo: Option<String>) -> Self
    {
        Self {
            id, date, title,
            description: description.filter(|d| d.is_empty() == false),
            photo: photo.filter(|p| p.is_empty() == false),
        }
    }

    pub fn id(&self) -> &EventId          { &self.id }
    pub fn date(&self) -> NaiveDate       { self.date }
    pub fn year(&self) -> i32             { self.date.year() }
    pub fn title(&self) -> &str           { &self.title }
    pub fn description(&self) -> Option<&str> { self.description.as_deref() }
    pub fn photo(&self) -> Option<&str>   { self.photo.as_deref() }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description.filter(|d| d.is_empty() == false);
    }

    pub fn set_photo(&mut self, photo: Option<String>) {
        self.photo = photo.filter(|p| p.is_empty() == false);
    }
}


/// What the UI collects in its "new memory" form.
///
/// Every field is optional, because forms can be submitted half-filled.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventDraft {
    pub date: Option<NaiveDate>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub photo: Option<String>,
}

impl EventDraft {
    /// Turn this draft into an event with a fresh ID, or return `None` if the date or the title is missing
    pub fn into_event(self) -> Option<Event> {
        let date = self.date?;
        let title = self.title.filter(|t| t.is_empty() == false)?;
        let mut event = Event::new(date, title);
        event.set_description(self.description);
        event.set_photo(self.photo);
        Some(event)
    }
}


/// Returns a field of a stored entry if it is a string
fn string_field(entry: &Map<String, Value>, name: &str) -> Option<String> {
    entry.get(name)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

/// Turn an entry of the local blob into an event, or return `None` if it has no valid date or no title.
///
/// Nothing else is checked: a numeric ID is kept as a string, a description or photo that is not a string is ignored.
fn stored_entry_to_event(entry: &Map<String, Value>) -> Option<Event> {
    let date = string_field(entry, "date")
        .and_then(|d| NaiveDate::parse_from_str(&d, DATE_FORMAT).ok())?;
    let title = string_field(entry, "title").filter(|t| t.is_empty() == false)?;
    let id = match entry.get("id") {
        Some(Value::String(id)) if id.is_empty() == false => EventId::from(id.as_str()),
        Some(Value::Number(n)) => EventId::from(n.to_string()),
        _ => {
            log::debug!("Stored event {:?} has no ID, generating one", title);
            EventId::random()
        },
    };
    Some(Event::new_with_parameters(id, date, title,
        string_field(entry, "description"),
        string_field(entry, "photo")))
}

/// Parse the blob that holds a whole collection in the local store.
///
/// A `null` blob is an empty collection. Entries that are not valid events (no date or no title) are dropped, the others keep their order.
/// An error is returned only when the blob itself is not a JSON array (or `null`).
pub fn parse_collection(blob: &str) -> Result<Vec<Event>, serde_json::Error> {
    let raw: Option<Vec<Value>> = serde_json::from_str(blob)?;

    let events = raw.unwrap_or_default()
        .iter()
        .filter_map(|value| value.as_object())
        .filter_map(stored_entry_to_event)
        .collect();
    Ok(events)
}

/// Serialize a whole collection into a blob suitable for the local store
pub fn serialize_collection(events: &[Event]) -> Result<String, serde_json::Error> {
    serde_json::to_string(events)
}


#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn invalid_entries_are_dropped() {
        let blob = r#"[
            {"id": "a", "date": "2021-03-04", "title": "first"},
            null,
            {"id": "b", "date": "2021-05-06"},
            {"id": "c", "title": "no date"},
            {"id": "d", "date": "2020-01-01", "title": ""},
            "not an event",
            {"id": "e", "date": "not a date", "title": "bad date"},
            {"id": "f", "date": "2019-12-31", "title": "last", "description": "hello", "photo": null}
        ]"#;

        let events = parse_collection(blob).unwrap();
        let ids: Vec<&str> = events.iter().map(|e| e.id().as_str()).collect();
        assert_eq!(ids, vec!["a", "f"]);
        assert_eq!(events[1].date(), date(2019, 12, 31));
        assert_eq!(events[1].description(), Some("hello"));
        assert_eq!(events[1].photo(), None);
    }

    #[test]
    fn loosely_typed_fields_do_not_drop_entries() {
        let blob = r#"[
            {"id": 1700000000000, "date": "2021-03-04", "title": "numeric id"},
            {"id": "s", "date": "2021-03-05", "title": "photo as object", "photo": {"url": "x"}, "description": 12},
            {"id": null, "date": "2021-03-06", "title": "null id"}
        ]"#;

        let events = parse_collection(blob).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].id().as_str(), "1700000000000");
        assert_eq!(events[1].id().as_str(), "s");
        assert_eq!(events[1].photo(), None);
        assert_eq!(events[1].description(), None);
        assert!(events[2].id().as_str().is_empty() == false);
    }

    #[test]
    fn null_blob_is_empty() {
        assert!(parse_collection("null").unwrap().is_empty());
        assert!(parse_collection("[]").unwrap().is_empty());
    }

    #[test]
    fn corrupt_blob_is_an_error() {
        assert!(parse_collection("{not json").is_err());
        assert!(parse_collection(r#"{"date": "2021-01-01"}"#).is_err());
    }

    #[test]
    fn missing_id_is_generated() {
        let events = parse_collection(r#"[{"date": "2021-03-04", "title": "first"}]"#).unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0].id().as_str().is_empty() == false);
    }

    #[test]
    fn serialized_collection_can_be_parsed_back() {
        let mut event = Event::new(date(2022, 8, 1), "trip".to_string());
        event.set_description(Some("".to_string()));
        event.set_photo(Some("https://photos.example/1.jpg".to_string()));
        let events = vec![event];

        let blob = serialize_collection(&events).unwrap();
        assert!(blob.contains(r#""date":"2022-08-01""#));
        assert_eq!(parse_collection(&blob).unwrap(), events);
    }

    #[test]
    fn drafts_need_a_date_and_a_title() {
        let incomplete = EventDraft { title: Some("no date".to_string()), ..EventDraft::default() };
        assert!(incomplete.into_event().is_none());

        let empty_title = EventDraft { date: Some(date(2020, 2, 2)), title: Some(String::new()), ..EventDraft::default() };
        assert!(empty_title.into_event().is_none());

        let complete = EventDraft {
            date: Some(date(2020, 2, 2)),
            title: Some("ok".to_string()),
            description: Some("desc".to_string()),
            photo: None,
        };
        let event = complete.into_event().unwrap();
        assert_eq!(event.title(), "ok");
        assert_eq!(event.year(), 2020);
        assert_eq!(event.description(), Some("desc"));
    }
}
