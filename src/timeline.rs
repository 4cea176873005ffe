//! The in-memory timeline, and the UI actions that mutate it

use chrono::{Datelike, Local, NaiveDate};

use crate::event::{Event, EventDraft, EventId};
use crate::feedback::{Feedback, FeedbackSender, Notice};
use crate::traits::EventGateway;
use crate::view::TimelineView;


/// Returns the events of a given year, in the order of the collection
pub fn events_in_year(events: &[Event], year: i32) -> impl Iterator<Item = &Event> {
    events.iter().filter(move |e| e.year() == year)
}


#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimelineState {
    Uninitialized,
    Initialized,
}


/// An ordered collection of events, kept in sync with a gateway and displayed by a view.
///
/// Every mutation persists the whole collection, then re-renders the view.
pub struct Timeline<G: EventGateway, V: TimelineView> {
    gateway: G,
    view: V,
    feedback: Feedback,
    state: TimelineState,

    /// Ordered by date (ascending)
    events: Vec<Event>,
    current_year: i32,
    start_year: i32,
    today: NaiveDate,
}

impl<G: EventGateway, V: TimelineView> Timeline<G, V> {
    /// Create a timeline that starts at the configured [`START_YEAR`](crate::config::START_YEAR)
    pub fn new(gateway: G, view: V) -> Self {
        let today = Local::now().date_naive();
        Self::new_with_parameters(gateway, view, crate::config::start_year(), today)
    }

    pub fn new_with_parameters(gateway: G, view: V, start_year: i32, today: NaiveDate) -> Self {
        Self {
            gateway, view,
            feedback: Feedback::new(),
            state: TimelineState::Uninitialized,
            events: Vec::new(),
            current_year: today.year(),
            start_year,
            today,
        }
    }

    /// Also send every notice to a feedback channel
    pub fn set_feedback_channel(&mut self, channel: FeedbackSender) {
        self.feedback = Feedback::new_with_feedback_channel(channel);
    }

    pub fn events(&self) -> &[Event] { &self.events }
    pub fn current_year(&self) -> i32 { self.current_year }
    pub fn state(&self) -> TimelineState { self.state }
    pub fn gateway(&self) -> &G { &self.gateway }
    pub fn view(&self) -> &V { &self.view }

    /// The events of the year that is currently browsed
    pub fn events_in_current_year(&self) -> impl Iterator<Item = &Event> {
        events_in_year(&self.events, self.current_year)
    }

    /// Load the collection and display it.
    ///
    /// This does nothing (and returns `false`) if the view has no form
    pub async fn initialize(&mut self) -> bool {
        if self.view.has_form() == false {
            log::debug!("No form to attach to, the timeline will not be initialized");
            return false;
        }

        self.events = self.gateway.load(&mut self.feedback).await;
        self.current_year = self.clamp_year(self.current_year);
        self.view.set_max_date(self.today);
        self.show_notices();
        self.render();
        self.view.enable_form();
        self.state = TimelineState::Initialized;
        true
    }

    /// Handle a form submission.
    ///
    /// Returns the ID of the new event, or `None` if the submission has been rejected (the user is notified why)
    pub async fn add_event(&mut self, draft: EventDraft) -> Option<EventId> {
        if self.state != TimelineState::Initialized {
            self.notify(Notice::NotReady);
            return None;
        }

        let event = match draft.into_event() {
            Some(event) => event,
            None => {
                self.notify(Notice::MissingFields);
                return None;
            },
        };
        if event.date() > self.today {
            self.notify(Notice::DateInFuture);
            return None;
        }

        let id = event.id().clone();
        let year = event.year();
        let position = self.events.partition_point(|e| e.date() <= event.date());
        self.events.insert(position, event);

        self.gateway.save(&self.events, &mut self.feedback).await;
        self.show_notices();
        self.notify(Notice::EventSaved);
        self.current_year = self.clamp_year(year);
        self.render();
        Some(id)
    }

    /// Delete an event, both from the remote store and from the collection
    pub async fn delete_event(&mut self, id: &EventId) {
        // The remote deletion must be over before the collection changes, otherwise a concurrent save could resurrect this event
        self.gateway.delete_remote(id, &mut self.feedback).await;

        let count_before = self.events.len();
        self.events.retain(|e| e.id() != id);
        if self.events.len() == count_before {
            log::warn!("Event {} was not in the timeline", id);
        }

        self.gateway.save(&self.events, &mut self.feedback).await;
        self.show_notices();
        self.notify(Notice::EventDeleted);
        self.render();
    }

    /// Browse a given year (clamped to the years the timeline covers)
    pub fn show_year(&mut self, year: i32) {
        self.current_year = self.clamp_year(year);
        self.render();
    }

    pub fn previous_year(&mut self) {
        self.show_year(self.current_year - 1);
    }

    pub fn next_year(&mut self) {
        self.show_year(self.current_year + 1);
    }

    /// Keep `year` between the start year and the current year
    fn clamp_year(&self, year: i32) -> i32 {
        self.start_year.max(self.today.year().min(year))
    }

    fn render(&mut self) {
        self.view.render(&self.events, self.current_year);
    }

    fn notify(&mut self, notice: Notice) {
        self.feedback.notify(notice);
        self.show_notices();
    }

    /// Hand the pending notices to the view
    fn show_notices(&mut self) {
        for notice in self.feedback.take_notices() {
            self.view.show_message(&notice);
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn events_of_a_year() {
        let events = vec![
            Event::new(date(2019, 5, 1), "a".to_string()),
            Event::new(date(2020, 1, 1), "b".to_string()),
            Event::new(date(2020, 12, 31), "c".to_string()),
            Event::new(date(2021, 1, 1), "d".to_string()),
        ];
        let titles: Vec<&str> = events_in_year(&events, 2020).map(|e| e.title()).collect();
        assert_eq!(titles, vec!["b", "c"]);
        assert_eq!(events_in_year(&events, 2018).count(), 0);
    }
}
