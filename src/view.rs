//! The UI collaborator, that renders a timeline and shows notices

use chrono::NaiveDate;

use crate::event::Event;
use crate::feedback::Notice;

/// What a [`Timeline`](crate::Timeline) needs from the user interface
pub trait TimelineView: Send {
    /// Whether the "new memory" form exists. A timeline without a form is never initialized
    fn has_form(&self) -> bool;
    /// Set the latest date that can be picked in the form
    fn set_max_date(&mut self, date: NaiveDate);
    /// Start accepting form submissions
    fn enable_form(&mut self);
    /// Display the collection. `year` is the year that is currently browsed
    fn render(&mut self, events: &[Event], year: i32);
    /// Display a transient status message
    fn show_message(&mut self, notice: &Notice);
}


/// A view that prints to the standard output
#[derive(Debug, Default)]
pub struct ConsoleView {
    /// Also print the events of other years than the browsed one
    pub show_all_years: bool,
}

impl TimelineView for ConsoleView {
    fn has_form(&self) -> bool {
        true
    }

    fn set_max_date(&mut self, date: NaiveDate) {
        log::debug!("Memories can be dated up to {}", date);
    }

    fn enable_form(&mut self) {}

    fn render(&mut self, events: &[Event], year: i32) {
        if self.show_all_years {
            println!("---- Timeline ({} memories) ----", events.len());
            crate::utils::print_event_list(events.iter());
        } else {
            println!("---- {} ----", year);
            crate::utils::print_event_list(crate::timeline::events_in_year(events, year));
        }
    }

    fn show_message(&mut self, notice: &Notice) {
        println!("{}", notice);
    }
}
