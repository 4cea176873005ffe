//! Some utility functions

use crate::event::Event;

/// A debug utility that pretty-prints events
pub fn print_event_list<'a, I>(events: I)
where
    I: Iterator<Item = &'a Event>,
{
    let mut empty = true;
    for event in events {
        empty = false;
        print_event(event);
    }
    if empty {
        println!("    (no memories)");
    }
}

pub fn print_event(event: &Event) {
    let photo = if event.photo().is_some() { "📷" } else { " " };
    println!("    {} {}  {}\t{}", photo, event.date(), event.title(), event.id());
    if let Some(description) = event.description() {
        println!("          {}", description);
    }
}
