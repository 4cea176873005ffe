//! User-visible notices, and the way they are handed to the UI

use std::fmt::{Display, Error, Formatter};

/// A transient status message meant to be displayed to the user
#[derive(Clone, Debug, PartialEq)]
pub enum Notice {
    /// Nothing happened yet
    None,
    /// The collection could not be loaded from any store
    LoadFailed,
    /// The collection could not be saved to any store
    SaveFailed,
    /// A new event has been saved
    EventSaved,
    /// An event has been deleted
    EventDeleted,
    /// The submitted form lacks a date or a title
    MissingFields,
    /// The submitted date is after today
    DateInFuture,
    /// The timeline has not been initialized yet
    NotReady,
}

impl Display for Notice {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            Notice::None => write!(f, ""),
            Notice::LoadFailed => write!(f, "Timeline data could not be loaded."),
            Notice::SaveFailed => write!(f, "Memories could not be saved."),
            Notice::EventSaved => write!(f, "Memory saved."),
            Notice::EventDeleted => write!(f, "Memory deleted."),
            Notice::MissingFields => write!(f, "Please add a date and a title."),
            Notice::DateInFuture => write!(f, "Memories cannot be dated in the future."),
            Notice::NotReady => write!(f, "The timeline is not ready yet."),
        }
    }
}

impl Default for Notice {
    fn default() -> Self {
        Self::None
    }
}



/// See [`feedback_channel`]
pub type FeedbackSender = tokio::sync::watch::Sender<Notice>;
/// See [`feedback_channel`]
pub type FeedbackReceiver = tokio::sync::watch::Receiver<Notice>;

/// Create a feeback channel, that can be used to watch the latest notice, e.g. from another task
pub fn feedback_channel() -> (FeedbackSender, FeedbackReceiver) {
    tokio::sync::watch::channel(Notice::default())
}



/// Collects the notices raised during persistence operations, and logs what happens
pub struct Feedback {
    notices: Vec<Notice>,
    feedback_channel: Option<FeedbackSender>,
}

impl Feedback {
    pub fn new() -> Self {
        Self { notices: Vec::new(), feedback_channel: None }
    }
    pub fn new_with_feedback_channel(channel: FeedbackSender) -> Self {
        Self { notices: Vec::new(), feedback_channel: Some(channel) }
    }

    /// Log a warning. This is not shown to the user
    pub fn warn(&mut self, text: &str) {
        log::warn!("{}", text);
    }
    /// Log an info
    pub fn info(&mut self, text: &str) {
        log::info!("{}", text);
    }
    /// Log a debug message
    pub fn debug(&mut self, text: &str) {
        log::debug!("{}", text);
    }

    /// Raise a notice for the user, and send it to the listener (if any)
    pub fn notify(&mut self, notice: Notice) {
        log::debug!("Notice for the user: {}", notice);
        if let Some(sender) = &self.feedback_channel {
            // Nobody listening is fine
            let _ = sender.send(notice.clone());
        }
        self.notices.push(notice);
    }

    /// The notices that have been raised and not taken yet
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Take the pending notices, e.g. to display them
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

impl Default for Feedback {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_are_collected_and_forwarded() {
        let (sender, receiver) = feedback_channel();
        let mut feedback = Feedback::new_with_feedback_channel(sender);
        assert_eq!(*receiver.borrow(), Notice::None);

        feedback.notify(Notice::SaveFailed);
        feedback.warn("not for the user");
        feedback.notify(Notice::EventDeleted);

        assert_eq!(*receiver.borrow(), Notice::EventDeleted);
        assert_eq!(feedback.take_notices(), vec![Notice::SaveFailed, Notice::EventDeleted]);
        assert!(feedback.notices().is_empty());
    }

    #[test]
    fn notice_texts() {
        assert_eq!(Notice::LoadFailed.to_string(), "Timeline data could not be loaded.");
        assert_eq!(Notice::SaveFailed.to_string(), "Memories could not be saved.");
        assert_eq!(Notice::EventDeleted.to_string(), "Memory deleted.");
    }
}
