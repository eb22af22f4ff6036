//! Headless view that records what the store asked it to show

use crate::render::{NoticeLevel, SessionView};
use crate::session::{Message, Session};

/// One call made on a [`RecordingView`]
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// Titles of the rendered list and the highlighted index
    List {
        titles: Vec<String>,
        current: Option<usize>,
    },
    /// Id of the session whose log was rendered
    Detail(String),
    /// Id of the appended message
    Appended(String),
    Welcome,
    Notice(NoticeLevel, String),
    Confirm(String),
}

/// A [`SessionView`] that draws nothing and keeps an event log
///
/// Confirmations are answered with a fixed value.
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    pub events: Vec<ViewEvent>,
    confirm_answer: bool,
}

impl RecordingView {
    /// Create a view that answers confirmations with `confirm_answer`
    pub fn new(confirm_answer: bool) -> Self {
        Self {
            events: Vec::new(),
            confirm_answer,
        }
    }

    /// Change the answer given to later confirmations
    pub fn set_confirm_answer(&mut self, answer: bool) {
        self.confirm_answer = answer;
    }

    /// Notices recorded so far
    pub fn notices(&self) -> Vec<(NoticeLevel, String)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Notice(level, text) => Some((*level, text.clone())),
                _ => None,
            })
            .collect()
    }

    /// Most recent list render
    pub fn last_list(&self) -> Option<(&[String], Option<usize>)> {
        self.events.iter().rev().find_map(|e| match e {
            ViewEvent::List { titles, current } => Some((titles.as_slice(), *current)),
            _ => None,
        })
    }

    /// Drop the recorded events
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl SessionView for RecordingView {
    fn render_list(&mut self, sessions: &[Session], current: Option<usize>) {
        self.events.push(ViewEvent::List {
            titles: sessions.iter().map(|s| s.title.clone()).collect(),
            current,
        });
    }

    fn render_detail(&mut self, session: &Session) {
        self.events.push(ViewEvent::Detail(session.id.clone()));
    }

    fn append_message(&mut self, message: &Message) {
        self.events.push(ViewEvent::Appended(message.id.clone()));
    }

    fn show_welcome(&mut self) {
        self.events.push(ViewEvent::Welcome);
    }

    fn notify(&mut self, level: NoticeLevel, text: &str) {
        self.events.push(ViewEvent::Notice(level, text.to_string()));
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        self.events.push(ViewEvent::Confirm(prompt.to_string()));
        self.confirm_answer
    }
}
