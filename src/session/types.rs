use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Name given to sessions until the first message renames them
pub const DEFAULT_SESSION_NAME: &str = "New Chat";

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The person typing into the client
    User,
    /// The text-generation service
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Bot => write!(f, "bot"),
        }
    }
}

/// Message body: a single string or a list of bullet lines
///
/// Serialized untagged so documents written by other clients, which use
/// either a JSON string or a JSON array of strings, load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageText {
    /// Plain text
    Single(String),
    /// Ordered bullet lines
    Lines(Vec<String>),
}

impl MessageText {
    /// Body as display lines
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Self::Single(s) => vec![s.as_str()],
            Self::Lines(lines) => lines.iter().map(String::as_str).collect(),
        }
    }
}

impl From<String> for MessageText {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<&str> for MessageText {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<Vec<String>> for MessageText {
    fn from(value: Vec<String>) -> Self {
        Self::Lines(value)
    }
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Author of the message
    pub sender: Sender,
    /// Message body
    pub text: MessageText,
    /// When the message was created
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Creates a user message stamped with the current time
    ///
    /// # Examples
    ///
    /// ```
    /// use chatkeep::session::{Message, Sender};
    ///
    /// let msg = Message::user("Hello!");
    /// assert_eq!(msg.sender, Sender::User);
    /// ```
    pub fn user(text: impl Into<MessageText>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Creates a bot message stamped with the current time
    pub fn bot(text: impl Into<MessageText>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A named conversation thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique, creation-ordered identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Pinned sessions sort ahead of unpinned ones
    #[serde(default)]
    pub pinned: bool,
    /// Messages in insertion order
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Session {
    /// Create an empty, unpinned session
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            pinned: false,
            messages: Vec::new(),
        }
    }
}

/// Ordering of the session list: pinned first, then newest id first
///
/// Ids are compared by length, then lexicographically, both descending.
/// Ids of one shape (ULIDs, or millisecond timestamps from older
/// exports) therefore sort most recent first, and a shorter legacy id
/// never outranks a 26-character ULID.
///
/// # Examples
///
/// ```
/// use chatkeep::session::{compare_sessions, Session};
///
/// let old = Session::new("01A", "old");
/// let mut pinned = Session::new("00Z", "pinned");
/// pinned.pinned = true;
/// let new = Session::new("01B", "new");
///
/// let mut list = vec![old, new, pinned];
/// list.sort_by(compare_sessions);
/// let names: Vec<_> = list.iter().map(|s| s.name.as_str()).collect();
/// assert_eq!(names, ["pinned", "new", "old"]);
/// ```
pub fn compare_sessions(a: &Session, b: &Session) -> Ordering {
    b.pinned
        .cmp(&a.pinned)
        .then_with(|| b.id.len().cmp(&a.id.len()))
        .then_with(|| b.id.cmp(&a.id))
}
