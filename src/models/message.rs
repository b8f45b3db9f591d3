use chrono::{DateTime, Utc};
use serde::Serialize;

/// One chat message of a ticket.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Message {
    id: i64,
    ticket_id: i64,
    author_name: String,
    author_avatar: Option<String>,
    is_admin: bool,
    content: String,
    timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(author_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            author_name: author_name.into(),
            content: content.into(),
            timestamp: Utc::now(),
            ..Default::default()
        }
    }

    pub fn new_admin(author_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(author_name, content).with_admin(true)
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn with_ticket_id(mut self, ticket_id: i64) -> Self {
        self.ticket_id = ticket_id;
        self
    }

    pub fn with_avatar(mut self, avatar: Option<String>) -> Self {
        self.author_avatar = avatar;
        self
    }

    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn ticket_id(&self) -> i64 {
        self.ticket_id
    }

    pub fn author_name(&self) -> &str {
        &self.author_name
    }

    pub fn author_avatar(&self) -> Option<&str> {
        self.author_avatar.as_deref()
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
